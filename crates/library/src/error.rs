//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. The [`scan`](crate::scan) and
//! [`organize`](crate::organize) modules have their own, more detailed, error
//! kinds that get raised into [`ErrorKind::Scan`] and [`ErrorKind::Organize`]
//! at their public entry points.

use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The path template could not be compiled.
    #[display("malformed pattern `{token}`: {reason}")]
    MalformedPattern { token: String, reason: &'static str },
    #[display("could not scan library")]
    Scan,
    #[display("could not organize library item")]
    Organize,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Template errors need a new template, and scan/organize failures
        // carry their own retryability further down the error tree.
        false
    }
}
