//! Metadata Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A metadata error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Every variant means the same thing to a library scan: this file is not
/// part of the library. They're kept apart so the log says why.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The file could not be opened or read.
    #[display("could not read {}", _0.display())]
    Unreadable(#[error(not(source))] PathBuf),
    /// The file was read but isn't an audio format we can parse tags from.
    #[display("not a valid media file: {}", _0.display())]
    NotMedia(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A file is either a readable audio file or it's not.
        false
    }
}
