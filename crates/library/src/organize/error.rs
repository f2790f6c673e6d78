//! Error types for the [`organize`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use crate::ItemId;
use derive_more::{Display, Error};
use std::path::PathBuf;

/// An organize error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for organize operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of an organize failure.
///
/// ### Operational Errors
/// - [`ErrorKind::InvalidTarget`]
/// - [`ErrorKind::UnknownItem`]
///
/// ### Dependency Errors
/// - [`ErrorKind::Storage`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A storage backend operation (existence check, rename) failed.
    #[display("storage backend failed")]
    Storage,
    /// The rendered path can't be used as a location in the library: it's
    /// empty, or it escapes the library root.
    #[display("invalid target path: {}", _0.display())]
    InvalidTarget(#[error(not(source))] PathBuf),
    /// The item doesn't belong to the library it was organized in.
    #[display("no such item in library: {_0}")]
    UnknownItem(#[error(not(source))] ItemId),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage)
    }
}
