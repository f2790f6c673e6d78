//! Error types for the [`scan`](super) module.

use derive_more::{Display, Error};
use jewelled_metadata::error::Error as MetadataError;

/// A scan error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The storage backend could not list (part of) the library.
    #[display("storage backend failed during scan")]
    Storage,
    /// The file's metadata could not be read, so it isn't a library item.
    #[display("excluded: {_0}")]
    Excluded(#[error(not(source))] String),
}
impl ErrorKind {
    /// Convert a metadata error into an exclusion, keeping the metadata
    /// crate's error tree as a child.
    #[track_caller]
    pub fn excluded(err: MetadataError) -> Error {
        let reason = err.to_string();
        err.raise(ErrorKind::Excluded(reason))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage)
    }
}
