//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait, the seam between library
//! logic (scanning, organizing) and the filesystem it rearranges.

mod local;
#[cfg(feature = "mock")]
mod mock;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
use crate::error::Result;
use crate::models::FileInfo;
use std::path::Path;

/// Iterator over every file in a backend, yielding entries as they're found.
pub type FileInfoIter<'a> = Box<dyn Iterator<Item = Result<FileInfo>> + 'a>;

/// Unified interface for storage backends.
///
/// Operations are synchronous and blocking; a library is organized one file
/// at a time.
///
/// # Path Handling
/// All paths are relative to the storage root and must be validated using
/// [`validate_path`](crate::validate_path) before use. Implementations should
/// enforce this validation. The root itself can never be named (an empty
/// path is invalid) which means it can never be removed either.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use jewelled_storage::{backend::StorageBackend, error::Result};
///
/// fn size_of_hardcoded_file(backend: &dyn StorageBackend) -> Result<u64> {
///     let path = Path::new("Artist/Album/01 Title.flac");
///     if backend.exists(path)? {
///         Ok(backend.stat(path)?.size)
///     } else {
///         Ok(0)
///     }
/// }
/// ```
pub trait StorageBackend {
    /// Name of the configured backend (used for logging only).
    fn name(&self) -> &str;

    /// Absolute location of the storage root.
    ///
    /// Used to hand absolute paths to collaborators that read files directly
    /// (metadata providers) and to print human-readable paths.
    fn root(&self) -> &Path;

    /// Iterate over every regular file under the root, recursively.
    ///
    /// Errors for individual entries (an unreadable sub-directory, say) are
    /// yielded in place and do not end the iteration.
    fn walk(&self) -> FileInfoIter<'_>;

    /// List all files.
    ///
    /// Default implementation of this method is to collect all the results
    /// from [`walk()`](Self::walk) into a [`Vec`], failing on the first error.
    fn list(&self) -> Result<Vec<FileInfo>> {
        self.walk().collect()
    }

    /// Check if a file exists.
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Get file metadata without reading contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    fn stat(&self, path: &Path) -> Result<FileInfo>;

    /// Rename/move a file within the same backend.
    ///
    /// # Notes
    /// - Implementations must create parent directories as needed.
    /// - Implementations must **never** overwrite: if the destination already
    ///   exists, [`AlreadyExists`](crate::error::ErrorKind::AlreadyExists) is
    ///   returned and nothing is touched.
    /// - The move itself is a single rename, so an interrupted process never
    ///   leaves a half-written file behind.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the source
    /// file does not exist.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Whether `path` is a directory without any entries.
    ///
    /// Returns `false` for files, [`NotFound`](crate::error::ErrorKind::NotFound)
    /// if nothing exists at `path`.
    fn is_empty_dir(&self, path: &Path) -> Result<bool>;

    /// Remove an empty directory.
    ///
    /// Returns [`NotEmpty`](crate::error::ErrorKind::NotEmpty) if the
    /// directory still has entries, and [`NotFound`](crate::error::ErrorKind::NotFound)
    /// if it doesn't exist.
    fn remove_dir(&self, path: &Path) -> Result<()>;
}
