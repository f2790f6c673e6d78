//! Storage models.

use std::path::{Path, PathBuf};

/// File metadata returned by storage backends.
///
/// Produced by listing operations and [`stat`](crate::StorageBackend::stat).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Relative path from storage root
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}
impl FileInfo {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self { path: path.into(), size }
    }

    /// The file extension including its leading dot, or an empty string.
    ///
    /// Taken from the last `.` of the file name onward. A dot at the very
    /// start of the name (`.hidden`) does not start an extension.
    pub fn extension(&self) -> String {
        extension(&self.path)
    }
}

/// See [`FileInfo::extension`].
pub fn extension(path: &Path) -> String {
    let Some(name) = path.file_name() else {
        return String::new();
    };
    let name = name.to_string_lossy();
    match name.rfind('.') {
        Some(0) | None => String::new(),
        Some(index) => name[index..].to_string(),
    }
}
