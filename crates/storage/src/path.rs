//! Library-relative path handling.
//!
//! Every path handed to a backend goes through [`validate`] first, so a
//! rendered template can never point outside the library root.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Normalizes `path` into a non-empty path relative to the library root.
///
/// Leading `/`, `.` components and repeated or trailing separators vanish;
/// `..` removes the component before it. A `..` with nothing left to remove,
/// a Windows drive prefix, a NUL byte or a path with no components left is
/// rejected with [`InvalidPath`](crate::error::ErrorKind::InvalidPath).
///
/// Backslashes and non-UTF-8 names are passed through as they are.
///
/// ```
/// use std::path::Path;
/// use jewelled_storage::validate_path;
///
/// assert_eq!(validate_path("/Artist//Album/./01 Title.flac").unwrap(), Path::new("Artist/Album/01 Title.flac"));
/// assert_eq!(validate_path("Artist/Unknown/../Album/").unwrap(), Path::new("Artist/Album"));
/// assert!(validate_path("../Other Library/a.flac").is_err());
/// assert!(validate_path("./").is_err());
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let invalid = || ErrorKind::InvalidPath(path.to_path_buf());

    let mut kept: Vec<&OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::RootDir | Component::CurDir => {},
            // NUL passes Path::components() on Unix but truncates the name
            // once it reaches a syscall.
            Component::Normal(name) if name.as_encoded_bytes().contains(&0) => exn::bail!(invalid()),
            Component::Normal(name) => kept.push(name),
            Component::ParentDir => {
                if kept.pop().is_none() {
                    exn::bail!(invalid());
                }
            },
            Component::Prefix(_) => exn::bail!(invalid()),
        }
    }
    if kept.is_empty() {
        exn::bail!(invalid());
    }
    Ok(kept.into_iter().collect())
}
