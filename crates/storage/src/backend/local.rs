//! Local filesystem storage backend.
//!
//! Files live in a configured directory and are accessed using standard
//! filesystem operations. Directory walking is delegated to [`walkdir`].

use crate::backend::FileInfoIter;
use crate::error::ErrorKind;
use crate::{FileInfo, StorageBackend, error::Result, path::validate as validate_path};
use exn::ResultExt;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Local filesystem storage backend.
///
/// Stores files in a directory on the local filesystem. All paths are relative
/// to the configured root directory.
///
/// # Examples
///
/// ```no_run
/// use jewelled_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("music", "/path/to/music")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct LocalBackend {
    name: String,
    /// Root directory for the library
    root: PathBuf,
}
impl LocalBackend {
    /// Create a new local filesystem backend.
    ///
    /// # Arguments
    /// * `root` - Absolute path to an existing library root directory
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, does not exist, or is not
    /// a directory. Unlike a download target, a music library that doesn't
    /// exist yet has nothing to organize, so it is never created.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        let metadata = fs::metadata(&root).map_err(|e| Self::map_io_error(e, &root))?;
        if !metadata.is_dir() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { name: name.into(), root })
    }

    /// Get the absolute path for a relative storage path.
    ///
    /// Validates the path and joins it with the root directory.
    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    /// Convert an absolute path back to a relative storage path.
    fn relative_path(&self, absolute: impl AsRef<Path>) -> Result<PathBuf> {
        let absolute = absolute.as_ref();
        let relative = absolute.strip_prefix(&self.root).or_raise(|| {
            ErrorKind::BackendError(format!("path `{:?}` is not within root `{:?}`", absolute, self.root))
        })?;
        // Validate path will also canonicalize it.
        validate_path(relative)
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            IoErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            IoErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            IoErrorKind::AlreadyExists => ErrorKind::AlreadyExists(path.to_path_buf()),
            IoErrorKind::DirectoryNotEmpty => ErrorKind::NotEmpty(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }

    /// Whether anything, a dangling symlink included, sits at `absolute`.
    fn occupied(absolute: &Path, path: &Path) -> Result<bool> {
        match fs::symlink_metadata(absolute) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => exn::bail!(Self::map_io_error(e, path)),
        }
    }

    /// Directories between the root and `dir` (inclusive) that don't exist
    /// yet, deepest first.
    fn missing_dirs(&self, dir: &Path) -> Vec<PathBuf> {
        dir.ancestors()
            .take_while(|ancestor| *ancestor != self.root && fs::symlink_metadata(ancestor).is_err())
            .map(Path::to_path_buf)
            .collect()
    }

    /// Turns a single walked entry into [`FileInfo`], or `None` for anything
    /// that isn't a regular file (directories, symlinks, sockets...).
    fn process_entry(&self, entry: DirEntry) -> Result<Option<FileInfo>> {
        if !entry.file_type().is_file() {
            if !entry.file_type().is_dir() {
                tracing::debug!(path = %entry.path().display(), "Skipping entry that is neither file nor directory");
            }
            return Ok(None);
        }
        let metadata = entry.metadata().map_err(|e| {
            let path = entry.path().to_path_buf();
            Self::map_io_error(e.into(), &path)
        })?;
        let relative = self.relative_path(entry.path())?;
        Ok(Some(FileInfo::new(relative, metadata.len())))
    }
}

impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn walk(&self) -> FileInfoIter<'_> {
        // Sorted so that organizing the same library twice visits files in
        // the same order (and prints the same report).
        let walker = WalkDir::new(&self.root).follow_links(false).sort_by_file_name().into_iter();
        Box::new(walker.filter_map(move |entry| match entry {
            Ok(entry) => self.process_entry(entry).transpose(),
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
                Some(Err(exn::Exn::from(Self::map_io_error(err.into(), &path))))
            },
        }))
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let abs_path = self.absolute_path(path)?;
        Self::occupied(&abs_path, path)
    }

    fn stat(&self, path: &Path) -> Result<FileInfo> {
        let abs_path = self.absolute_path(path)?;
        let metadata = fs::metadata(&abs_path).map_err(|e| Self::map_io_error(e, path))?;
        Ok(FileInfo::new(validate_path(path)?, metadata.len()))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from_path = self.absolute_path(from)?;
        let to_path = self.absolute_path(to)?;
        // `fs::rename` happily replaces an existing file (or symlink) on Unix.
        // We don't.
        if Self::occupied(&to_path, to)? {
            exn::bail!(ErrorKind::AlreadyExists(to.to_path_buf()));
        }
        if !Self::occupied(&from_path, from)? {
            exn::bail!(ErrorKind::NotFound(from.to_path_buf()));
        }
        let created = match to_path.parent() {
            Some(parent) => {
                let missing = self.missing_dirs(parent);
                fs::create_dir_all(parent).map_err(|e| Self::map_io_error(e, to))?;
                missing
            },
            None => Vec::new(),
        };
        if let Err(e) = fs::rename(&from_path, &to_path) {
            // Only the directories made for this move, and only while empty.
            for dir in &created {
                if let Err(err) = fs::remove_dir(dir) {
                    tracing::debug!(dir = %dir.display(), error = %err, "Could not remove directory after failed rename");
                    break;
                }
            }
            exn::bail!(Self::map_io_error(e, to));
        }
        Ok(())
    }

    fn is_empty_dir(&self, path: &Path) -> Result<bool> {
        let abs_path = self.absolute_path(path)?;
        let metadata = fs::metadata(&abs_path).map_err(|e| Self::map_io_error(e, path))?;
        if !metadata.is_dir() {
            return Ok(false);
        }
        let mut entries = fs::read_dir(&abs_path).map_err(|e| Self::map_io_error(e, path))?;
        Ok(entries.next().is_none())
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::remove_dir(&abs_path).map_err(|e| Self::map_io_error(e, path))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn touch(root: &Path, path: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"data").unwrap();
    }

    #[test]
    fn test_new_requires_absolute_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(LocalBackend::new("name", temp_dir.path()).is_ok());
        assert!(LocalBackend::new("name", "relative/path").is_err());
        assert!(LocalBackend::new("name", "./relative").is_err());
    }

    #[test]
    fn test_new_requires_existing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = LocalBackend::new("name", temp_dir.path().join("missing")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        touch(temp_dir.path(), "file.mp3");
        let err = LocalBackend::new("name", temp_dir.path().join("file.mp3")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[test]
    fn test_absolute_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        let expected = temp_dir.path().join("Artist/01.flac");
        assert_eq!(backend.absolute_path(Path::new("Artist/01.flac")).unwrap(), expected);
        // Path traversal is prevented
        assert!(backend.absolute_path(Path::new("../etc/passwd")).is_err());
    }

    #[test]
    fn test_relative_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        let abs = temp_dir.path().join("Artist/01.flac");
        assert_eq!(backend.relative_path(&abs).unwrap(), Path::new("Artist/01.flac"));
        assert!(backend.relative_path(PathBuf::from("/other/file.flac")).is_err());
    }

    #[test]
    fn test_walk_is_recursive_and_sorted() {
        let temp_dir = tempfile::tempdir().unwrap();
        touch(temp_dir.path(), "b/2.mp3");
        touch(temp_dir.path(), "a/z/1.mp3");
        touch(temp_dir.path(), "a/0.mp3");
        fs::create_dir_all(temp_dir.path().join("empty")).unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        let paths: Vec<_> = backend.list().unwrap().into_iter().map(|f| f.path).collect();
        assert_eq!(paths, vec![PathBuf::from("a/0.mp3"), PathBuf::from("a/z/1.mp3"), PathBuf::from("b/2.mp3")]);
    }

    #[test]
    fn test_exists_and_stat() {
        let temp_dir = tempfile::tempdir().unwrap();
        touch(temp_dir.path(), "file.ogg");
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        assert!(backend.exists(Path::new("file.ogg")).unwrap());
        assert!(!backend.exists(Path::new("nope.ogg")).unwrap());
        let info = backend.stat(Path::new("file.ogg")).unwrap();
        assert_eq!(info.path, PathBuf::from("file.ogg"));
        assert_eq!(info.size, 4);
        let err = backend.stat(Path::new("nope.ogg")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_rename_creates_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        touch(temp_dir.path(), "file.flac");
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        backend.rename(Path::new("file.flac"), Path::new("a/b/c/file.flac")).unwrap();
        assert!(!backend.exists(Path::new("file.flac")).unwrap());
        assert!(backend.exists(Path::new("a/b/c/file.flac")).unwrap());
    }

    #[test]
    fn test_rename_never_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        touch(temp_dir.path(), "old.flac");
        fs::write(temp_dir.path().join("new.flac"), b"precious").unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        let err = backend.rename(Path::new("old.flac"), Path::new("new.flac")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(_)));
        assert!(backend.exists(Path::new("old.flac")).unwrap());
        assert_eq!(fs::read(temp_dir.path().join("new.flac")).unwrap(), b"precious");
    }

    #[cfg(unix)]
    #[test]
    fn test_rename_never_replaces_dangling_symlink() {
        let temp_dir = tempfile::tempdir().unwrap();
        touch(temp_dir.path(), "old.flac");
        std::os::unix::fs::symlink(temp_dir.path().join("nowhere.flac"), temp_dir.path().join("new.flac")).unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();

        assert!(backend.exists(Path::new("new.flac")).unwrap());
        let err = backend.rename(Path::new("old.flac"), Path::new("new.flac")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(_)));
        assert!(backend.exists(Path::new("old.flac")).unwrap());
        assert!(fs::symlink_metadata(temp_dir.path().join("new.flac")).unwrap().file_type().is_symlink());
    }

    #[test]
    fn test_failed_rename_removes_created_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        touch(temp_dir.path(), "old.flac");
        fs::create_dir_all(temp_dir.path().join("Artist")).unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();

        // Longer than any filesystem allows for a single name.
        let target = PathBuf::from("Artist/Album/Disc 1").join(format!("{}.flac", "x".repeat(300)));
        assert!(backend.rename(Path::new("old.flac"), &target).is_err());
        assert!(backend.exists(Path::new("old.flac")).unwrap());
        assert!(!temp_dir.path().join("Artist/Album").exists());
        // Directories that were already there stay.
        assert!(temp_dir.path().join("Artist").is_dir());
    }

    #[test]
    fn test_rename_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        let err = backend.rename(Path::new("missing.flac"), Path::new("new/missing.flac")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        // No directories are created for a move that can't happen.
        assert!(!temp_dir.path().join("new").exists());
    }

    #[test]
    fn test_empty_dir_handling() {
        let temp_dir = tempfile::tempdir().unwrap();
        touch(temp_dir.path(), "full/file.mp3");
        fs::create_dir_all(temp_dir.path().join("empty")).unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();

        assert!(backend.is_empty_dir(Path::new("empty")).unwrap());
        assert!(!backend.is_empty_dir(Path::new("full")).unwrap());
        assert!(!backend.is_empty_dir(Path::new("full/file.mp3")).unwrap());
        assert!(backend.is_empty_dir(Path::new("missing")).is_err());

        let err = backend.remove_dir(Path::new("full")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotEmpty(_)));
        backend.remove_dir(Path::new("empty")).unwrap();
        assert!(!temp_dir.path().join("empty").exists());
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        assert!(backend.remove_dir(Path::new("")).is_err());
        assert!(backend.remove_dir(Path::new(".")).is_err());
        assert!(temp_dir.path().exists());
    }
}
