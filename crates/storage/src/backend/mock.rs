//! In-memory storage backend for testing.

use super::FileInfoIter;
use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use crate::{FileInfo, StorageBackend};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

fn file_info(path: &Path, data: &[u8]) -> FileInfo {
    FileInfo::new(path, data.len() as u64)
}

#[derive(Default)]
struct Tree {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
}
impl Tree {
    fn insert_file(&mut self, path: PathBuf, data: Vec<u8>) {
        self.insert_ancestors(&path);
        self.files.insert(path, data);
    }

    fn insert_ancestors(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn has_children(&self, dir: &Path) -> bool {
        let is_child = |p: &&PathBuf| p.parent() == Some(dir);
        self.files.keys().any(|p| is_child(&p)) || self.dirs.iter().any(|p| is_child(&p))
    }
}

/// In-memory storage backend for testing.
///
/// Files are stored in a map behind a [`RefCell`], so all trait methods can
/// operate on `&self`. Directories are tracked explicitly (parents of every
/// file, plus any added with [`with_dirs`](Self::with_dirs)) so that
/// tests can observe empty-directory cleanup.
///
/// # Examples
///
/// ```
/// use jewelled_storage::backend::{MockBackend, StorageBackend};
/// use std::path::Path;
///
/// let backend = MockBackend::with_files([
///     ("Artist/Album/01.flac", b"fLaC..."),
/// ]);
/// assert!(backend.exists(Path::new("Artist/Album/01.flac")).unwrap());
/// assert!(!backend.is_empty_dir(Path::new("Artist/Album")).unwrap());
/// ```
pub struct MockBackend {
    name: String,
    root: PathBuf,
    tree: RefCell<Tree>,
}

impl MockBackend {
    /// Create a mock backend pre-populated with files.
    ///
    /// Panics if any path fails validation (e.g. path traversal). If test
    /// setup is wrong, then test should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut tree = Tree::default();
        for (path, data) in files {
            let path = path.into();
            let Ok(validated) = validate_path(&path) else {
                // The panic here is DELIBERATE. MockBackend is intended to be
                // used in tests; panics are expected. There is no error result.
                panic!("MockBackend::with_files: invalid path {}", path.display());
            };
            tree.insert_file(validated, data.into());
        }
        Self {
            name: "mock".to_string(),
            root: PathBuf::from("/mock"),
            tree: RefCell::new(tree),
        }
    }

    /// Add (possibly empty) directories.
    ///
    /// Panics on invalid paths, same as [`with_files`](Self::with_files).
    pub fn with_dirs(self, dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        {
            let mut tree = self.tree.borrow_mut();
            for dir in dirs {
                let dir = dir.into();
                let Ok(validated) = validate_path(&dir) else {
                    panic!("MockBackend::with_dirs: invalid path {}", dir.display());
                };
                tree.insert_ancestors(&validated);
                tree.dirs.insert(validated);
            }
        }
        self
    }

    /// Snapshot of every file path currently stored.
    pub fn files(&self) -> Vec<PathBuf> {
        self.tree.borrow().files.keys().cloned().collect()
    }

    /// Snapshot of every directory currently stored.
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.tree.borrow().dirs.iter().cloned().collect()
    }

    /// Contents of a stored file.
    pub fn read(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.tree.borrow().files.get(path.as_ref()).cloned()
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let files: [(&str, &str); 0] = [];
        Self::with_files(files)
    }
}

impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn walk(&self) -> FileInfoIter<'_> {
        // Snapshot so callers may mutate the backend while iterating.
        let entries: Vec<_> = self
            .tree
            .borrow()
            .files
            .iter()
            .map(|(path, data)| Ok(file_info(path, data)))
            .collect();
        Box::new(entries.into_iter())
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let path = validate_path(path)?;
        Ok(self.tree.borrow().files.contains_key(&path))
    }

    fn stat(&self, path: &Path) -> Result<FileInfo> {
        let path = validate_path(path)?;
        let tree = self.tree.borrow();
        let data = tree.files.get(&path).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path.clone())))?;
        Ok(file_info(&path, data))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from = validate_path(from)?;
        let to = validate_path(to)?;
        let mut tree = self.tree.borrow_mut();
        if tree.files.contains_key(&to) {
            exn::bail!(ErrorKind::AlreadyExists(to));
        }
        let data = tree.files.remove(&from).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(from)))?;
        tree.insert_file(to, data);
        Ok(())
    }

    fn is_empty_dir(&self, path: &Path) -> Result<bool> {
        let path = validate_path(path)?;
        let tree = self.tree.borrow();
        if tree.files.contains_key(&path) {
            return Ok(false);
        }
        if !tree.dirs.contains(&path) {
            exn::bail!(ErrorKind::NotFound(path));
        }
        Ok(!tree.has_children(&path))
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        let path = validate_path(path)?;
        let mut tree = self.tree.borrow_mut();
        if !tree.dirs.contains(&path) {
            exn::bail!(ErrorKind::NotFound(path));
        }
        if tree.has_children(&path) {
            exn::bail!(ErrorKind::NotEmpty(path));
        }
        tree.dirs.remove(&path);
        Ok(())
    }
}
