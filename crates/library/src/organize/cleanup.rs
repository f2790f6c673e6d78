use jewelled_storage::StorageBackend;
use std::path::{Path, PathBuf};

/// Removes the directories a file at `moved_from` used to live in, for as long
/// as they are empty, walking upward.
///
/// Stops at the first directory that still has entries, at the library root
/// (which is never removed), or at the first failure. Failures are logged and
/// otherwise ignored: leftover empty directories are untidy, not an error.
///
/// Returns the removed directories, deepest first.
pub(crate) fn prune_empty_ancestors(backend: &dyn StorageBackend, moved_from: &Path) -> Vec<PathBuf> {
    let mut pruned = Vec::new();
    for dir in moved_from.ancestors().skip(1) {
        // The empty path is the library root.
        if dir.as_os_str().is_empty() {
            break;
        }
        match backend.is_empty_dir(dir) {
            Ok(true) => {},
            Ok(false) => break,
            Err(err) => {
                tracing::debug!(dir = %dir.display(), error = ?err, "Could not inspect directory; stopping cleanup");
                break;
            },
        }
        if let Err(err) = backend.remove_dir(dir) {
            tracing::debug!(dir = %dir.display(), error = ?err, "Could not remove empty directory; stopping cleanup");
            break;
        }
        tracing::debug!(dir = %dir.display(), "Removed empty directory");
        pruned.push(dir.to_path_buf());
    }
    pruned
}

#[cfg(test)]
mod tests {
    use super::*;
    use jewelled_storage::backend::{LocalBackend, MockBackend};
    use rstest::rstest;
    use std::fs;

    #[rstest]
    #[case("a/b/c/gone.flac", &["a/b/c", "a/b", "a"])]
    #[case("a/gone.flac", &["a"])]
    #[case("gone.flac", &[])]
    fn test_prunes_up_to_root(#[case] moved_from: &str, #[case] expected: &[&str]) {
        let parent = Path::new(moved_from).parent().unwrap().to_path_buf();
        let backend = MockBackend::default().with_dirs([parent].into_iter().filter(|p| !p.as_os_str().is_empty()));
        let pruned = prune_empty_ancestors(&backend, Path::new(moved_from));
        assert_eq!(pruned, expected.iter().map(PathBuf::from).collect::<Vec<_>>());
        assert!(backend.dirs().is_empty());
    }

    #[test]
    fn test_stops_at_non_empty_directory() {
        let backend = MockBackend::with_files([("a/keep.flac", Vec::from(*b"keep"))]).with_dirs(["a/b/c"]);
        let pruned = prune_empty_ancestors(&backend, Path::new("a/b/c/gone.flac"));
        assert_eq!(pruned, vec![PathBuf::from("a/b/c"), PathBuf::from("a/b")]);
        assert_eq!(backend.dirs(), vec![PathBuf::from("a")]);
    }

    #[test]
    fn test_stops_quietly_on_error() {
        // Parent directory doesn't exist at all.
        let backend = MockBackend::with_files([("x.flac", Vec::from(*b"x"))]);
        assert!(prune_empty_ancestors(&backend, Path::new("missing/gone.flac")).is_empty());
        assert_eq!(backend.files(), vec![PathBuf::from("x.flac")]);
    }

    #[test]
    fn test_local_never_removes_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("a/b")).unwrap();
        let backend = LocalBackend::new("local", temp_dir.path()).unwrap();
        let pruned = prune_empty_ancestors(&backend, Path::new("a/b/gone.flac"));
        assert_eq!(pruned, vec![PathBuf::from("a/b"), PathBuf::from("a")]);
        assert!(temp_dir.path().is_dir());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
