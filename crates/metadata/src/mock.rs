//! Fixed metadata provider for testing.

use crate::error::{ErrorKind, Result};
use crate::{MetadataMap, MetadataProvider};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Provider that answers from a fixed table instead of reading files.
///
/// Any path not in the table is reported as [`NotMedia`](ErrorKind::NotMedia),
/// the same as a file a real provider couldn't parse.
///
/// # Examples
///
/// ```
/// use jewelled_metadata::{MetadataMap, MetadataProvider, StaticProvider};
/// use std::path::Path;
///
/// let provider = StaticProvider::default()
///     .with("/music/a.flac", MetadataMap::from([("artist", "Foo")]));
/// assert_eq!(provider.read(Path::new("/music/a.flac")).unwrap().get("artist"), Some("Foo"));
/// assert!(provider.read(Path::new("/music/cover.jpg")).is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct StaticProvider {
    entries: HashMap<PathBuf, MetadataMap>,
}

impl StaticProvider {
    /// Create a provider from `(path, metadata)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (impl Into<PathBuf>, MetadataMap)>) -> Self {
        Self {
            entries: entries.into_iter().map(|(path, map)| (path.into(), map)).collect(),
        }
    }

    /// Add (or replace) the metadata for a single path.
    pub fn with(mut self, path: impl Into<PathBuf>, metadata: MetadataMap) -> Self {
        self.entries.insert(path.into(), metadata);
        self
    }
}

impl MetadataProvider for StaticProvider {
    fn read(&self, path: &Path) -> Result<MetadataMap> {
        self.entries
            .get(path)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotMedia(path.to_path_buf())))
    }
}
