use crate::scan::{Scan, ScanEvent, scan};
use derive_more::Display;
use jewelled_metadata::{MetadataMap, MetadataProvider};
use jewelled_storage::{FileInfo, StorageBackend};
use std::path::{Path, PathBuf};

/// Stable handle to an [`Item`] in a [`Library`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("#{_0}")]
pub struct ItemId(usize);

/// A media file known to the library.
///
/// Only files whose metadata could be read become items. The metadata is
/// fixed at scan time; the path changes when the item is moved, and only
/// through its [`Library`].
#[derive(Debug, Clone)]
pub struct Item {
    file: FileInfo,
    metadata: MetadataMap,
}
impl Item {
    /// Location of the file, relative to the library root.
    pub fn path(&self) -> &Path {
        &self.file.path
    }

    pub fn size(&self) -> u64 {
        self.file.size
    }

    pub fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }

    /// Extension of the file name including its dot, or an empty string.
    pub fn extension(&self) -> String {
        self.file.extension()
    }
}

impl From<Scan> for Item {
    fn from(scan: Scan) -> Self {
        Self {
            file: scan.file,
            metadata: scan.metadata,
        }
    }
}

/// Every item found in a library, in discovery order.
///
/// Items are never removed, so an [`ItemId`] stays valid for the lifetime of
/// the library it came from.
#[derive(Debug, Default)]
pub struct Library {
    items: Vec<Item>,
}
impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `backend` and collects every valid media file into a library.
    ///
    /// Files without readable metadata are left out (logged at debug level).
    /// Entries the backend fails to list are logged and skipped; they don't
    /// stop the rest of the library from loading.
    pub fn load(backend: &dyn StorageBackend, provider: &dyn MetadataProvider) -> Self {
        let mut library = Self::new();
        for event in scan(backend, provider) {
            match event {
                Ok(ScanEvent::Scanned(scan)) => {
                    library.insert(*scan);
                },
                Ok(ScanEvent::Excluded { path, reason }) => {
                    tracing::debug!(path = %path.display(), %reason, "Not a media file; excluded from library");
                },
                Ok(ScanEvent::DiscoveryComplete(count)) => {
                    tracing::debug!(backend = backend.name(), count, "Discovered files");
                },
                Ok(ScanEvent::Started | ScanEvent::Complete) => {},
                Err(err) => {
                    tracing::warn!(backend = backend.name(), error = ?err, "Could not list library entry; skipping");
                },
            }
        }
        tracing::info!(backend = backend.name(), items = library.len(), "Library loaded");
        library
    }

    pub fn insert(&mut self, item: impl Into<Item>) -> ItemId {
        self.items.push(item.into());
        ItemId(self.items.len() - 1)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.0)
    }

    /// Record that an item now lives at `path`.
    pub(crate) fn set_path(&mut self, id: ItemId, path: PathBuf) {
        if let Some(item) = self.items.get_mut(id.0) {
            item.file.path = path;
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + use<> {
        (0..self.items.len()).map(ItemId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items.iter().enumerate().map(|(index, item)| (ItemId(index), item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
