use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::scan::error::{ErrorKind, Result as ScanResult};
use exn::ResultExt;
use jewelled_metadata::{MetadataMap, MetadataProvider};
use jewelled_storage::{FileInfo, StorageBackend};
use tracing::instrument;

/// The result of scanning a single file: where it is, and what it says about
/// itself.
#[derive(Debug, Clone)]
pub struct Scan {
    pub file: FileInfo,
    pub metadata: MetadataMap,
}

/// Reads the metadata of a single file found in `backend`.
///
/// The provider is handed the file's absolute path (backend root joined with
/// the file's relative path). A file the provider can't read fails with
/// [`ErrorKind::Excluded`](crate::scan::error::ErrorKind::Excluded) under
/// [`LibraryErrorKind::Scan`].
pub fn scan_file(backend: &dyn StorageBackend, provider: &dyn MetadataProvider, file: FileInfo) -> LibraryResult<Scan> {
    scan_file_inner(backend, provider, file).or_raise(|| LibraryErrorKind::Scan)
}

#[instrument(level = "debug", skip_all, fields(path = %file.path.display()))]
pub(crate) fn scan_file_inner(
    backend: &dyn StorageBackend,
    provider: &dyn MetadataProvider,
    file: FileInfo,
) -> ScanResult<Scan> {
    let absolute = backend.root().join(&file.path);
    let metadata = provider.read(&absolute).map_err(ErrorKind::excluded)?;
    Ok(Scan { file, metadata })
}
