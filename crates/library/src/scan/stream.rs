use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::scan::Scan;
use crate::scan::error::{ErrorKind as ScanErrorKind, Result as ScanResult};
use crate::scan::file::scan_file_inner;
use exn::ResultExt;
use jewelled_metadata::MetadataProvider;
use jewelled_storage::error::Result as StorageResult;
use jewelled_storage::{FileInfo, StorageBackend};
use std::path::PathBuf;
use std::vec::IntoIter;

/// Progress events emitted by [`scan`] as it works through a library.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started) — exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete) — exactly once, with the
///    total file count.
/// 3. [`Scanned`](Self::Scanned) or [`Excluded`](Self::Excluded) — once per
///    discovered file.
/// 4. [`Complete`](Self::Complete) — exactly once.
///
/// Entries the backend failed to list are yielded as `Err` items in between,
/// without ending the scan.
#[derive(Debug)]
pub enum ScanEvent {
    Started,
    DiscoveryComplete(u64),
    Scanned(Box<Scan>),
    /// The file isn't a media item and won't be part of the library.
    Excluded { path: PathBuf, reason: String },
    Complete,
}

enum State {
    Starting,
    Discovering,
    Scanning(IntoIter<StorageResult<FileInfo>>),
    Finished,
}

/// Iterator returned by [`scan`].
pub struct Scanner<'a> {
    backend: &'a dyn StorageBackend,
    provider: &'a dyn MetadataProvider,
    state: State,
}

/// Scans every file in `backend`, reading metadata through `provider`.
///
/// Every file is discovered before the first one is scanned, so that the
/// caller can be told how many there are via [`ScanEvent::DiscoveryComplete`].
pub fn scan<'a>(backend: &'a dyn StorageBackend, provider: &'a dyn MetadataProvider) -> Scanner<'a> {
    Scanner {
        backend,
        provider,
        state: State::Starting,
    }
}

impl Scanner<'_> {
    fn advance(&mut self) -> Option<ScanResult<ScanEvent>> {
        match &mut self.state {
            State::Starting => {
                self.state = State::Discovering;
                Some(Ok(ScanEvent::Started))
            },
            State::Discovering => {
                let entries: Vec<_> = self.backend.walk().collect();
                let count = entries.iter().filter(|entry| entry.is_ok()).count();
                self.state = State::Scanning(entries.into_iter());
                // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
                Some(Ok(ScanEvent::DiscoveryComplete(u64::try_from(count).unwrap_or(0))))
            },
            State::Scanning(entries) => match entries.next() {
                Some(Ok(file)) => Some(self.scan_one(file)),
                Some(Err(err)) => Some(Err(err).or_raise(|| ScanErrorKind::Storage)),
                None => {
                    self.state = State::Finished;
                    Some(Ok(ScanEvent::Complete))
                },
            },
            State::Finished => None,
        }
    }

    fn scan_one(&self, file: FileInfo) -> ScanResult<ScanEvent> {
        let path = file.path.clone();
        match scan_file_inner(self.backend, self.provider, file) {
            Ok(scan) => Ok(ScanEvent::Scanned(Box::new(scan))),
            Err(err) => match &*err {
                ScanErrorKind::Excluded(reason) => Ok(ScanEvent::Excluded {
                    path,
                    reason: reason.clone(),
                }),
                _ => Err(err),
            },
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = LibraryResult<ScanEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().map(|event| event.or_raise(|| LibraryErrorKind::Scan))
    }
}
