//! Library discovery.
//!
//! Walks a storage backend and reads the metadata of every file found. Files
//! the [`MetadataProvider`](jewelled_metadata::MetadataProvider) rejects are
//! reported as excluded rather than failing the scan.

pub(crate) mod error;
mod file;
mod stream;

pub use self::file::{Scan, scan_file};
pub use self::stream::{ScanEvent, Scanner, scan};
