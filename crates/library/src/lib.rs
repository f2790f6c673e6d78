//! Template-driven organization of a music library.
//!
//! A [`Library`] is loaded by [scanning](scan) a storage backend, reading the
//! metadata of every file found. Each item is then [organized](organize):
//! its metadata is rendered through a [`PathGenerator`] and the file is moved
//! to the resulting path, unless it's already there or something else is.

pub mod error;
mod item;
pub mod organize;
pub mod scan;
mod template;

pub use crate::item::{Item, ItemId, Library};
pub use crate::template::{MAX_WIDTH, Padding, PathGenerator, Segment, Width};

/// Options for an organize pass.
///
/// Immutable for the duration of the pass and shared by every item in it.
#[derive(Debug, Clone)]
pub struct Context {
    /// Renders the path each item belongs at.
    pub template: PathGenerator,
    /// Report what would be moved without touching anything.
    pub preview: bool,
}
impl Context {
    pub fn new(template: PathGenerator, preview: bool) -> Self {
        Self { template, preview }
    }
}
