//! Metadata extraction for music files.
//!
//! The rest of the workspace only ever sees a [`MetadataMap`]: a flat map of
//! lower-cased field names to trimmed string values. Where the values come
//! from is up to the [`MetadataProvider`] in use; [`TagProvider`] reads the
//! tags embedded in the audio file itself.

pub mod error;
mod map;
#[cfg(feature = "mock")]
mod mock;
mod provider;

pub use crate::map::MetadataMap;
#[cfg(feature = "mock")]
pub use crate::mock::StaticProvider;
pub use crate::provider::{MetadataProvider, TagProvider};
