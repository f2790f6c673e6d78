//! Filesystem access for music libraries.
//!
//! Everything in this crate works on paths *relative to the library root*.
//! Callers never join paths onto the root themselves: backends validate and
//! resolve them (see [`validate_path`]), which keeps every operation inside
//! the library.

pub mod backend;
pub mod error;
mod models;
mod path;

pub use crate::backend::StorageBackend;
pub use crate::models::{FileInfo, extension};
pub use crate::path::validate as validate_path;
