//! File organization.
//!
//! Relocates library items from their current paths to the location rendered
//! from their metadata by the [`Context`](crate::Context)'s
//! [`PathGenerator`](crate::PathGenerator).
//!
//! A move never overwrites anything: when the target path is already taken
//! the item is skipped and left where it is. After a successful move, any
//! directories the move left empty are removed, walking upward from the
//! file's old location and stopping at the library root.
//!
//! The primary entry point is [`organize`] which streams the resulting
//! [`Action`]s from passing each item in a [`Library`](crate::Library) to
//! [`organize_item`].

mod cleanup;
pub mod error;
mod file;
mod stream;
mod summary;

pub use self::file::{Action, organize_item, relocate};
pub use self::stream::{OrganizeEvent, Organizer, organize};
pub use self::summary::Summary;
