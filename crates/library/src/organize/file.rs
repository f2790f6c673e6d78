use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::organize::cleanup::prune_empty_ancestors;
use crate::organize::error::{ErrorKind as OrganizeErrorKind, Result as OrganizeResult};
use crate::{Context, ItemId, Library};
use exn::{OptionExt, ResultExt};
use jewelled_storage::error::ErrorKind as StorageErrorKind;
use jewelled_storage::{StorageBackend, validate_path};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// The outcome of (successfully) organizing a single item.
///
/// All paths are relative to the library root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Item is already at its correct path; nothing was done.
    Unchanged(PathBuf),
    /// Item would have been moved, but the context is in preview mode.
    Previewed { from: PathBuf, to: PathBuf },
    /// Another file already occupies the target path, so the item was left
    /// where it is.
    Skipped { from: PathBuf, to: PathBuf },
    /// Item was moved. `pruned` lists the directories removed because the
    /// move left them empty, deepest first.
    Moved { from: PathBuf, to: PathBuf, pruned: Vec<PathBuf> },
}
impl Action {
    /// Source and target of the move this action is about, unless the item
    /// was already in place.
    pub fn paths(&self) -> Option<(&Path, &Path)> {
        match self {
            Self::Unchanged(_) => None,
            Self::Previewed { from, to } | Self::Skipped { from, to } | Self::Moved { from, to, .. } => {
                Some((from, to))
            },
        }
    }
}

/// Moves a single item to the location rendered from its metadata.
///
/// The extension of the item's current file name is carried over to the
/// rendered path. See [`relocate`] for what happens next.
///
/// # Errors
/// Returns [`Exn<LibraryErrorKind::Organize>`](LibraryErrorKind::Organize)
/// raised from an inner [`Exn<OrganizeErrorKind>`](OrganizeErrorKind).
pub fn organize_item(
    backend: &dyn StorageBackend,
    ctx: &Context,
    library: &mut Library,
    id: ItemId,
) -> LibraryResult<Action> {
    organize_item_inner(backend, ctx, library, id).or_raise(|| LibraryErrorKind::Organize)
}

pub(crate) fn organize_item_inner(
    backend: &dyn StorageBackend,
    ctx: &Context,
    library: &mut Library,
    id: ItemId,
) -> OrganizeResult<Action> {
    let item = library.get(id).ok_or_raise(|| OrganizeErrorKind::UnknownItem(id))?;
    let target = ctx.template.generate_with_ext(item.metadata(), &item.extension());
    relocate_inner(backend, ctx, library, id, Path::new(&target))
}

/// Moves a single item to `target` (relative to the library root), taking one
/// of four actions:
///
/// - **[`Action::Unchanged`]** — the item is already at `target` (after
///   normalization). Nothing is touched.
/// - **[`Action::Previewed`]** — the context is in preview mode. Nothing is
///   touched, whether or not `target` is free.
/// - **[`Action::Skipped`]** — a file already exists at `target`. Nothing is
///   touched; existing files are never overwritten.
/// - **[`Action::Moved`]** — the file was renamed to `target` (creating its
///   directories as needed), its path in the library updated, and any
///   directories left empty by the move removed.
///
/// Every intended move is logged, in preview mode or not.
///
/// # Errors
/// Returns [`Exn<LibraryErrorKind::Organize>`](LibraryErrorKind::Organize)
/// when `target` isn't a valid location inside the library, or when the
/// storage backend fails to check for or perform the move.
pub fn relocate(
    backend: &dyn StorageBackend,
    ctx: &Context,
    library: &mut Library,
    id: ItemId,
    target: &Path,
) -> LibraryResult<Action> {
    relocate_inner(backend, ctx, library, id, target).or_raise(|| LibraryErrorKind::Organize)
}

#[instrument(level = "debug", skip(backend, ctx, library), fields(backend = backend.name()))]
pub(crate) fn relocate_inner(
    backend: &dyn StorageBackend,
    ctx: &Context,
    library: &mut Library,
    id: ItemId,
    target: &Path,
) -> OrganizeResult<Action> {
    let item = library.get(id).ok_or_raise(|| OrganizeErrorKind::UnknownItem(id))?;
    let to = validate_path(target).or_raise(|| OrganizeErrorKind::InvalidTarget(target.to_path_buf()))?;
    let from = item.path().to_path_buf();
    if from == to {
        return Ok(Action::Unchanged(from));
    }

    tracing::info!(from = %from.display(), to = %to.display(), preview = ctx.preview, "Move");
    if ctx.preview {
        return Ok(Action::Previewed { from, to });
    }
    if backend.exists(&to).or_raise(|| OrganizeErrorKind::Storage)? {
        tracing::warn!(from = %from.display(), to = %to.display(), "Target already exists; skipping");
        return Ok(Action::Skipped { from, to });
    }
    match backend.rename(&from, &to) {
        Ok(()) => {},
        // Lost a race with something else creating the target; same outcome
        // as finding it there in the first place.
        Err(err) if matches!(&*err, StorageErrorKind::AlreadyExists(_)) => {
            tracing::warn!(from = %from.display(), to = %to.display(), "Target already exists; skipping");
            return Ok(Action::Skipped { from, to });
        },
        Err(err) => return Err(err).or_raise(|| OrganizeErrorKind::Storage),
    }
    library.set_path(id, to.clone());

    let pruned = prune_empty_ancestors(backend, &from);
    Ok(Action::Moved { from, to, pruned })
}
