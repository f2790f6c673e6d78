use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use jewelled_library::organize::{Action, OrganizeEvent, Summary, organize};
use jewelled_library::{Context, Library};
use jewelled_storage::StorageBackend;
use std::io::Write;
use std::path::Path;

/// One line describing a decision, naming both ends of the move in full.
/// Items already in place aren't worth a line.
pub fn describe(root: &Path, action: &Action) -> Option<String> {
    let (from, to) = action.paths()?;
    let status = match action {
        Action::Unchanged(_) => return None,
        Action::Previewed { .. } => "preview",
        Action::Skipped { .. } => "skipped, target exists",
        Action::Moved { .. } => "moved",
    };
    Some(format!("Move: {} => {} ({status})", root.join(from).display(), root.join(to).display()))
}

/// Runs an organize pass over `library`, writing a line to `out` for every
/// item that was (or would have been) moved, followed by the totals.
///
/// Items that fail are logged and counted; they don't stop the pass.
pub fn organize_library(
    backend: &dyn StorageBackend,
    library: &mut Library,
    ctx: &Context,
    out: &mut impl Write,
) -> Result<Summary> {
    let mut summary = Summary::default();
    for event in organize(backend, library, ctx) {
        match event {
            Ok(OrganizeEvent::Organized(action)) => {
                summary.record(&action);
                if let Some(line) = describe(backend.root(), &action) {
                    writeln!(out, "{line}").or_raise(|| ErrorKind::Output)?;
                }
            },
            Ok(OrganizeEvent::DiscoveryComplete(count)) => {
                tracing::info!(count, preview = ctx.preview, template = %ctx.template, "Organizing library");
            },
            Ok(OrganizeEvent::Started | OrganizeEvent::Complete) => {},
            Err(err) => {
                summary.record_failure();
                tracing::error!(error = ?err, "Could not organize item");
            },
        }
    }
    writeln!(out, "Summary: {summary}").or_raise(|| ErrorKind::Output)?;
    Ok(summary)
}
