use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::organize::error::Result as OrganizeResult;
use crate::organize::file::{Action, organize_item_inner};
use crate::{Context, ItemId, Library};
use exn::ResultExt;
use jewelled_storage::StorageBackend;

/// Progress events emitted by [`organize`] as it works through a library.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started) — exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete) — exactly once, with the
///    total item count.
/// 3. [`Organized`](Self::Organized) — zero or more times, one per item.
/// 4. [`Complete`](Self::Complete) — exactly once, signalling the pass is
///    finished.
///
/// An item that fails to organize is yielded as an `Err` in place of its
/// [`Organized`](Self::Organized) event; the pass carries on with the next.
#[derive(Debug)]
pub enum OrganizeEvent {
    /// Organizing has begun; emitted exactly once before any other event.
    Started,
    /// The number of items about to be organized.
    DiscoveryComplete(u64),
    /// An item has been organized.
    Organized(Action),
    /// Every item has been organized; the iterator is finished.
    Complete,
}

enum State {
    Starting,
    Discovering,
    Organizing(std::vec::IntoIter<ItemId>),
    Finished,
}

/// Iterator returned by [`organize`].
pub struct Organizer<'a> {
    backend: &'a dyn StorageBackend,
    library: &'a mut Library,
    ctx: &'a Context,
    state: State,
}

/// Yields [`OrganizeEvent`]s for every item in `library`, relocating each one
/// to its template-derived path according to `ctx`.
///
/// Items are organized one at a time, in library order, each one completely
/// before the next is started. Nothing happens until the iterator is driven.
pub fn organize<'a>(backend: &'a dyn StorageBackend, library: &'a mut Library, ctx: &'a Context) -> Organizer<'a> {
    Organizer {
        backend,
        library,
        ctx,
        state: State::Starting,
    }
}

impl Organizer<'_> {
    fn advance(&mut self) -> Option<OrganizeResult<OrganizeEvent>> {
        match &mut self.state {
            State::Starting => {
                self.state = State::Discovering;
                Some(Ok(OrganizeEvent::Started))
            },
            State::Discovering => {
                let ids: Vec<_> = self.library.ids().collect();
                // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
                let count = u64::try_from(ids.len()).unwrap_or(0);
                self.state = State::Organizing(ids.into_iter());
                Some(Ok(OrganizeEvent::DiscoveryComplete(count)))
            },
            State::Organizing(ids) => match ids.next() {
                Some(id) => {
                    let result = organize_item_inner(self.backend, self.ctx, self.library, id);
                    Some(result.map(OrganizeEvent::Organized))
                },
                None => {
                    self.state = State::Finished;
                    Some(Ok(OrganizeEvent::Complete))
                },
            },
            State::Finished => None,
        }
    }
}

impl Iterator for Organizer<'_> {
    type Item = LibraryResult<OrganizeEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().map(|event| event.or_raise(|| LibraryErrorKind::Organize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organize::Summary;
    use crate::{Library, PathGenerator};
    use jewelled_metadata::{MetadataMap, StaticProvider};
    use jewelled_storage::backend::MockBackend;
    use std::path::PathBuf;

    fn setup() -> (MockBackend, Library) {
        let backend = MockBackend::with_files([
            ("a.flac", Vec::from(*b"a")),
            ("Foo/b.flac", Vec::from(*b"b")),
            ("dup/b.flac", Vec::from(*b"b2")),
            ("cover.jpg", Vec::from(*b"jpg")),
        ]);
        let provider = StaticProvider::new([
            ("/mock/a.flac", MetadataMap::from([("artist", "Foo"), ("title", "a")])),
            ("/mock/Foo/b.flac", MetadataMap::from([("artist", "Foo"), ("title", "b")])),
            ("/mock/dup/b.flac", MetadataMap::from([("artist", "Foo"), ("title", "b")])),
        ]);
        let library = Library::load(&backend, &provider);
        (backend, library)
    }

    fn run(backend: &MockBackend, library: &mut Library, ctx: &Context) -> (Vec<OrganizeEvent>, Summary) {
        let mut summary = Summary::default();
        let mut events = Vec::new();
        for event in organize(backend, library, ctx) {
            match event {
                Ok(OrganizeEvent::Organized(action)) => {
                    summary.record(&action);
                    events.push(OrganizeEvent::Organized(action));
                },
                Ok(event) => events.push(event),
                Err(_) => summary.record_failure(),
            }
        }
        (events, summary)
    }

    #[test]
    fn test_full_pass() {
        let (backend, mut library) = setup();
        let ctx = Context::new("<artist>/<title>".parse::<PathGenerator>().unwrap(), false);

        let (events, summary) = run(&backend, &mut library, &ctx);
        assert_eq!(events.len(), 6);
        assert!(matches!(events[0], OrganizeEvent::Started));
        assert!(matches!(events[1], OrganizeEvent::DiscoveryComplete(3)));
        assert!(matches!(events[5], OrganizeEvent::Complete));
        assert_eq!(
            summary,
            Summary {
                moved: 1,
                skipped: 1,
                unchanged: 1,
                ..Summary::default()
            }
        );
        assert_eq!(
            backend.files(),
            vec![
                PathBuf::from("Foo/a.flac"),
                PathBuf::from("Foo/b.flac"),
                PathBuf::from("cover.jpg"),
                PathBuf::from("dup/b.flac"),
            ]
        );

        // Organizing again changes nothing.
        let (_, summary) = run(&backend, &mut library, &ctx);
        assert_eq!(
            summary,
            Summary {
                unchanged: 2,
                skipped: 1,
                ..Summary::default()
            }
        );
    }

    #[test]
    fn test_failures_do_not_end_the_pass() {
        let (backend, mut library) = setup();
        let ctx = Context::new("../<title>".parse::<PathGenerator>().unwrap(), false);
        let (events, summary) = run(&backend, &mut library, &ctx);
        assert!(matches!(events.last(), Some(OrganizeEvent::Complete)));
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.total(), 3);
        assert_eq!(backend.files().len(), 4);
    }
}
