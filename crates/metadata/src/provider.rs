use crate::MetadataMap;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use std::path::Path;
use tracing::instrument;

/// Source of metadata for files in a library.
///
/// Given the absolute path of a file, produce its [`MetadataMap`] or fail
/// because the file isn't a media item. Failing is not fatal for the caller;
/// a scan simply leaves the file out.
pub trait MetadataProvider {
    fn read(&self, path: &Path) -> Result<MetadataMap>;
}

/// Reads the tags embedded in audio files (ID3, Vorbis comments, MP4 atoms,
/// APE...) using [`lofty`].
///
/// The format is sniffed from the file's content rather than trusted from its
/// extension. Only the primary tag of a file is read (falling back to the
/// first tag found). Well-known items get stable names regardless of the tag
/// format:
///
/// | Field          | Item                                 |
/// |----------------|--------------------------------------|
/// | `title`        | track title                          |
/// | `artist`       | track artist                         |
/// | `album`        | album title                          |
/// | `album_artist` | album artist                         |
/// | `track`        | track number                         |
/// | `track_total`  | number of tracks                     |
/// | `disc`         | disc number                          |
/// | `disc_total`   | number of discs                      |
/// | `date`         | recording date                       |
/// | `year`         | year                                 |
/// | `genre`        | genre                                |
/// | `composer`     | composer                             |
/// | `comment`      | comment                              |
/// | `isrc`         | ISRC                                 |
///
/// Any other textual item the format doesn't map to a well-known key (custom
/// Vorbis comments, ID3 `TXXX` frames, ...) is kept under its own name,
/// lower-cased. A readable audio file without tags yields an empty map.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagProvider;
impl TagProvider {
    pub fn new() -> Self {
        Self
    }

    fn collect(tag: &Tag) -> MetadataMap {
        tag.items()
            .filter_map(|item| {
                let value = item.value().text()?;
                let name = match item.key() {
                    ItemKey::Unknown(name) => name.to_lowercase(),
                    key => field_name(key)?.to_string(),
                };
                Some((name, value.to_string()))
            })
            .collect()
    }
}

impl MetadataProvider for TagProvider {
    #[instrument(level = "debug", skip(self), fields(path = %path.display()))]
    fn read(&self, path: &Path) -> Result<MetadataMap> {
        let unreadable = || ErrorKind::Unreadable(path.to_path_buf());
        let probe = Probe::open(path).or_raise(unreadable)?.guess_file_type().or_raise(unreadable)?;
        if probe.file_type().is_none() {
            exn::bail!(ErrorKind::NotMedia(path.to_path_buf()));
        }
        let tagged = probe.read().or_raise(|| ErrorKind::NotMedia(path.to_path_buf()))?;
        let metadata = tagged.primary_tag().or_else(|| tagged.first_tag()).map(Self::collect).unwrap_or_default();
        tracing::debug!(fields = metadata.len(), "Read tags");
        Ok(metadata)
    }
}

/// Stable field names for the items every tag format knows about.
fn field_name(key: &ItemKey) -> Option<&'static str> {
    Some(match key {
        ItemKey::TrackTitle => "title",
        ItemKey::TrackArtist => "artist",
        ItemKey::AlbumTitle => "album",
        ItemKey::AlbumArtist => "album_artist",
        ItemKey::TrackNumber => "track",
        ItemKey::TrackTotal => "track_total",
        ItemKey::DiscNumber => "disc",
        ItemKey::DiscTotal => "disc_total",
        ItemKey::RecordingDate => "date",
        ItemKey::Year => "year",
        ItemKey::Genre => "genre",
        ItemKey::Composer => "composer",
        ItemKey::Comment => "comment",
        ItemKey::Isrc => "isrc",
        _ => return None,
    })
}
