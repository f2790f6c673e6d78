use clap::{ArgAction, Parser};
use jewelled_config::Overrides;
use std::path::PathBuf;

const TEMPLATE_HELP: &str = "\
Path templates:
  Text is copied as-is into the new path (relative to the music library),
  apart from variables in angle brackets, which are replaced by the file's
  metadata:

    <variable[:[pad]width][=default]>

  variable   Metadata field, ignoring case: artist, album, album_artist,
             title, track, track_total, disc, disc_total, date, year,
             genre, composer, comment, isrc, or any other tag name.
  :width     Render exactly `width` characters. Longer values are cut,
             shorter ones are left-padded when a pad character (0 or a
             space) comes before the width, and left alone otherwise.
  =default   Used when the field is missing. Without it a missing field
             renders as \"<variable> unknown\", or as nothing (then
             padded) if it has a width.

  The original file extension is always kept.

Example:
  jewelled --music ~/Music --preview \\
      --organize '<artist>/<album=Unknown Album>/<disc:1=1>-<track:02> <title>'

  turns `misc/song.flac` into `Foo/Bar/1-03 Baz.flac`.";

/// Organize a music library into directories derived from embedded tags.
#[derive(Debug, Parser)]
#[command(name = "jewelled", version, about, after_long_help = TEMPLATE_HELP)]
pub struct Cli {
    /// Root directory of the music library.
    #[arg(long, value_name = "PATH")]
    pub music: Option<PathBuf>,
    /// Move every file in the library to the path rendered from this template.
    #[arg(long, value_name = "TEMPLATE")]
    pub organize: Option<String>,
    /// Only report what would be moved.
    #[arg(long)]
    pub preview: bool,
    /// Mirror library location (not supported; ignored).
    #[arg(long, value_name = "PATH")]
    pub target: Option<PathBuf>,
    /// Configuration file to use instead of the default one.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Log more (repeat for even more).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Flags that override the configuration file and environment.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            music: self.music.clone(),
            organize: self.organize.clone(),
            preview: self.preview,
            target: self.target.clone(),
        }
    }

    /// Default log filter, used when `RUST_LOG` isn't set.
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}
