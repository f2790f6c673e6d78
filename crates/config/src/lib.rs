//! Configuration loading for jewelled.
//!
//! Settings are layered, each layer overriding the ones before it:
//!
//! 1. Built-in defaults.
//! 2. A TOML file: either the one given explicitly, or `config.toml` in the
//!    platform's configuration directory for `jewelled` (which doesn't have
//!    to exist).
//! 3. Environment variables prefixed with `JEWELLED_` (`JEWELLED_MUSIC`,
//!    `JEWELLED_PREVIEW`, ...).
//! 4. [`Overrides`], usually built from command-line flags. Only the values
//!    actually set take part.
//!
//! ```toml
//! music = "/srv/music"
//! organize = "<artist>/<album>/<track:02> <title>"
//! preview = true
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::ops::Not;
use std::path::{Path, PathBuf};

/// Prefix of environment variables read as configuration.
pub const ENV_PREFIX: &str = "JEWELLED_";

/// Fully merged configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of the music library.
    #[serde(default)]
    pub music: Option<PathBuf>,
    /// Path template to organize the library with. No template, no organizing.
    #[serde(default)]
    pub organize: Option<String>,
    /// Report intended moves without performing them.
    #[serde(default)]
    pub preview: bool,
    /// Mirror library location. Accepted, but unused.
    #[serde(default)]
    pub target: Option<PathBuf>,
}

/// Values that take precedence over every other configuration source.
///
/// Unset values (`None`, `false`) leave lower layers alone, so a flag that
/// wasn't given on the command line can't clobber the configuration file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organize: Option<String>,
    #[serde(skip_serializing_if = "Not::not")]
    pub preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
}

impl Config {
    /// Location of the configuration file used when none is given.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "jewelled").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Builds the layered [`Figment`] without extracting it.
    ///
    /// An explicit `file` must exist; the default file is optional.
    pub fn figment(file: Option<&Path>, overrides: &Overrides) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match file {
            Some(file) => {
                if !file.is_file() {
                    exn::bail!(ErrorKind::NotFound(file.to_path_buf()));
                }
                figment = figment.merge(Toml::file(file));
            },
            None => {
                if let Some(default) = Self::default_path() {
                    tracing::debug!(path = %default.display(), "Looking for default configuration file");
                    figment = figment.merge(Toml::file(default));
                }
            },
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)).merge(Serialized::defaults(overrides)))
    }

    /// Loads and merges every configuration source.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let config: Self = Self::figment(file, overrides)?.extract().or_raise(|| ErrorKind::Invalid)?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// The library root as an absolute path.
    ///
    /// Relative paths are resolved against the current directory. Whether the
    /// directory actually exists is for the storage backend to find out.
    pub fn library_root(&self) -> Result<PathBuf> {
        let music = self.music.as_deref().ok_or_raise(|| ErrorKind::MissingLibrary)?;
        if music.as_os_str().is_empty() {
            exn::bail!(ErrorKind::MissingLibrary);
        }
        std::path::absolute(music).or_raise(|| ErrorKind::MissingLibrary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn config_file(contents: &str) -> (TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_file_values() {
        let (_temp_dir, path) = config_file(
            r#"
            music = "/srv/music"
            organize = "<artist>/<title>"
            preview = true
            "#,
        );
        let config = Config::load(Some(&path), &Overrides::default()).unwrap();
        assert_eq!(
            config,
            Config {
                music: Some(PathBuf::from("/srv/music")),
                organize: Some("<artist>/<title>".to_string()),
                preview: true,
                target: None,
            }
        );
    }

    #[test]
    fn test_overrides_win_only_when_set() {
        let (_temp_dir, path) = config_file(
            r#"
            music = "/srv/music"
            organize = "<artist>/<title>"
            preview = true
            "#,
        );
        let overrides = Overrides {
            organize: Some("<album>/<title>".to_string()),
            ..Overrides::default()
        };
        let config = Config::load(Some(&path), &overrides).unwrap();
        assert_eq!(config.music, Some(PathBuf::from("/srv/music")));
        assert_eq!(config.organize.as_deref(), Some("<album>/<title>"));
        // `preview: false` means "not given", not "turn preview off".
        assert!(config.preview);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let (_temp_dir, path) = config_file("");
        let overrides = Overrides {
            music: Some(PathBuf::from("/music")),
            ..Overrides::default()
        };
        let config = Config::load(Some(&path), &overrides).unwrap();
        assert_eq!(config.music, Some(PathBuf::from("/music")));
        assert_eq!(config.organize, None);
        assert!(!config.preview);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&temp_dir.path().join("nope.toml")), &Overrides::default()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[rstest]
    #[case("preview = \"sometimes\"")]
    #[case("music = 42")]
    #[case("this is not toml")]
    fn test_invalid(#[case] contents: &str) {
        let (_temp_dir, path) = config_file(contents);
        let err = Config::load(Some(&path), &Overrides::default()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid));
    }

    #[test]
    fn test_library_root() {
        let config = Config {
            music: Some(PathBuf::from("/srv/music")),
            ..Config::default()
        };
        assert_eq!(config.library_root().unwrap(), PathBuf::from("/srv/music"));

        let config = Config {
            music: Some(PathBuf::from("music")),
            ..Config::default()
        };
        let root = config.library_root().unwrap();
        assert!(root.is_absolute());
        assert!(root.ends_with("music"));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn test_missing_library(#[case] music: Option<&str>) {
        let config = Config {
            music: music.map(PathBuf::from),
            ..Config::default()
        };
        let err = config.library_root().unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingLibrary));
    }
}
