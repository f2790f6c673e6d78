mod cli;
mod error;
mod report;

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use clap::{CommandFactory, Parser};
use exn::ResultExt;
use jewelled_config::Config;
use jewelled_library::organize::Summary;
use jewelled_library::{Context, Library, PathGenerator};
use jewelled_metadata::TagProvider;
use jewelled_storage::backend::LocalBackend;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_level().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match Config::load(cli.config.as_deref(), &cli.overrides()).or_raise(|| ErrorKind::Config) {
        Ok(config) => config,
        Err(err) => return fail(&err),
    };

    match run(&config, &mut io::stdout().lock()) {
        Ok(summary) if summary.failed > 0 => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) if matches!(&*err, ErrorKind::MissingLibrary) => Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "no music library given: pass --music <PATH> (or set `music` in the configuration file)",
            )
            .exit(),
        Err(err) => fail(&err),
    }
}

fn fail(err: &crate::error::Error) -> ExitCode {
    eprintln!("jewelled: {err:?}");
    ExitCode::FAILURE
}

/// Everything that can fail without touching the library is checked first:
/// the library root, then the template. Only then is the library read.
fn run(config: &Config, out: &mut impl Write) -> Result<Summary> {
    let root = config.library_root().or_raise(|| ErrorKind::MissingLibrary)?;
    if let Some(target) = &config.target {
        tracing::warn!(mirror = %target.display(), "Mirroring to a target library is not supported; ignoring");
    }
    let Some(template) = config.organize.as_deref() else {
        tracing::info!(music = %root.display(), "Nothing to do; pass --organize <TEMPLATE> to organize the library");
        return Ok(Summary::default());
    };
    let template = template.parse::<PathGenerator>().or_raise(|| ErrorKind::Template)?;
    let backend = LocalBackend::new("music", &root).or_raise(|| ErrorKind::Library)?;

    let mut library = Library::load(&backend, &TagProvider::new());
    let ctx = Context::new(template, config.preview);
    report::organize_library(&backend, &mut library, &ctx, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A library with a file that any real template would move.
    fn misplaced_library() -> TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("incoming/misc")).unwrap();
        fs::write(temp_dir.path().join("incoming/misc/song.flac"), b"not much of a song").unwrap();
        fs::create_dir_all(temp_dir.path().join("empty")).unwrap();
        temp_dir
    }

    /// Every entry under `root` with the contents of the files.
    fn snapshot(root: &Path) -> Vec<(PathBuf, Option<Vec<u8>>)> {
        walkdir::WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| {
                let entry = entry.unwrap();
                let contents = entry.file_type().is_file().then(|| fs::read(entry.path()).unwrap());
                (entry.path().strip_prefix(root).unwrap().to_path_buf(), contents)
            })
            .collect()
    }

    fn config(music: Option<&Path>, organize: Option<&str>) -> Config {
        Config {
            music: music.map(Path::to_path_buf),
            organize: organize.map(str::to_string),
            ..Config::default()
        }
    }

    #[rstest]
    #[case("<artist:x>/<title>")]
    #[case("<artist>/<title")]
    #[case("<artist>/<track:99999999> <title>")]
    fn test_malformed_template_touches_nothing(#[case] template: &str) {
        let temp_dir = misplaced_library();
        let before = snapshot(temp_dir.path());
        let mut out = Vec::new();

        let err = run(&config(Some(temp_dir.path()), Some(template)), &mut out).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Template));
        assert_eq!(snapshot(temp_dir.path()), before);
        assert!(out.is_empty());
    }

    #[rstest]
    #[case(None)]
    #[case(Some("<artist>/<title>"))]
    #[case(Some("<artist:x>"))]
    fn test_missing_library_is_checked_first(#[case] organize: Option<&str>) {
        let mut out = Vec::new();
        let err = run(&config(None, organize), &mut out).unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingLibrary));
        assert!(out.is_empty());
    }

    #[test]
    fn test_library_must_exist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let music = temp_dir.path().join("missing");
        let err = run(&config(Some(&music), Some("<artist>/<title>")), &mut Vec::new()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Library));
        assert!(!music.exists());
    }

    #[test]
    fn test_nothing_to_do_without_template() {
        let temp_dir = misplaced_library();
        let before = snapshot(temp_dir.path());
        let mut out = Vec::new();

        let summary = run(&config(Some(temp_dir.path()), None), &mut out).unwrap();
        assert_eq!(summary, Summary::default());
        assert_eq!(snapshot(temp_dir.path()), before);
        assert!(out.is_empty());
    }
}
