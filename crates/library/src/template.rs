//! Path templating for library file organization.
//!
//! Turns a file's [`MetadataMap`] into a path relative to the library root,
//! using a user-supplied template. Anything in the template is copied into the
//! path as-is, except for variables in angle brackets:
//!
//! ```text
//! <variable[:[pad]width][=default]>
//! ```
//!
//! - **`variable`** — name of a metadata field (`artist`, `album`, `track`,
//!   ...). Matched ignoring case. Can't contain `:`, `=` or `>`.
//! - **`:width`** — render exactly `width` characters: longer values are
//!   truncated, shorter values are left-padded with the pad character (`0` or
//!   a space). Without a pad character short values are only ever truncated.
//!   `<track:0>` renders nothing; `<track:00>` is the zero-padded version of
//!   the same thing. Widths above [`MAX_WIDTH`] are rejected.
//! - **`=default`** — text used when the field is missing (may be empty).
//!   Without it, a missing field renders as `"<variable> unknown"`, unless it
//!   has a width: then it starts out empty, so `<track:02>` becomes `00`.
//!
//! A `>` outside a variable is plain text. An unterminated `<` is not.
//!
//! # Example
//!
//! ```
//! use jewelled_library::PathGenerator;
//! use jewelled_metadata::MetadataMap;
//!
//! let generator: PathGenerator = "<artist>/<album=Unknown>/<track:02> <title>".parse().unwrap();
//! let metadata = MetadataMap::from([("artist", "Foo"), ("title", "Bar")]);
//! assert_eq!(generator.generate_with_ext(&metadata, ".flac"), "Foo/Unknown/00 Bar.flac");
//! ```

mod segment;

pub use self::segment::{MAX_WIDTH, Padding, Segment, Width};
use crate::error::{Error, ErrorKind, Result};
use jewelled_metadata::MetadataMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::mem;
use std::str::FromStr;

/// A compiled path template.
///
/// Constructed via [`FromStr`], which compiles the template eagerly so that
/// syntax errors surface before a single file is touched. The compiled
/// template is immutable and reusable across any number of
/// [`generate`](Self::generate) calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGenerator {
    source: String,
    segments: Vec<Segment>,
}

impl FromStr for PathGenerator {
    type Err = Error;

    /// Compiles the given template string into a reusable [`PathGenerator`].
    ///
    /// Returns [`ErrorKind::MalformedPattern`] naming the first offending
    /// token.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self {
            source: s.to_string(),
            segments: Self::compile(s)?,
        })
    }
}

impl PathGenerator {
    fn compile(template: &str) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;
        while let Some(start) = rest.find('<') {
            literal.push_str(&rest[..start]);
            let token = &rest[start..];
            // A token ends at the first `>`; hitting another `<` first means
            // the earlier one was never closed.
            let Some(end) = token[1..].find(['<', '>']).map(|i| i + 1).filter(|&i| token.as_bytes()[i] == b'>')
            else {
                let unclosed = token[1..].find('<').map_or(token, |i| &token[..=i]);
                exn::bail!(ErrorKind::MalformedPattern {
                    token: unclosed.to_string(),
                    reason: "unterminated variable",
                });
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(mem::take(&mut literal)));
            }
            segments.push(Segment::variable(&token[..=end], &token[1..end])?);
            rest = &token[end + 1..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(segments)
    }

    /// The compiled segments, in template order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Renders the template against `metadata`.
    ///
    /// Rendering can't fail: missing fields fall back to their defaults. The
    /// result is not normalized or validated; it's up to whoever uses it as a
    /// path to do so (see [`validate_path`](jewelled_storage::validate_path)).
    pub fn generate(&self, metadata: &MetadataMap) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            segment.render(metadata, &mut path);
        }
        path
    }

    /// Renders the template and appends a file extension.
    ///
    /// The extension is appended verbatim, so it should include its leading
    /// dot (as returned by [`jewelled_storage::extension`]).
    ///
    /// ```text
    /// generate(…)                    → "Foo/Bar/01 Baz"
    /// generate_with_ext(…, ".flac")  → "Foo/Bar/01 Baz.flac"
    /// generate_with_ext(…, "")       → "Foo/Bar/01 Baz"
    /// ```
    pub fn generate_with_ext(&self, metadata: &MetadataMap, ext: &str) -> String {
        let mut path = self.generate(metadata);
        path.push_str(ext);
        path
    }
}

impl Display for PathGenerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.source)
    }
}
