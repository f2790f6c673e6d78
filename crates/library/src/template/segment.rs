use crate::error::{ErrorKind, Result};
use jewelled_metadata::MetadataMap;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// Everything between the angle brackets of a variable token. Only the overall
// shape is matched here; what's wrong with a bad width is worked out after.
static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(?<name>[^:=]*)(?::(?<width>[^=]*))?(?:=(?<default>.*))?$").unwrap());
static WIDTH_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?<pad>[0 ])?(?<size>[0-9]+)$").unwrap());

/// Largest width a variable may ask for. Far beyond any file name limit, and
/// small enough that padding out to it can't exhaust memory.
pub const MAX_WIDTH: usize = u16::MAX as usize;

/// How a value shorter than its [`Width`] is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// Left-pad with `0`.
    Zero,
    /// Left-pad with spaces.
    Space,
    /// Truncate only; short values are left alone.
    None,
}
impl Padding {
    fn fill(self) -> Option<char> {
        match self {
            Self::Zero => Some('0'),
            Self::Space => Some(' '),
            Self::None => None,
        }
    }
}

/// Fixed width of a rendered variable, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Width {
    pub size: usize,
    pub padding: Padding,
}
impl Width {
    fn apply(self, value: &str) -> String {
        let truncated: String = value.chars().take(self.size).collect();
        let Some(fill) = self.padding.fill() else {
            return truncated;
        };
        let missing = self.size - truncated.chars().count();
        let mut padded = String::with_capacity(truncated.len() + missing);
        padded.extend(std::iter::repeat_n(fill, missing));
        padded.push_str(&truncated);
        padded
    }
}

/// One piece of a compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied into the path as-is.
    Literal(String),
    /// A metadata field substituted into the path.
    Variable {
        /// Field name as written in the template. Looked up ignoring case.
        name: String,
        width: Option<Width>,
        /// Text used when the field is missing. When the template doesn't
        /// give one, the field renders as `"<name> unknown"`, or as nothing
        /// (before padding) if it has a width.
        default: Option<String>,
    },
}

impl Segment {
    /// Parse a variable token. `token` is the whole token including its angle
    /// brackets (for error messages), `inner` is the text between them.
    pub(crate) fn variable(token: &str, inner: &str) -> Result<Self> {
        let malformed = |reason| {
            exn::Exn::from(ErrorKind::MalformedPattern {
                token: token.to_string(),
                reason,
            })
        };
        let captures = TOKEN_REGEX.captures(inner).ok_or_else(|| malformed("not a valid variable"))?;
        let name = &captures["name"];
        if name.is_empty() {
            return Err(malformed("empty variable name"));
        }
        let width = match captures.name("width").map(|m| m.as_str()) {
            None => None,
            Some("") => return Err(malformed("missing width after `:`")),
            Some(width) if width.contains(':') => return Err(malformed("more than one width")),
            Some(width) => Some(Self::width(width).map_err(malformed)?),
        };
        Ok(Self::Variable {
            name: name.to_string(),
            width,
            default: captures.name("default").map(|m| m.as_str().to_string()),
        })
    }

    fn width(spec: &str) -> std::result::Result<Width, &'static str> {
        let captures = WIDTH_REGEX.captures(spec).ok_or("width must be a number")?;
        // Only digits get this far, so a failed parse means it overflowed.
        let size = captures["size"]
            .parse::<usize>()
            .ok()
            .filter(|size| *size <= MAX_WIDTH)
            .ok_or("width too large")?;
        let padding = match captures.name("pad").map(|m| m.as_str()) {
            Some("0") => Padding::Zero,
            Some(" ") => Padding::Space,
            _ => Padding::None,
        };
        Ok(Width { size, padding })
    }

    pub(crate) fn render(&self, metadata: &MetadataMap, out: &mut String) {
        match self {
            Self::Literal(text) => out.push_str(text),
            Self::Variable { name, width, default } => {
                let value = match (metadata.get(name), default, width) {
                    (Some(value), _, _) => Cow::Borrowed(value),
                    (None, Some(default), _) => Cow::Borrowed(default.as_str()),
                    // A fixed-width field pads out from nothing: `<track:02>` is `00`.
                    (None, None, Some(_)) => Cow::Borrowed(""),
                    (None, None, None) => Cow::Owned(format!("{name} unknown")),
                };
                match width {
                    Some(width) => out.push_str(&width.apply(&value)),
                    None => out.push_str(&value),
                }
            },
        }
    }
}
