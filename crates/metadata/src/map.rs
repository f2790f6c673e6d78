use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Flat, immutable view of a file's metadata.
///
/// Keys are lower-cased and values trimmed on the way in, so lookups never
/// have to care how the source spelled a field (`ALBUM`, `Album`, ` album `).
/// Keys are unique; when a field appears more than once while building the
/// map, the last value wins. Fields with an empty name are dropped, fields
/// with an empty value are kept.
///
/// There is deliberately no way to mutate a map once it's built.
///
/// ```
/// use jewelled_metadata::MetadataMap;
///
/// let map = MetadataMap::from([("ARTIST", "  Foo "), ("Title", "Bar")]);
/// assert_eq!(map.get("artist"), Some("Foo"));
/// assert_eq!(map.get("TITLE"), Some("Bar"));
/// assert_eq!(map.get("album"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataMap(BTreeMap<String, String>);
impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a field by name, ignoring case.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(&field.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(field, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for MetadataMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = BTreeMap::new();
        for (key, value) in iter {
            let key = key.as_ref().trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            map.insert(key, value.as_ref().trim().to_string());
        }
        Self(map)
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> From<[(K, V); N]> for MetadataMap {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Display for MetadataMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value:?}")?;
            first = false;
        }
        Ok(())
    }
}
