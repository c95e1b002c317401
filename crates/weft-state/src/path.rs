//! Slash-delimited paths into the data model document.
//!
//! A path is a parsed sequence of segments, each addressing an object key or
//! an array index. Paths arrive over the wire as strings (`"/form/agreed"`)
//! and are parsed once up front; traversal never re-splits strings.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single path segment.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Seg {
    /// Object key access.
    Key(String),
    /// Array index access. Against an object the segment falls back to its
    /// decimal string form, so numeric-looking keys stay addressable.
    Index(usize),
}

impl Seg {
    /// Create a key segment.
    #[inline]
    pub fn key(k: impl Into<String>) -> Self {
        Seg::Key(k.into())
    }

    /// Create an index segment.
    #[inline]
    pub fn index(i: usize) -> Self {
        Seg::Index(i)
    }

    /// Get the key if this is a key segment.
    #[inline]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Seg::Key(k) => Some(k),
            Seg::Index(_) => None,
        }
    }

    /// Get the index if this is an index segment.
    #[inline]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Seg::Key(_) => None,
            Seg::Index(i) => Some(*i),
        }
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => f.write_str(k),
            Seg::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

impl From<String> for Seg {
    fn from(s: String) -> Self {
        Seg::Key(s)
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

/// A complete parsed path into the data model document.
///
/// The empty path denotes the document root.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path(Vec<Seg>);

impl Path {
    /// The root path (no segments).
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a `/`-delimited path string.
    ///
    /// `""` and `"/"` both denote the root. Empty segments are skipped, so
    /// `/a//b` is equivalent to `/a/b` — the normalization is deliberate and
    /// relied upon by callers that join path fragments naively. A segment
    /// consisting solely of ASCII digits parses as an array index.
    pub fn parse(raw: &str) -> Self {
        let mut segs = Vec::new();
        for part in raw.split('/') {
            if part.is_empty() {
                continue;
            }
            match part.parse::<usize>() {
                Ok(i) if part.chars().all(|c| c.is_ascii_digit()) => segs.push(Seg::Index(i)),
                _ => segs.push(Seg::Key(part.to_owned())),
            }
        }
        Self(segs)
    }

    /// Create a path from a vector of segments.
    #[inline]
    pub fn from_segments(segments: Vec<Seg>) -> Self {
        Self(segments)
    }

    /// Append a key segment (builder).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(Seg::Key(k.into()));
        self
    }

    /// Append an index segment (builder).
    #[inline]
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Seg::Index(i));
        self
    }

    /// Push a segment (mutating).
    #[inline]
    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    /// The parsed segments.
    #[inline]
    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    /// True for the root path.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The path without its last segment, or `None` at the root.
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            Some(Path(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Whether this path is a prefix of `other` (a path prefixes itself).
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Join another path onto this one.
    pub fn join(&self, other: &Path) -> Path {
        let mut segs = self.0.clone();
        segs.extend(other.0.iter().cloned());
        Path(segs)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for seg in &self.0 {
            write!(f, "/{}", seg)?;
        }
        Ok(())
    }
}

impl From<&str> for Path {
    fn from(raw: &str) -> Self {
        Path::parse(raw)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if !raw.is_empty() && !raw.starts_with('/') {
            return Err(D::Error::custom(format!(
                "path must start with '/' or be empty, got {raw:?}"
            )));
        }
        Ok(Path::parse(&raw))
    }
}

/// Construct a [`Path`] from literal segments.
///
/// ```
/// use weft_state::path;
///
/// let p = path!("items", 0, "label");
/// assert_eq!(p.to_string(), "/items/0/label");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($crate::Seg::from($seg));
        )+
        p
    }};
}
