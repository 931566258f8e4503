//! Hierarchical path values.
//!
//! A [`Path`] is parsed once from a separator-delimited string into three
//! views: the full string, the leaf name and the leaf extension. Identity is
//! the full string alone; `name` and `ext` are derived and never compared on
//! their own.
//!
//! ```text
//! "/docs/archive/file.tar.gz"
//!   full = "/docs/archive/file.tar.gz"
//!   leaf = "file.tar.gz"      (after the last segment separator)
//!   name = "file.tar"         (before the last extension separator)
//!   ext  = "gz"
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Segment and extension separators used to parse a [`Path`].
///
/// Fixed at construction time and carried by each `Path` so lexical helpers
/// like [`Path::join`] split and build strings the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Separators {
    /// Separates path segments (`/`).
    pub segment: char,
    /// Separates a leaf's name from its extension (`.`).
    pub extension: char,
}

impl Separators {
    /// `/` between segments, `.` before the extension.
    pub const DEFAULT: Separators = Separators {
        segment: '/',
        extension: '.',
    };
}

impl Default for Separators {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An immutable location in a hierarchical namespace.
#[derive(Clone)]
pub struct Path {
    full: String,
    /// Byte offset where the leaf starts.
    leaf_start: usize,
    /// Byte offset of the extension separator inside the leaf, if any.
    ext_sep: Option<usize>,
    seps: Separators,
}

impl Path {
    /// Parse `raw` with the default separators. Never fails.
    pub fn new(raw: impl Into<String>) -> Self {
        Self::with_separators(raw, Separators::DEFAULT)
    }

    /// Parse `raw` with explicit separators. Never fails.
    pub fn with_separators(raw: impl Into<String>, seps: Separators) -> Self {
        let full = raw.into();
        let leaf_start = full
            .rfind(seps.segment)
            .map(|i| i + seps.segment.len_utf8())
            .unwrap_or(0);
        let ext_sep = full[leaf_start..]
            .rfind(seps.extension)
            .map(|i| leaf_start + i);
        Self {
            full,
            leaf_start,
            ext_sep,
            seps,
        }
    }

    /// The complete path string.
    pub fn path(&self) -> &str {
        &self.full
    }

    /// The leaf, up to but excluding the last extension separator.
    pub fn name(&self) -> &str {
        match self.ext_sep {
            Some(sep) => &self.full[self.leaf_start..sep],
            None => self.leaf(),
        }
    }

    /// Everything after the last extension separator of the leaf, or `""`.
    pub fn ext(&self) -> &str {
        match self.ext_sep {
            Some(sep) => &self.full[sep + self.seps.extension.len_utf8()..],
            None => "",
        }
    }

    /// The final segment, name and extension together.
    pub fn leaf(&self) -> &str {
        &self.full[self.leaf_start..]
    }

    pub fn separators(&self) -> Separators {
        self.seps
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    /// True if the path starts with the segment separator.
    pub fn is_absolute(&self) -> bool {
        self.full.starts_with(self.seps.segment)
    }

    /// True for the bare segment separator, the canonical root.
    pub fn is_root(&self) -> bool {
        let mut chars = self.full.chars();
        chars.next() == Some(self.seps.segment) && chars.next().is_none()
    }

    /// Non-empty segments, left to right.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.full.split(self.seps.segment).filter(|s| !s.is_empty())
    }

    /// Canonical form: the root, or `/` followed by non-empty segments with
    /// no trailing separator.
    pub fn is_canonical(&self) -> bool {
        if self.is_root() {
            return true;
        }
        self.is_absolute()
            && self.full[self.seps.segment.len_utf8()..]
                .split(self.seps.segment)
                .all(|s| !s.is_empty())
    }

    /// Append one segment, inserting a separator when needed.
    pub fn join(&self, segment: &str) -> Path {
        let mut full = self.full.clone();
        if !full.is_empty() && !full.ends_with(self.seps.segment) {
            full.push(self.seps.segment);
        }
        full.push_str(segment);
        Path::with_separators(full, self.seps)
    }

    /// Same parent, different leaf.
    pub fn with_leaf(&self, leaf: &str) -> Path {
        let mut full = self.full[..self.leaf_start].to_string();
        full.push_str(leaf);
        Path::with_separators(full, self.seps)
    }

    /// The path with its leaf removed, without consulting any filesystem.
    ///
    /// Returns `None` for the root and for paths that have no separator.
    pub fn lexical_parent(&self) -> Option<Path> {
        if self.is_root() || self.leaf_start == 0 {
            return None;
        }
        let sep_len = self.seps.segment.len_utf8();
        let head = &self.full[..self.leaf_start - sep_len];
        if head.is_empty() {
            // "/a" -> "/"
            return Some(Path::with_separators(self.seps.segment, self.seps));
        }
        Some(Path::with_separators(head, self.seps))
    }

    /// Segment-wise ancestry: `/a` is an ancestor of `/a/b` but not of `/ab`.
    /// A path is not its own ancestor.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        let mut mine = self.segments();
        let mut theirs = other.segments();
        loop {
            match (mine.next(), theirs.next()) {
                (None, Some(_)) => return true,
                (None, None) => return false,
                (Some(_), None) => return false,
                (Some(a), Some(b)) if a != b => return false,
                _ => {}
            }
        }
    }
}

/// Whether `segment` can name a single entry: non-empty, not `.` or `..`,
/// and free of the segment separator.
pub fn is_valid_segment(segment: &str, seps: Separators) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains(seps.segment)
}

impl Default for Path {
    fn default() -> Self {
        Path::new("")
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.full == other.full
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full.hash(state);
    }
}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Path {
    fn cmp(&self, other: &Self) -> Ordering {
        self.full.cmp(&other.full)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Path").field(&self.full).finish()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.full
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Path::new(s)
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Path::new(s)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.full)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Path::new)
    }
}
