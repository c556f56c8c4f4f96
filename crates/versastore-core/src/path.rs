//! Logical store paths.
//!
//! Every backend keys files by the same canonical form: a single leading
//! `/`, no duplicate separators, no trailing separator (except the root),
//! and no `.`/`..` segments. Normalization is purely lexical and never
//! touches a backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path separator used by every backend.
pub const SEPARATOR: char = '/';

/// A normalized, absolute store path.
///
/// Construct with [`normalize`] (or any `From` conversion, which
/// normalizes). Two paths are equal iff their normalized forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StorePath(String);

/// Canonicalize any string into a [`StorePath`].
///
/// Never fails. `..` above the root is dropped, so `"../a"` becomes `"/a"`.
pub fn normalize(path: &str) -> StorePath {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in &segments {
        normalized.push(SEPARATOR);
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push(SEPARATOR);
    }
    StorePath(normalized)
}

impl StorePath {
    /// The root path `/`.
    pub fn root() -> Self {
        Self(SEPARATOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Path segments, root excluded.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Number of segments below the root (`/` is 0, `/a/b` is 2).
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Last segment, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Parent directory, or `None` for the root.
    pub fn parent(&self) -> Option<StorePath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(0) | None => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
        }
    }

    /// Join a relative child onto this path and normalize the result.
    pub fn join(&self, child: &str) -> StorePath {
        normalize(&format!("{}{}{}", self.0, SEPARATOR, child))
    }

    /// True if any segment starts with `.`.
    pub fn is_hidden(&self) -> bool {
        self.segments().any(|s| s.starts_with('.'))
    }

    /// The prefix every descendant key starts with: `/a/b/` for `/a/b`,
    /// and `/` for the root.
    pub fn child_prefix(&self) -> String {
        if self.is_root() {
            self.0.clone()
        } else {
            format!("{}{}", self.0, SEPARATOR)
        }
    }

    /// True if this path lies strictly below `dir`.
    pub fn is_descendant_of(&self, dir: &StorePath) -> bool {
        self != dir && self.0.starts_with(&dir.child_prefix())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for StorePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StorePath {
    fn from(path: &str) -> Self {
        normalize(path)
    }
}

impl From<String> for StorePath {
    fn from(path: String) -> Self {
        normalize(&path)
    }
}

impl From<&String> for StorePath {
    fn from(path: &String) -> Self {
        normalize(path)
    }
}

impl From<StorePath> for String {
    fn from(path: StorePath) -> Self {
        path.0
    }
}

impl PartialEq<str> for StorePath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StorePath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
