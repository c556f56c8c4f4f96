//! File entities exchanged between callers and stores.

use crate::content::FileContent;
use crate::path::{StorePath, normalize};

/// A `(path, content)` pair.
///
/// The path is normalized on construction, so a file built from
/// `"test.txt"` reports `/test.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFile {
    path: StorePath,
    content: FileContent,
}

impl StoreFile {
    pub fn new(path: impl Into<StorePath>, content: impl Into<FileContent>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &StorePath {
        &self.path
    }

    pub fn content(&self) -> &FileContent {
        &self.content
    }

    /// True if the file holds at least one byte.
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    pub fn into_content(self) -> FileContent {
        self.content
    }

    pub fn into_parts(self) -> (StorePath, FileContent) {
        (self.path, self.content)
    }
}

/// What [`FileStore::destroy`](crate::FileStore::destroy) should remove:
/// a path, or a file previously returned by the store.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Path(&'a str),
    File(&'a StoreFile),
}

impl Target<'_> {
    /// Normalized path of the target.
    pub fn path(&self) -> StorePath {
        match self {
            Target::Path(p) => normalize(p),
            Target::File(f) => f.path().clone(),
        }
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(path: &'a str) -> Self {
        Target::Path(path)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(path: &'a String) -> Self {
        Target::Path(path)
    }
}

impl<'a> From<&'a StorePath> for Target<'a> {
    fn from(path: &'a StorePath) -> Self {
        Target::Path(path.as_str())
    }
}

impl<'a> From<&'a StoreFile> for Target<'a> {
    fn from(file: &'a StoreFile) -> Self {
        Target::File(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_path() {
        let file = StoreFile::new("test123.txt", "Hello World");
        assert_eq!(file.path(), &normalize("/test123.txt"));
        assert_eq!(file.content().as_str(), Some("Hello World"));
    }

    #[test]
    fn test_has_content() {
        assert!(StoreFile::new("/a", "x").has_content());
        assert!(!StoreFile::new("/.DS_Store", "").has_content());
        assert!(!StoreFile::new("/empty", Vec::<u8>::new()).has_content());
    }

    #[test]
    fn test_target_path() {
        let file = StoreFile::new("dir//file.txt", "x");
        assert_eq!(Target::from(&file).path(), "/dir/file.txt");
        assert_eq!(Target::from("dir/./file.txt").path(), "/dir/file.txt");

        let owned = String::from("a/b");
        assert_eq!(Target::from(&owned).path(), "/a/b");

        let path = normalize("x/y");
        assert_eq!(Target::from(&path).path(), path);
    }

    #[test]
    fn test_into_parts() {
        let (path, content) = StoreFile::new("a", "b").into_parts();
        assert_eq!(path, "/a");
        assert_eq!(content, FileContent::from("b"));
    }
}
