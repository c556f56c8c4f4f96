//! Immutable file payloads.

use bytes::Bytes;
use std::borrow::Cow;

/// The bytes of a stored file.
///
/// Three representations exist so callers can hand over whatever they
/// already hold without copying. They are interchangeable: every accessor
/// describes the same underlying bytes, and equality ignores the variant.
#[derive(Debug, Clone)]
pub enum FileContent {
    /// UTF-8 text.
    Text(String),
    /// Reference-counted buffer, as returned by object-store clients.
    Buffer(Bytes),
    /// Owned byte array, as returned by disk reads.
    Raw(Vec<u8>),
}

impl FileContent {
    /// Raw byte view.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Text(s) => s.as_bytes(),
            FileContent::Buffer(b) => b,
            FileContent::Raw(v) => v,
        }
    }

    /// String view, if the bytes are valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FileContent::Text(s) => Some(s),
            _ => std::str::from_utf8(self.as_bytes()).ok(),
        }
    }

    /// String view with invalid UTF-8 replaced by U+FFFD.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        match self {
            FileContent::Text(s) => Cow::Borrowed(s),
            _ => String::from_utf8_lossy(self.as_bytes()),
        }
    }

    /// Exact length in bytes (not characters).
    pub fn byte_len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.byte_len() == 0
    }

    /// Bytes handle suitable for handing to a transport. Free for
    /// [`FileContent::Buffer`], a copy otherwise.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            FileContent::Buffer(b) => b.clone(),
            _ => Bytes::copy_from_slice(self.as_bytes()),
        }
    }

    pub fn into_vec(self) -> Vec<u8> {
        match self {
            FileContent::Text(s) => s.into_bytes(),
            FileContent::Buffer(b) => b.to_vec(),
            FileContent::Raw(v) => v,
        }
    }
}

impl Default for FileContent {
    fn default() -> Self {
        FileContent::Raw(Vec::new())
    }
}

impl PartialEq for FileContent {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for FileContent {}

impl AsRef<[u8]> for FileContent {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<String> for FileContent {
    fn from(s: String) -> Self {
        FileContent::Text(s)
    }
}

impl From<&str> for FileContent {
    fn from(s: &str) -> Self {
        FileContent::Text(s.to_string())
    }
}

impl From<Bytes> for FileContent {
    fn from(b: Bytes) -> Self {
        FileContent::Buffer(b)
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(v: Vec<u8>) -> Self {
        FileContent::Raw(v)
    }
}

impl From<&[u8]> for FileContent {
    fn from(v: &[u8]) -> Self {
        FileContent::Raw(v.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_forms(text: &str) -> [FileContent; 3] {
        [
            FileContent::Text(text.to_string()),
            FileContent::Buffer(Bytes::copy_from_slice(text.as_bytes())),
            FileContent::Raw(text.as_bytes().to_vec()),
        ]
    }

    #[test]
    fn test_representations_agree() {
        for content in all_forms("Hello World") {
            assert_eq!(content.as_bytes(), b"Hello World");
            assert_eq!(content.as_str(), Some("Hello World"));
            assert_eq!(content.to_string_lossy(), "Hello World");
            assert_eq!(content.byte_len(), 11);
            assert!(!content.is_empty());
        }
    }

    #[test]
    fn test_byte_len_counts_bytes_not_chars() {
        for content in all_forms("héllo ✓") {
            assert_eq!(content.byte_len(), "héllo ✓".len());
            assert_ne!(content.byte_len(), "héllo ✓".chars().count());
        }
    }

    #[test]
    fn test_equality_ignores_variant() {
        let [text, buffer, raw] = all_forms("same");
        assert_eq!(text, buffer);
        assert_eq!(buffer, raw);
        assert_ne!(text, FileContent::from("different"));
    }

    #[test]
    fn test_invalid_utf8() {
        let content = FileContent::Raw(vec![0x66, 0x6f, 0xff]);
        assert_eq!(content.as_str(), None);
        assert_eq!(content.to_string_lossy(), "fo\u{fffd}");
        assert_eq!(content.byte_len(), 3);
    }

    #[test]
    fn test_empty() {
        assert!(FileContent::default().is_empty());
        assert!(FileContent::from("").is_empty());
        assert!(FileContent::Buffer(Bytes::new()).is_empty());
    }

    #[test]
    fn test_to_bytes_and_into_vec() {
        let buffer = Bytes::from_static(b"abc");
        let content = FileContent::from(buffer.clone());
        assert_eq!(content.to_bytes(), buffer);
        assert_eq!(FileContent::from("abc").to_bytes(), buffer);
        assert_eq!(FileContent::from("abc").into_vec(), b"abc".to_vec());
    }
}
