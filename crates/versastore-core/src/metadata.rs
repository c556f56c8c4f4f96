//! Backend-reported file metadata.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// File metadata.
///
/// Fields are present only when the backend can supply them. Disk stores
/// fill all five; memory stores return what the caller attached at write
/// time; object stores report `content_type`, `size` and `last_modified`.
/// `size` always equals the byte length of the stored content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<SystemTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<SystemTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<SystemTime>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_last_modified(mut self, time: SystemTime) -> Self {
        self.last_modified = Some(time);
        self
    }

    pub fn with_last_accessed(mut self, time: SystemTime) -> Self {
        self.last_accessed = Some(time);
        self
    }

    pub fn with_created(mut self, time: SystemTime) -> Self {
        self.created = Some(time);
        self
    }

    /// Names of the fields that are present, in declaration order.
    ///
    /// Used to check the metadata shape a backend reports.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.content_type.is_some() {
            fields.push("content_type");
        }
        if self.size.is_some() {
            fields.push("size");
        }
        if self.last_modified.is_some() {
            fields.push("last_modified");
        }
        if self.last_accessed.is_some() {
            fields.push("last_accessed");
        }
        if self.created.is_some() {
            fields.push("created");
        }
        fields
    }
}
