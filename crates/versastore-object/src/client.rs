//! Object-store client seam.
//!
//! [`ObjectStore`](crate::ObjectStore) talks to a remote bucket only through
//! this trait. Real implementations wrap an S3-compatible SDK and own
//! authentication and retries; [`MemoryBucket`](crate::MemoryBucket) is an
//! in-process implementation.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;

/// Object-store client error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ObjectError {
    /// The key does not exist in the bucket.
    #[error("no such key: {0}")]
    NotFound(String),

    /// The request did not complete (network, auth, throttling).
    #[error("transport error: {0}")]
    Transport(String),
}

impl ObjectError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

pub type ObjectResult<T> = Result<T, ObjectError>;

/// Object metadata from HEAD requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectHead {
    /// Content type recorded at upload, possibly empty.
    pub content_type: Option<String>,
    /// Object size in bytes.
    pub content_length: Option<u64>,
    pub last_modified: Option<SystemTime>,
}

/// An object from a prefix listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<SystemTime>,
}

/// Low-level bucket operations.
///
/// Each method maps to one remote request. `list_objects` returns every
/// key under the prefix; pagination is the client's concern.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    async fn head_object(&self, bucket: &str, key: &str) -> ObjectResult<ObjectHead>;

    async fn get_object(&self, bucket: &str, key: &str) -> ObjectResult<Bytes>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> ObjectResult<()>;

    /// Delete a key. Deleting a missing key succeeds, as on S3.
    async fn delete_object(&self, bucket: &str, key: &str) -> ObjectResult<()>;

    async fn list_objects(&self, bucket: &str, prefix: &str) -> ObjectResult<Vec<ObjectInfo>>;
}

#[async_trait]
impl<T: ObjectClient + ?Sized> ObjectClient for Arc<T> {
    async fn head_object(&self, bucket: &str, key: &str) -> ObjectResult<ObjectHead> {
        (**self).head_object(bucket, key).await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> ObjectResult<Bytes> {
        (**self).get_object(bucket, key).await
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> ObjectResult<()> {
        (**self).put_object(bucket, key, body, content_type).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> ObjectResult<()> {
        (**self).delete_object(bucket, key).await
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> ObjectResult<Vec<ObjectInfo>> {
        (**self).list_objects(bucket, prefix).await
    }
}
