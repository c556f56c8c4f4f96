//! In-process object service.
//!
//! Behaves like a flat S3-style namespace: keys are opaque strings, there
//! are no directories, deleting a missing key succeeds, and listing is by
//! raw string prefix. Supports injecting transport failures for tests.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::SystemTime;

use crate::client::{ObjectClient, ObjectError, ObjectHead, ObjectInfo, ObjectResult};

#[derive(Debug, Clone)]
struct StoredObject {
    body: Bytes,
    content_type: Option<String>,
    last_modified: SystemTime,
}

/// In-memory [`ObjectClient`] holding any number of buckets.
#[derive(Debug, Default)]
pub struct MemoryBucket {
    objects: DashMap<(String, String), StoredObject>,
    pending_failures: AtomicUsize,
    requests: AtomicU64,
}

impl MemoryBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` requests fail with a transport error.
    pub fn fail_next(&self, count: usize) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    /// Total requests served (including failed ones).
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Number of objects across all buckets.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn begin(&self, op: &str) -> ObjectResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let injected = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(ObjectError::transport(format!("{op}: injected failure")));
        }
        Ok(())
    }

    fn id(bucket: &str, key: &str) -> (String, String) {
        (bucket.to_string(), key.to_string())
    }
}

#[async_trait]
impl ObjectClient for MemoryBucket {
    async fn head_object(&self, bucket: &str, key: &str) -> ObjectResult<ObjectHead> {
        self.begin("HeadObject")?;
        let object = self
            .objects
            .get(&Self::id(bucket, key))
            .ok_or_else(|| ObjectError::NotFound(key.to_string()))?;
        Ok(ObjectHead {
            content_type: object.content_type.clone(),
            content_length: Some(object.body.len() as u64),
            last_modified: Some(object.last_modified),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> ObjectResult<Bytes> {
        self.begin("GetObject")?;
        self.objects
            .get(&Self::id(bucket, key))
            .map(|object| object.body.clone())
            .ok_or_else(|| ObjectError::NotFound(key.to_string()))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> ObjectResult<()> {
        self.begin("PutObject")?;
        self.objects.insert(
            Self::id(bucket, key),
            StoredObject {
                body,
                content_type: content_type.map(str::to_string),
                last_modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> ObjectResult<()> {
        self.begin("DeleteObject")?;
        self.objects.remove(&Self::id(bucket, key));
        Ok(())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> ObjectResult<Vec<ObjectInfo>> {
        self.begin("ListObjects")?;
        let mut objects: Vec<ObjectInfo> = self
            .objects
            .iter()
            .filter(|entry| entry.key().0 == bucket && entry.key().1.starts_with(prefix))
            .map(|entry| ObjectInfo {
                key: entry.key().1.clone(),
                size: entry.value().body.len() as u64,
                last_modified: Some(entry.value().last_modified),
            })
            .collect();
        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_head_get() {
        let bucket = MemoryBucket::new();
        bucket
            .put_object("b", "/k", Bytes::from_static(b"body"), Some("text/plain"))
            .await
            .unwrap();

        let head = bucket.head_object("b", "/k").await.unwrap();
        assert_eq!(head.content_length, Some(4));
        assert_eq!(head.content_type.as_deref(), Some("text/plain"));
        assert_eq!(bucket.get_object("b", "/k").await.unwrap(), "body");
    }

    #[tokio::test]
    async fn test_buckets_are_isolated() {
        let bucket = MemoryBucket::new();
        bucket
            .put_object("one", "/k", Bytes::from_static(b"1"), None)
            .await
            .unwrap();

        assert_eq!(
            bucket.head_object("two", "/k").await.unwrap_err(),
            ObjectError::NotFound("/k".into())
        );
        assert!(bucket.list_objects("two", "/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_key_succeeds() {
        let bucket = MemoryBucket::new();
        bucket.delete_object("b", "/nothing").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_is_raw_prefix() {
        let bucket = MemoryBucket::new();
        for key in ["/a/1", "/ab", "/b"] {
            bucket
                .put_object("b", key, Bytes::new(), None)
                .await
                .unwrap();
        }

        let keys: Vec<_> = bucket
            .list_objects("b", "/a")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, vec!["/a/1", "/ab"]);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let bucket = MemoryBucket::new();
        bucket.fail_next(2);

        assert!(matches!(
            bucket.get_object("b", "/k").await,
            Err(ObjectError::Transport(_))
        ));
        assert!(matches!(
            bucket.list_objects("b", "/").await,
            Err(ObjectError::Transport(_))
        ));
        assert!(bucket.list_objects("b", "/").await.is_ok());
        assert_eq!(bucket.requests(), 3);
    }
}
