//! Object store backend.
//!
//! Keys are normalized store paths, leading `/` included. There is no
//! native directory concept: directories are simulated with prefix
//! listings (`dir + "/"`), and depth and dotfile filtering happen here
//! rather than in the remote store.
//!
//! Keys written by other tools that are not in normalized form (`/d//x`,
//! `/d/./x`) cannot be addressed by path, so `list` leaves them out.
//! Destroying a directory still deletes them, by their raw key.
//!
//! Client failures are folded into the contract's error shape:
//!
//! | operation | missing key | transport failure |
//! |---|---|---|
//! | `has` | `false` | `false` |
//! | `read`, `get_metadata`, `destroy` | `NotFound` | `NotFound` (logged) |
//! | `write`, `list` | n/a | `Backend` |

use async_trait::async_trait;

use versastore_core::{
    FileContent, FileStore, ListOptions, Metadata, StoreError, StoreFile, StorePath, StoreResult,
    Target, filter_listing, normalize,
};

use crate::client::{ObjectClient, ObjectError, ObjectHead};

/// Store backed by one bucket of a flat object namespace.
#[derive(Debug, Clone)]
pub struct ObjectStore<C> {
    client: C,
    bucket: String,
}

impl<C: ObjectClient> ObjectStore<C> {
    pub fn new(client: C, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fold a client error on a lookup into `NotFound`.
    fn not_found(&self, path: &StorePath, err: ObjectError) -> StoreError {
        match &err {
            ObjectError::NotFound(_) => {
                tracing::debug!(bucket = %self.bucket, path = %path, "no such key");
            }
            ObjectError::Transport(msg) => {
                tracing::warn!(
                    bucket = %self.bucket,
                    path = %path,
                    error = %msg,
                    "object store unreachable, reporting as not found"
                );
            }
        }
        StoreError::not_found(path.as_str())
    }

    async fn head(&self, path: &StorePath) -> StoreResult<ObjectHead> {
        self.client
            .head_object(&self.bucket, path.as_str())
            .await
            .map_err(|e| self.not_found(path, e))
    }

    fn to_metadata(head: ObjectHead) -> Metadata {
        Metadata {
            content_type: head.content_type.filter(|ct| !ct.is_empty()),
            size: head.content_length,
            last_modified: head.last_modified,
            ..Metadata::default()
        }
    }

    /// Raw keys of every object under a directory prefix.
    async fn keys_under(&self, dir: &StorePath) -> Result<Vec<String>, ObjectError> {
        let prefix = dir.child_prefix();
        let objects = self.client.list_objects(&self.bucket, &prefix).await?;
        Ok(objects
            .into_iter()
            .map(|object| object.key)
            .filter(|key| key.starts_with(&prefix))
            .collect())
    }
}

#[async_trait]
impl<C: ObjectClient> FileStore for ObjectStore<C> {
    fn backend_name(&self) -> &'static str {
        "object"
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket), name = "object.has")]
    async fn has(&self, path: &str) -> bool {
        let path = normalize(path);
        self.head(&path).await.is_ok()
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket), name = "object.get_metadata")]
    async fn get_metadata(&self, path: &str) -> StoreResult<Metadata> {
        let path = normalize(path);
        let head = self.head(&path).await?;
        Ok(Self::to_metadata(head))
    }

    #[tracing::instrument(
        skip(self, file, metadata),
        fields(bucket = %self.bucket, path = %file.path()),
        name = "object.write"
    )]
    async fn write(&self, file: StoreFile, metadata: Option<Metadata>) -> StoreResult<()> {
        if file.path().is_root() {
            return Err(StoreError::invalid_path(file.path().as_str()));
        }
        let content_type = metadata.and_then(|m| m.content_type);
        self.client
            .put_object(
                &self.bucket,
                file.path().as_str(),
                file.content().to_bytes(),
                content_type.as_deref(),
            )
            .await
            .map_err(|e| StoreError::backend(format!("put {}: {e}", file.path())))
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket), name = "object.read")]
    async fn read(&self, path: &str) -> StoreResult<StoreFile> {
        let path = normalize(path);
        let body = self
            .client
            .get_object(&self.bucket, path.as_str())
            .await
            .map_err(|e| self.not_found(&path, e))?;
        Ok(StoreFile::new(path, FileContent::Buffer(body)))
    }

    #[tracing::instrument(
        skip(self, target),
        fields(bucket = %self.bucket, path = %target.path()),
        name = "object.destroy"
    )]
    async fn destroy(&self, target: Target<'_>) -> StoreResult<()> {
        let path = target.path();

        // Deleting a missing key succeeds remotely, so look before deleting.
        match self.client.head_object(&self.bucket, path.as_str()).await {
            Ok(_) => {
                return self
                    .client
                    .delete_object(&self.bucket, path.as_str())
                    .await
                    .map_err(|e| self.not_found(&path, e));
            }
            Err(ObjectError::NotFound(_)) => {}
            Err(e) => return Err(self.not_found(&path, e)),
        }

        // Not an object: treat it as a directory prefix.
        let keys = self
            .keys_under(&path)
            .await
            .map_err(|e| self.not_found(&path, e))?;
        if keys.is_empty() {
            return Err(StoreError::not_found(path.as_str()));
        }

        tracing::debug!(count = keys.len(), "deleting prefix");
        for key in &keys {
            self.client
                .delete_object(&self.bucket, key)
                .await
                .map_err(|e| self.not_found(&path, e))?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket), name = "object.list")]
    async fn list(&self, dir: &str, options: ListOptions) -> StoreResult<Vec<StorePath>> {
        let dir = normalize(dir);
        let keys = self
            .keys_under(&dir)
            .await
            .map_err(|e| StoreError::backend(format!("list {dir}: {e}")))?;

        let paths = keys.into_iter().filter_map(|key| {
            let path = normalize(&key);
            if path.as_str() == key {
                Some(path)
            } else {
                tracing::debug!(key = %key, "skipping key not in normalized form");
                None
            }
        });
        Ok(filter_listing(&dir, paths, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBucket;
    use bytes::Bytes;
    use std::sync::Arc;

    fn setup() -> (ObjectStore<Arc<MemoryBucket>>, Arc<MemoryBucket>) {
        let bucket = Arc::new(MemoryBucket::new());
        (ObjectStore::new(bucket.clone(), "assets"), bucket)
    }

    #[tokio::test]
    async fn test_keys_are_normalized_paths() {
        let (store, bucket) = setup();
        store
            .write(StoreFile::new("img//logo.png", "png"), None)
            .await
            .unwrap();

        assert!(bucket.head_object("assets", "/img/logo.png").await.is_ok());
    }

    #[tokio::test]
    async fn test_content_type_passed_through() {
        let (store, _bucket) = setup();
        store
            .write(
                StoreFile::new("a.json", "{}"),
                Some(Metadata::new().with_content_type("application/json")),
            )
            .await
            .unwrap();

        let meta = store.get_metadata("a.json").await.unwrap();
        assert_eq!(meta.content_type.as_deref(), Some("application/json"));
        assert_eq!(meta.size, Some(2));
        assert!(meta.last_modified.is_some());
        assert!(meta.last_accessed.is_none());
        assert!(meta.created.is_none());
    }

    #[tokio::test]
    async fn test_empty_content_type_and_zero_size() {
        let (store, bucket) = setup();
        bucket
            .put_object("assets", "/empty", Bytes::new(), Some(""))
            .await
            .unwrap();

        let meta = store.get_metadata("/empty").await.unwrap();
        assert!(meta.content_type.is_none());
        assert_eq!(meta.size, Some(0));
    }

    #[tokio::test]
    async fn test_each_operation_is_one_request() {
        let (store, bucket) = setup();

        store.write(StoreFile::new("/k", "v"), None).await.unwrap();
        assert_eq!(bucket.requests(), 1);
        store.read("/k").await.unwrap();
        assert_eq!(bucket.requests(), 2);
        store.get_metadata("/k").await.unwrap();
        assert_eq!(bucket.requests(), 3);
        store.list("/", ListOptions::default()).await.unwrap();
        assert_eq!(bucket.requests(), 4);
    }

    #[tokio::test]
    async fn test_transport_failures_fold_into_not_found() {
        let (store, bucket) = setup();
        store.write(StoreFile::new("/k", "v"), None).await.unwrap();

        bucket.fail_next(1);
        assert!(!store.has("/k").await);

        bucket.fail_next(1);
        assert!(store.read("/k").await.unwrap_err().is_not_found());

        bucket.fail_next(1);
        assert!(store.get_metadata("/k").await.unwrap_err().is_not_found());

        bucket.fail_next(1);
        assert!(store.destroy("/k".into()).await.unwrap_err().is_not_found());

        // Nothing was lost.
        assert!(store.has("/k").await);
    }

    #[tokio::test]
    async fn test_write_and_list_failures_propagate() {
        let (store, bucket) = setup();

        bucket.fail_next(1);
        let err = store
            .write(StoreFile::new("/k", "v"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));

        bucket.fail_next(1);
        let err = store.list("/", ListOptions::RECURSIVE).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_list_ignores_sibling_prefixes() {
        let (store, _bucket) = setup();
        for path in ["/a/1.txt", "/ab/2.txt", "/a.txt"] {
            store.write(StoreFile::new(path, "x"), None).await.unwrap();
        }

        let paths = store.list("/a", ListOptions::RECURSIVE).await.unwrap();
        assert_eq!(paths, vec![normalize("/a/1.txt")]);
    }

    #[tokio::test]
    async fn test_list_accepts_relative_dir() {
        let (store, bucket) = setup();
        bucket
            .put_object("assets", "/docs/readme.md", Bytes::from_static(b"x"), None)
            .await
            .unwrap();

        let paths = store.list("docs", ListOptions::default()).await.unwrap();
        assert_eq!(paths, vec![normalize("/docs/readme.md")]);
    }

    #[tokio::test]
    async fn test_destroy_prefix_deletes_every_key() {
        let (store, bucket) = setup();
        for path in ["/d/1", "/d/e/2", "/d/.f/3", "/other"] {
            store.write(StoreFile::new(path, "x"), None).await.unwrap();
        }

        store.destroy("/d".into()).await.unwrap();

        assert_eq!(bucket.object_count(), 1);
        assert!(store.has("/other").await);
    }

    #[tokio::test]
    async fn test_unnormalized_keys_are_hidden_but_destroyed() {
        let (store, bucket) = setup();
        bucket
            .put_object("assets", "/d//x.txt", Bytes::from_static(b"x"), None)
            .await
            .unwrap();
        store.write(StoreFile::new("/d/y.txt", "y"), None).await.unwrap();

        let paths = store.list("/d", ListOptions::RECURSIVE).await.unwrap();
        assert_eq!(paths, vec![normalize("/d/y.txt")]);

        store.destroy("/d".into()).await.unwrap();
        assert_eq!(bucket.object_count(), 0);
        assert!(store.destroy("/d".into()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_write_to_root_sends_nothing() {
        let (store, bucket) = setup();

        let err = store.write(StoreFile::new("/", "x"), None).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
        assert_eq!(bucket.requests(), 0);
        assert_eq!(bucket.object_count(), 0);
    }

    #[derive(Clone, Default)]
    struct SpanNames(Arc<std::sync::Mutex<Vec<&'static str>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for SpanNames {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::span::Id,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            self.0.lock().unwrap().push(attrs.metadata().name());
        }
    }

    #[tokio::test]
    async fn test_every_operation_is_traced() {
        use tracing_subscriber::layer::SubscriberExt;

        let names = SpanNames::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(names.clone()));
        let (store, _bucket) = setup();

        store.write(StoreFile::new("a.txt", "x"), None).await.unwrap();
        store.has("a.txt").await;
        store.get_metadata("a.txt").await.unwrap();
        store.read("a.txt").await.unwrap();
        store.list("/", ListOptions::default()).await.unwrap();
        store.destroy("a.txt".into()).await.unwrap();

        assert_eq!(
            *names.0.lock().unwrap(),
            vec![
                "object.write",
                "object.has",
                "object.get_metadata",
                "object.read",
                "object.list",
                "object.destroy",
            ]
        );
    }
}
