//! In-memory backend.
//!
//! Used for tests and ephemeral scratch storage. All data is lost when the
//! store is dropped. Directories are never stored; they exist only as
//! shared path prefixes of the stored keys.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use versastore_core::{
    FileContent, FileStore, ListOptions, Metadata, StoreError, StoreFile, StorePath, StoreResult,
    Target, filter_listing, normalize,
};

/// A stored file.
#[derive(Debug, Clone)]
struct Entry {
    content: FileContent,
    metadata: Metadata,
}

/// In-memory store.
///
/// Thread-safe via an internal `RwLock`: every mutation takes the write
/// lock, reads clone out of a read guard.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<StorePath, Entry>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with files and their metadata.
    ///
    /// Later entries replace earlier ones with the same normalized path.
    /// Entries for the root path are dropped, since `write` rejects them.
    pub fn with_files(files: impl IntoIterator<Item = (StoreFile, Metadata)>) -> Self {
        let entries = files
            .into_iter()
            .filter(|(file, _)| !file.path().is_root())
            .map(|(file, metadata)| {
                let (path, content) = file.into_parts();
                (path, Entry { content, metadata })
            })
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    #[tracing::instrument(skip(self), name = "memory.has")]
    async fn has(&self, path: &str) -> bool {
        self.entries.read().contains_key(&normalize(path))
    }

    #[tracing::instrument(skip(self), name = "memory.get_metadata")]
    async fn get_metadata(&self, path: &str) -> StoreResult<Metadata> {
        let path = normalize(path);
        let entries = self.entries.read();
        let entry = entries
            .get(&path)
            .ok_or_else(|| StoreError::not_found(path.as_str()))?;

        // Whatever size the caller attached, report the real one.
        let mut metadata = entry.metadata.clone();
        metadata.size = Some(entry.content.byte_len() as u64);
        Ok(metadata)
    }

    #[tracing::instrument(skip(self, file, metadata), fields(path = %file.path()), name = "memory.write")]
    async fn write(&self, file: StoreFile, metadata: Option<Metadata>) -> StoreResult<()> {
        if file.path().is_root() {
            return Err(StoreError::invalid_path(file.path().as_str()));
        }
        let (path, content) = file.into_parts();
        let entry = Entry {
            content,
            metadata: metadata.unwrap_or_default(),
        };
        self.entries.write().insert(path, entry);
        Ok(())
    }

    #[tracing::instrument(skip(self), name = "memory.read")]
    async fn read(&self, path: &str) -> StoreResult<StoreFile> {
        let path = normalize(path);
        let content = self
            .entries
            .read()
            .get(&path)
            .map(|entry| entry.content.clone())
            .ok_or_else(|| StoreError::not_found(path.as_str()))?;
        Ok(StoreFile::new(path, content))
    }

    #[tracing::instrument(skip(self, target), fields(path = %target.path()), name = "memory.destroy")]
    async fn destroy(&self, target: Target<'_>) -> StoreResult<()> {
        let path = target.path();
        let mut entries = self.entries.write();

        if entries.remove(&path).is_some() {
            return Ok(());
        }

        // Not a file: treat it as a directory and drop everything below it.
        let before = entries.len();
        entries.retain(|key, _| !key.is_descendant_of(&path));
        let removed = before - entries.len();

        if removed == 0 {
            return Err(StoreError::not_found(path.as_str()));
        }
        tracing::debug!(removed, "removed directory prefix");
        Ok(())
    }

    #[tracing::instrument(skip(self), name = "memory.list")]
    async fn list(&self, dir: &str, options: ListOptions) -> StoreResult<Vec<StorePath>> {
        let dir = normalize(dir);
        let entries = self.entries.read();
        let descendants = entries
            .keys()
            .filter(|key| key.is_descendant_of(&dir))
            .cloned();
        Ok(filter_listing(&dir, descendants, options))
    }
}
