//! Local disk backend.
//!
//! Maps the store contract onto a real directory tree. Every logical path
//! is normalized and joined onto the store root, so `..` can never escape
//! it. The root path `/` is the root directory itself.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use versastore_core::{
    FileContent, FileStore, ListOptions, Metadata, StoreError, StoreFile, StorePath, StoreResult,
    Target, normalize,
};

/// Local filesystem store.
///
/// All operations are relative to `root`. For example, if `root` is
/// `/srv/files`, then `read("docs/a.txt")` reads `/srv/files/docs/a.txt`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the given directory.
    ///
    /// The root is canonicalized when it already exists (e.g. macOS `/tmp`
    /// → `/private/tmp`). It is created lazily by the first `write`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root: PathBuf = root.into();
        let root = dunce::canonicalize(&root).unwrap_or(root);
        Self { root }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a normalized logical path onto the disk.
    fn resolve(&self, path: &StorePath) -> PathBuf {
        if path.is_root() {
            return self.root.clone();
        }
        self.root.join(path.as_str().trim_start_matches('/'))
    }

    /// Stat a path that must be a regular file (symlinks followed).
    async fn file_metadata(&self, path: &StorePath) -> StoreResult<std::fs::Metadata> {
        match fs::metadata(self.resolve(path)).await {
            Ok(meta) if meta.is_file() => Ok(meta),
            Ok(_) => Err(StoreError::not_found(path.as_str())),
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "stat failed");
                Err(StoreError::not_found(path.as_str()))
            }
        }
    }

    /// Convert std::fs::Metadata to store Metadata.
    fn to_metadata(path: &StorePath, meta: &std::fs::Metadata) -> Metadata {
        let modified = meta.modified().ok();
        Metadata {
            content_type: Some(
                mime_guess::from_path(path.as_str())
                    .first_or_octet_stream()
                    .to_string(),
            ),
            size: Some(meta.len()),
            last_modified: modified,
            last_accessed: meta.accessed().ok(),
            created: meta.created().ok().or(modified),
        }
    }

    /// Remove a directory tree, children before parents, returning the
    /// number of non-directory entries removed.
    ///
    /// The store root itself is emptied but kept.
    async fn remove_tree(&self, dir: PathBuf) -> io::Result<usize> {
        let mut removed = 0;
        let mut stack = vec![(dir, false)];

        while let Some((dir, expanded)) = stack.pop() {
            if expanded {
                if dir != self.root {
                    fs::remove_dir(&dir).await?;
                }
                continue;
            }

            stack.push((dir.clone(), true));
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_dir() {
                    stack.push((entry.path(), false));
                } else {
                    fs::remove_file(entry.path()).await?;
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl FileStore for LocalStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    #[tracing::instrument(skip(self), name = "local.has")]
    async fn has(&self, path: &str) -> bool {
        let path = normalize(path);
        fs::metadata(self.resolve(&path))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self), name = "local.get_metadata")]
    async fn get_metadata(&self, path: &str) -> StoreResult<Metadata> {
        let path = normalize(path);
        let meta = self.file_metadata(&path).await?;
        Ok(Self::to_metadata(&path, &meta))
    }

    #[tracing::instrument(skip(self, file, _metadata), fields(path = %file.path()), name = "local.write")]
    async fn write(&self, file: StoreFile, _metadata: Option<Metadata>) -> StoreResult<()> {
        if file.path().is_root() {
            return Err(StoreError::invalid_path(file.path().as_str()));
        }
        let full_path = self.resolve(file.path());

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&full_path, file.content().as_bytes()).await?;

        tracing::debug!(bytes = file.content().byte_len(), "wrote file");
        Ok(())
    }

    #[tracing::instrument(skip(self), name = "local.read")]
    async fn read(&self, path: &str) -> StoreResult<StoreFile> {
        let path = normalize(path);
        self.file_metadata(&path).await?;

        let data = fs::read(self.resolve(&path)).await.map_err(|e| {
            tracing::debug!(path = %path, error = %e, "read failed");
            StoreError::not_found(path.as_str())
        })?;
        Ok(StoreFile::new(path, FileContent::Raw(data)))
    }

    #[tracing::instrument(skip(self, target), fields(path = %target.path()), name = "local.destroy")]
    async fn destroy(&self, target: Target<'_>) -> StoreResult<()> {
        let path = target.path();
        let full_path = self.resolve(&path);

        let meta = fs::symlink_metadata(&full_path)
            .await
            .map_err(|_| StoreError::not_found(path.as_str()))?;

        if meta.is_dir() {
            // Directories only exist through the files below them.
            let removed = self.remove_tree(full_path).await?;
            if removed == 0 {
                return Err(StoreError::not_found(path.as_str()));
            }
            tracing::debug!(removed, "removed directory tree");
        } else {
            fs::remove_file(&full_path).await?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), name = "local.list")]
    async fn list(&self, dir: &str, options: ListOptions) -> StoreResult<Vec<StorePath>> {
        let dir = normalize(dir);
        if !options.include_dotfiles() && dir.is_hidden() {
            return Ok(Vec::new());
        }

        match fs::metadata(self.resolve(&dir)).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(Vec::new()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        }

        let mut files = Vec::new();
        let mut pending = vec![dir];

        // One directory level at a time; filters apply before descending.
        while let Some(current) = pending.pop() {
            let mut entries = fs::read_dir(self.resolve(&current)).await?;

            while let Some(entry) = entries.next_entry().await? {
                let name = match entry.file_name().into_string() {
                    Ok(name) => name,
                    Err(raw) => {
                        tracing::debug!(dir = %current, name = ?raw, "skipping non-UTF-8 entry");
                        continue;
                    }
                };
                if !options.include_dotfiles() && name.starts_with('.') {
                    continue;
                }

                let path = current.join(&name);
                let file_type = entry.file_type().await?;

                if file_type.is_symlink() {
                    // Symlinks are never descended into; only links to files count.
                    if options.include_symlinks()
                        && fs::metadata(entry.path())
                            .await
                            .map(|meta| meta.is_file())
                            .unwrap_or(false)
                    {
                        files.push(path);
                    }
                } else if file_type.is_dir() {
                    if options.recursive() {
                        pending.push(path);
                    }
                } else if file_type.is_file() {
                    files.push(path);
                }
            }
        }

        files.sort();
        files.dedup();
        tracing::debug!(count = files.len(), "listed directory");
        Ok(files)
    }
}
