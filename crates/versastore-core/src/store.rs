//! The storage contract.
//!
//! Every backend implements [`FileStore`] with identical observable
//! behavior, so callers hold a `dyn FileStore` and never branch on the
//! concrete kind.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::file::{StoreFile, Target};
use crate::metadata::Metadata;
use crate::options::ListOptions;
use crate::path::StorePath;

/// Core storage operations.
///
/// All paths are normalized with [`normalize`](crate::normalize) before
/// they reach the backend, so `"a//b"`, `"/a/./b"` and `"a/b"` address the
/// same file.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Short backend identifier ("local", "memory", "object").
    fn backend_name(&self) -> &'static str;

    /// Check whether a file exists.
    ///
    /// Never fails: directories, missing keys and unreachable backends all
    /// report `false`.
    async fn has(&self, path: &str) -> bool;

    /// Get file metadata.
    ///
    /// Fails with `NotFound` when no file exists at the path. Directories
    /// and key prefixes are not files.
    async fn get_metadata(&self, path: &str) -> StoreResult<Metadata>;

    /// Store a file, fully replacing any previous content and metadata.
    ///
    /// Hierarchical backends create missing parent directories. Backend
    /// failures propagate as `Io` or `Backend`.
    async fn write(&self, file: StoreFile, metadata: Option<Metadata>) -> StoreResult<()>;

    /// Read a whole file.
    ///
    /// Fails with `NotFound` when absent.
    async fn read(&self, path: &str) -> StoreResult<StoreFile>;

    /// Remove a file, or every file below a directory.
    ///
    /// Fails with `NotFound` when the target is neither a file nor a
    /// directory with contents.
    async fn destroy(&self, target: Target<'_>) -> StoreResult<()>;

    /// List file paths below a directory.
    ///
    /// Absent directories and plain files list as empty. Results contain
    /// only files, without duplicates, sorted.
    async fn list(&self, dir: &str, options: ListOptions) -> StoreResult<Vec<StorePath>>;
}

/// Keep the listed paths that pass the depth and dotfile filters.
///
/// Shared by the flat backends, which see every descendant key at once and
/// emulate directory levels by segment count.
pub fn filter_listing<I>(dir: &StorePath, keys: I, options: ListOptions) -> Vec<StorePath>
where
    I: IntoIterator<Item = StorePath>,
{
    let child_depth = dir.depth() + 1;
    let mut paths: Vec<StorePath> = keys
        .into_iter()
        .filter(|p| p.is_descendant_of(dir))
        .filter(|p| options.recursive() || p.depth() == child_depth)
        .filter(|p| options.include_dotfiles() || !p.is_hidden())
        .collect();
    paths.sort();
    paths.dedup();
    paths
}
