//! versastore: one file storage contract, several backends.
//!
//! Application code holds an `Arc<dyn FileStore>` and never branches on
//! which backend is behind it:
//!
//! - [`LocalStore`]: a directory on disk
//! - [`MemoryStore`]: an in-process map
//! - [`ObjectStore`]: a bucket reached through an [`ObjectClient`]
//!
//! Backends are usually built from a [`StoreConfig`] with [`open`]:
//!
//! ```ignore
//! let config = StoreConfig::from_toml_str(r#"
//!     backend = "local"
//!     root = "/var/lib/app/files"
//! "#)?;
//! let store = versastore::open(&config, None)?;
//! store.write(StoreFile::new("/hello.txt", "hi"), None).await?;
//! ```

mod config;

pub use config::{BackendKind, ListFlag, StoreConfig, open};

pub use versastore_core::{
    FileContent, FileStore, ListOptions, Metadata, SEPARATOR, StoreError, StoreFile, StorePath,
    StoreResult, Target, filter_listing, normalize,
};
pub use versastore_local::LocalStore;
pub use versastore_memory::MemoryStore;
pub use versastore_object::{
    MemoryBucket, ObjectClient, ObjectError, ObjectHead, ObjectInfo, ObjectResult, ObjectStore,
};
