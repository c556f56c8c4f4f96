//! Store configuration.
//!
//! ```toml
//! backend = "local"
//! root = "/var/lib/app/files"
//! list_defaults = ["dotfiles", "symlinks"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use versastore_core::{FileStore, ListOptions, StoreError, StoreResult};
use versastore_local::LocalStore;
use versastore_memory::MemoryStore;
use versastore_object::{ObjectClient, ObjectStore};

/// Which backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Local,
    Memory,
    Object,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Memory => "memory",
            Self::Object => "object",
        }
    }
}

/// A listing option named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFlag {
    Recursive,
    Dotfiles,
    Symlinks,
}

impl From<ListFlag> for ListOptions {
    fn from(flag: ListFlag) -> Self {
        match flag {
            ListFlag::Recursive => ListOptions::RECURSIVE,
            ListFlag::Dotfiles => ListOptions::INCLUDE_DOTFILES,
            ListFlag::Symlinks => ListOptions::INCLUDE_SYMLINKS,
        }
    }
}

/// Configuration for a single store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub backend: BackendKind,

    /// Root directory (local backend).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Bucket name (object backend).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    /// Listing options applications use when they have no opinion.
    /// Absent means [`ListOptions::DEFAULT`]; an empty list means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_defaults: Option<Vec<ListFlag>>,
}

impl StoreConfig {
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendKind::Local,
            root: Some(root.into()),
            bucket: None,
            list_defaults: None,
        }
    }

    pub fn memory() -> Self {
        Self {
            backend: BackendKind::Memory,
            root: None,
            bucket: None,
            list_defaults: None,
        }
    }

    pub fn object(bucket: impl Into<String>) -> Self {
        Self {
            backend: BackendKind::Object,
            root: None,
            bucket: Some(bucket.into()),
            list_defaults: None,
        }
    }

    pub fn with_list_defaults(mut self, flags: impl IntoIterator<Item = ListFlag>) -> Self {
        self.list_defaults = Some(flags.into_iter().collect());
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| StoreError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| StoreError::invalid_config(format!("{}: {e}", path.display())))
    }

    pub fn to_toml_string(&self) -> StoreResult<String> {
        toml::to_string(self).map_err(|e| StoreError::invalid_config(e.to_string()))
    }

    /// Check that the backend has the settings it needs and nothing it
    /// would silently ignore.
    pub fn validate(&self) -> StoreResult<()> {
        match self.backend {
            BackendKind::Local => {
                match &self.root {
                    Some(root) if !root.as_os_str().is_empty() => {}
                    _ => return Err(StoreError::invalid_config("local backend requires `root`")),
                }
                if self.bucket.is_some() {
                    return Err(StoreError::invalid_config(
                        "`bucket` is only valid for the object backend",
                    ));
                }
            }
            BackendKind::Memory => {
                if self.root.is_some() || self.bucket.is_some() {
                    return Err(StoreError::invalid_config(
                        "memory backend takes neither `root` nor `bucket`",
                    ));
                }
            }
            BackendKind::Object => {
                match self.bucket.as_deref() {
                    Some(bucket) if !bucket.trim().is_empty() => {}
                    _ => {
                        return Err(StoreError::invalid_config(
                            "object backend requires `bucket`",
                        ));
                    }
                }
                if self.root.is_some() {
                    return Err(StoreError::invalid_config(
                        "`root` is only valid for the local backend",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Listing options built from `list_defaults`.
    pub fn list_options(&self) -> ListOptions {
        match &self.list_defaults {
            None => ListOptions::DEFAULT,
            Some(flags) => flags
                .iter()
                .fold(ListOptions::NONE, |acc, flag| acc | ListOptions::from(*flag)),
        }
    }
}

/// Build the configured store.
///
/// The object backend needs a `client`; the other backends ignore it.
pub fn open(
    config: &StoreConfig,
    client: Option<Arc<dyn ObjectClient>>,
) -> StoreResult<Arc<dyn FileStore>> {
    config.validate()?;

    let store: Arc<dyn FileStore> = match config.backend {
        BackendKind::Local => {
            let root = config
                .root
                .clone()
                .ok_or_else(|| StoreError::invalid_config("local backend requires `root`"))?;
            Arc::new(LocalStore::new(root))
        }
        BackendKind::Memory => Arc::new(MemoryStore::new()),
        BackendKind::Object => {
            let bucket = config
                .bucket
                .clone()
                .ok_or_else(|| StoreError::invalid_config("object backend requires `bucket`"))?;
            let client = client.ok_or_else(|| {
                StoreError::invalid_config("object backend requires an object client")
            })?;
            Arc::new(ObjectStore::new(client, bucket))
        }
    };

    tracing::debug!(backend = store.backend_name(), "opened store");
    Ok(store)
}
