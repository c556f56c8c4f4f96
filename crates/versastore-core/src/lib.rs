//! # versastore-core
//!
//! A single contract for storing, reading, listing and deleting named byte
//! blobs, shared by every storage backend.
//!
//! Key components:
//!
//! - [`normalize`] / [`StorePath`] - canonical absolute paths, the universal key
//! - [`FileContent`] / [`StoreFile`] - payloads and `(path, content)` entities
//! - [`Metadata`] - backend-reported file metadata
//! - [`ListOptions`] - recursion, dotfile and symlink flags for listings
//! - [`FileStore`] - the operation set every backend implements
//!
//! ## Design Decisions
//!
//! - **One error kind for absence**: `read`, `get_metadata` and `destroy`
//!   report a missing file as [`StoreError::NotFound`]; `has` and `list`
//!   report absence as `false` and an empty listing.
//! - **Recursive destroy**: destroying a directory path removes every file
//!   below it on every backend.
//! - **Default listing**: direct children, dotfiles and symlinks included.

mod content;
mod error;
mod file;
mod metadata;
mod options;
mod path;
mod store;

#[cfg(feature = "conformance")]
pub mod conformance;

pub use content::FileContent;
pub use error::{StoreError, StoreResult};
pub use file::{StoreFile, Target};
pub use metadata::Metadata;
pub use options::ListOptions;
pub use path::{SEPARATOR, StorePath, normalize};
pub use store::{FileStore, filter_listing};
