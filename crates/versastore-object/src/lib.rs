//! Object store backend for versastore.
//!
//! [`ObjectStore`] adapts a flat key/value object service (S3 and friends)
//! to the [`FileStore`](versastore_core::FileStore) contract. The remote
//! service is reached through the [`ObjectClient`] trait so that SDK
//! choice, credentials and retries stay outside this crate.
//!
//! [`MemoryBucket`] is an in-process client for tests and local runs.
//!
//! ```ignore
//! use std::sync::Arc;
//! use versastore_object::{MemoryBucket, ObjectStore};
//!
//! let store = ObjectStore::new(Arc::new(MemoryBucket::new()), "assets");
//! ```

mod bucket;
mod client;
mod store;

pub use bucket::MemoryBucket;
pub use client::{ObjectClient, ObjectError, ObjectHead, ObjectInfo, ObjectResult};
pub use store::ObjectStore;
