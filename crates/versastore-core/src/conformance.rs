//! Cross-backend conformance suite.
//!
//! Every backend must pass the same checks against the same initial
//! state. Adapter crates enable the `conformance` feature in their
//! dev-dependencies, seed a fresh store with [`initial_state`] for each
//! check, and call the check functions from their own `#[tokio::test]`s.
//!
//! Checks panic on failure, like any test assertion.

use std::collections::BTreeSet;
use std::time::{Duration, SystemTime};

use crate::{FileStore, ListOptions, Metadata, StoreError, StoreFile, StorePath, normalize};

/// Metadata fields a backend is able to report.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub content_type: bool,
    pub last_accessed: bool,
    pub created: bool,
}

impl Capabilities {
    /// Everything (disk, and memory stores seeded with full metadata).
    pub const FULL: Self = Self {
        content_type: true,
        last_accessed: true,
        created: true,
    };

    /// Object stores only track content type, size and modification time.
    pub const OBJECT: Self = Self {
        content_type: true,
        last_accessed: false,
        created: false,
    };
}

/// The files every check starts from.
///
/// Timestamps are stamped with the current time, the way a fresh store
/// would stamp them.
pub fn initial_state() -> Vec<(StoreFile, Metadata)> {
    let now = SystemTime::now();
    let stamp = |meta: Metadata| {
        meta.with_created(now)
            .with_last_modified(now)
            .with_last_accessed(now)
    };

    vec![
        (
            StoreFile::new("/test.txt", "Hello World"),
            stamp(Metadata::new().with_content_type("text/plain")),
        ),
        (
            StoreFile::new("/test2.txt", "Hello World 2"),
            stamp(Metadata::new()),
        ),
        (
            StoreFile::new("/file/in/some/subdirectory.html", "<h1>Hello World 3</h1>"),
            stamp(Metadata::new().with_content_type("text/html")),
        ),
        (
            StoreFile::new("/.DS_Store", ""),
            stamp(Metadata::new().with_content_type("application/octet-stream")),
        ),
        (
            StoreFile::new("/.hidden/Hello", "world"),
            stamp(Metadata::new()),
        ),
        (
            StoreFile::new("/.hidden/.DS_Store", "world"),
            stamp(Metadata::new().with_content_type("application/octet-stream")),
        ),
        (
            StoreFile::new("/sub/.dir/.DS_Store", ""),
            stamp(Metadata::new()),
        ),
        (
            StoreFile::new("/sub/dir/.DS_Store", ""),
            stamp(Metadata::new()),
        ),
    ]
}

/// Write [`initial_state`] through the contract.
pub async fn seed(store: &dyn FileStore) {
    for (file, meta) in initial_state() {
        let path = file.path().clone();
        if let Err(e) = store.write(file, Some(meta)).await {
            panic!("seeding {path} into {} failed: {e}", store.backend_name());
        }
    }
}

fn set(paths: &[&str]) -> BTreeSet<StorePath> {
    paths.iter().map(|p| normalize(p)).collect()
}

async fn listed(store: &dyn FileStore, dir: &str, options: ListOptions) -> BTreeSet<StorePath> {
    let paths = match store.list(dir, options).await {
        Ok(paths) => paths,
        Err(e) => panic!("list({dir}, {options:?}) failed: {e}"),
    };
    let unique: BTreeSet<StorePath> = paths.iter().cloned().collect();
    assert_eq!(unique.len(), paths.len(), "list({dir}) returned duplicates: {paths:?}");
    unique
}

fn assert_recent(field: &str, time: Option<SystemTime>, since: SystemTime) {
    let Some(time) = time else {
        panic!("{field} missing");
    };
    // Filesystem timestamps may be truncated to whole seconds.
    let slack = Duration::from_secs(2);
    let earliest = since.checked_sub(slack).unwrap_or(SystemTime::UNIX_EPOCH);
    let latest = SystemTime::now() + slack;
    assert!(time >= earliest, "{field} {time:?} earlier than {earliest:?}");
    assert!(time <= latest, "{field} {time:?} later than {latest:?}");
}

pub async fn saving_and_reading(store: &dyn FileStore) {
    store
        .write(StoreFile::new("test123.txt", "Hello World"), None)
        .await
        .expect("write");

    let file = store.read("test123.txt").await.expect("read");
    assert_eq!(file.path(), &normalize("/test123.txt"));
    assert!(file.has_content());
    assert_eq!(file.content().as_str(), Some("Hello World"));
}

pub async fn round_trip_binary(store: &dyn FileStore) {
    let bytes: Vec<u8> = (0..=255u8).chain([0, 0xff, 0xfe]).collect();
    store
        .write(StoreFile::new("bin//blob.dat", bytes.clone()), None)
        .await
        .expect("write");

    let file = store.read("/bin/blob.dat").await.expect("read");
    assert_eq!(file.path(), &normalize("/bin/blob.dat"));
    assert_eq!(file.content().as_bytes(), bytes.as_slice());
}

pub async fn reading_missing_file(store: &dyn FileStore) {
    let err = store.read("some.path").await.expect_err("read of missing file");
    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
    assert_eq!(err.to_string(), "File /some.path not found");
}

pub async fn not_found_consistency(store: &dyn FileStore) {
    let path = "/never/written.txt";
    assert!(!store.has(path).await);
    for err in [
        store.read(path).await.map(|_| ()).expect_err("read"),
        store.get_metadata(path).await.map(|_| ()).expect_err("get_metadata"),
        store.destroy(path.into()).await.expect_err("destroy"),
    ] {
        assert!(err.is_not_found(), "expected NotFound, got {err:?}");
        assert_eq!(err.to_string(), "File /never/written.txt not found");
    }
    assert!(listed(store, path, ListOptions::RECURSIVE).await.is_empty());
}

pub async fn listing_default_options(store: &dyn FileStore) {
    assert_eq!(
        listed(store, "/", ListOptions::default()).await,
        set(&["/test.txt", "/test2.txt", "/.DS_Store"])
    );
}

pub async fn listing_direct_children(store: &dyn FileStore) {
    assert_eq!(
        listed(store, "/", ListOptions::NONE).await,
        set(&["/test.txt", "/test2.txt"])
    );
    assert_eq!(
        listed(store, "/file/in/some", ListOptions::NONE).await,
        set(&["/file/in/some/subdirectory.html"])
    );
    assert!(listed(store, "/file/in", ListOptions::NONE).await.is_empty());
}

pub async fn listing_recursive(store: &dyn FileStore) {
    assert_eq!(
        listed(store, "/", ListOptions::RECURSIVE).await,
        set(&["/test.txt", "/test2.txt", "/file/in/some/subdirectory.html"])
    );
}

pub async fn listing_recursive_without_leading_slash(store: &dyn FileStore) {
    assert_eq!(
        listed(store, "file/in", ListOptions::RECURSIVE).await,
        set(&["/file/in/some/subdirectory.html"])
    );
    assert_eq!(
        listed(store, "file/in/", ListOptions::RECURSIVE).await,
        set(&["/file/in/some/subdirectory.html"])
    );
}

pub async fn listing_recursive_with_dotfiles(store: &dyn FileStore) {
    assert_eq!(
        listed(store, "/", ListOptions::RECURSIVE | ListOptions::INCLUDE_DOTFILES).await,
        set(&[
            "/test.txt",
            "/test2.txt",
            "/file/in/some/subdirectory.html",
            "/.DS_Store",
            "/.hidden/Hello",
            "/.hidden/.DS_Store",
            "/sub/.dir/.DS_Store",
            "/sub/dir/.DS_Store",
        ])
    );
}

pub async fn listing_hidden_directory(store: &dyn FileStore) {
    assert!(listed(store, "/.hidden", ListOptions::RECURSIVE).await.is_empty());
    assert_eq!(
        listed(store, "/.hidden", ListOptions::INCLUDE_DOTFILES).await,
        set(&["/.hidden/Hello", "/.hidden/.DS_Store"])
    );
}

pub async fn listing_file_or_missing_is_empty(store: &dyn FileStore) {
    let all = ListOptions::RECURSIVE | ListOptions::INCLUDE_DOTFILES;
    assert!(listed(store, "/test.txt", all).await.is_empty());
    assert!(listed(store, "/does/not/exist", all).await.is_empty());
    // Prefix of a name, not a directory.
    assert!(listed(store, "/test", all).await.is_empty());
}

async fn check_metadata(
    store: &dyn FileStore,
    path: &str,
    size: u64,
    content_type: &str,
    caps: Capabilities,
    since: SystemTime,
) {
    let meta = store.get_metadata(path).await.expect("get_metadata");
    assert_eq!(meta.size, Some(size), "size of {path}");
    assert_recent("last_modified", meta.last_modified, since);

    let mut expected = vec!["size", "last_modified"];
    if caps.content_type {
        assert_eq!(meta.content_type.as_deref(), Some(content_type));
        expected.push("content_type");
    }
    if caps.last_accessed {
        assert_recent("last_accessed", meta.last_accessed, since);
        expected.push("last_accessed");
    }
    if caps.created {
        assert_recent("created", meta.created, since);
        expected.push("created");
    }

    let mut present = meta.present_fields();
    present.sort_unstable();
    expected.sort_unstable();
    assert_eq!(present, expected, "metadata shape of {path}");
}

/// `since` is the time the store started being populated.
pub async fn metadata_on_hidden_file(store: &dyn FileStore, caps: Capabilities, since: SystemTime) {
    check_metadata(store, "/.hidden/.DS_Store", 5, "application/octet-stream", caps, since).await;
}

pub async fn metadata_on_nested_file(store: &dyn FileStore, caps: Capabilities, since: SystemTime) {
    check_metadata(store, "/file/in/some/subdirectory.html", 22, "text/html", caps, since).await;
}

pub async fn metadata_size_counts_bytes(store: &dyn FileStore) {
    let text = "héllo wörld ✓";
    store
        .write(
            StoreFile::new("/unicode.txt", text),
            Some(Metadata::new().with_content_type("text/plain").with_size(1)),
        )
        .await
        .expect("write");

    let meta = store.get_metadata("/unicode.txt").await.expect("get_metadata");
    assert_eq!(meta.size, Some(text.len() as u64));
}

pub async fn metadata_on_missing_file(store: &dyn FileStore) {
    let err = store.get_metadata("/does/not/exist").await.expect_err("missing");
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "File /does/not/exist not found");
}

pub async fn directories_are_not_files(store: &dyn FileStore) {
    assert!(!store.has("/file").await);
    assert!(!store.has("/file/in/").await);
    assert!(store.read("/file/in").await.expect_err("read dir").is_not_found());
    assert!(store.get_metadata("/file").await.expect_err("stat dir").is_not_found());
}

pub async fn has_existing_and_missing(store: &dyn FileStore) {
    assert!(store.has("/test.txt").await);
    assert!(store.has("test.txt").await);
    assert!(store.has("/sub/../test.txt").await);
    assert!(!store.has("/does/not/exist").await);
}

pub async fn destroy_using_path(store: &dyn FileStore) {
    assert!(store.has("/test.txt").await);
    store.destroy("test.txt".into()).await.expect("destroy");
    assert!(!store.has("/test.txt").await);

    let err = store.destroy("/test.txt".into()).await.expect_err("second destroy");
    assert!(err.is_not_found());
}

pub async fn destroy_using_file(store: &dyn FileStore) {
    let file = store.read("/test.txt").await.expect("read");
    assert!(store.has("/test.txt").await);
    store.destroy((&file).into()).await.expect("destroy");
    assert!(!store.has("/test.txt").await);
    assert!(store.read("/test.txt").await.expect_err("read").is_not_found());
}

pub async fn destroy_missing_file(store: &dyn FileStore) {
    let err = store.destroy("/does/not/exist".into()).await.expect_err("missing");
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "File /does/not/exist not found");
}

pub async fn destroy_directory_recursively(store: &dyn FileStore) {
    store.destroy("/file".into()).await.expect("destroy directory");

    assert!(!store.has("/file/in/some/subdirectory.html").await);
    assert_eq!(
        listed(store, "/", ListOptions::RECURSIVE).await,
        set(&["/test.txt", "/test2.txt"])
    );
    assert!(store.destroy("/file".into()).await.expect_err("gone").is_not_found());

    store.destroy("/sub".into()).await.expect("destroy hidden-only directory");
    let all = ListOptions::RECURSIVE | ListOptions::INCLUDE_DOTFILES;
    assert!(listed(store, "/sub", all).await.is_empty());
    assert!(store.has("/.hidden/Hello").await);
}

pub async fn destroy_root_twice(store: &dyn FileStore) {
    let all = ListOptions::RECURSIVE | ListOptions::INCLUDE_DOTFILES;

    store.destroy("/".into()).await.expect("destroy root");
    assert!(listed(store, "/", all).await.is_empty());
    assert!(!store.has("/test.txt").await);
    assert!(!store.has("/.hidden/Hello").await);

    let err = store.destroy("/".into()).await.expect_err("second destroy of root");
    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
    assert_eq!(err.to_string(), "File / not found");

    // The emptied store is still usable.
    store
        .write(StoreFile::new("/after.txt", "again"), None)
        .await
        .expect("write after destroying root");
    assert_eq!(listed(store, "/", all).await, set(&["/after.txt"]));
}

pub async fn write_to_root_is_rejected(store: &dyn FileStore) {
    for path in ["/", "", ".", "/a/.."] {
        let err = store
            .write(StoreFile::new(path, "not a file"), None)
            .await
            .expect_err("write to root");
        assert!(
            matches!(err, StoreError::InvalidPath(_)),
            "write({path:?}) gave {err:?}"
        );
    }

    assert!(!store.has("/").await);
    assert!(store.read("/").await.expect_err("read root").is_not_found());
    let all = ListOptions::RECURSIVE | ListOptions::INCLUDE_DOTFILES;
    assert_eq!(listed(store, "/", all).await.len(), initial_state().len());
}

pub async fn write_replaces(store: &dyn FileStore) {
    store
        .write(
            StoreFile::new("/replace.txt", "first version, longer"),
            Some(Metadata::new().with_content_type("text/plain")),
        )
        .await
        .expect("first write");
    store
        .write(
            StoreFile::new("replace.txt", "second"),
            Some(Metadata::new().with_content_type("text/markdown")),
        )
        .await
        .expect("second write");

    let file = store.read("/replace.txt").await.expect("read");
    assert_eq!(file.content().as_str(), Some("second"));
    let meta = store.get_metadata("/replace.txt").await.expect("metadata");
    assert_eq!(meta.size, Some(6));

    let listing = listed(store, "/", ListOptions::NONE).await;
    assert_eq!(
        listing.iter().filter(|p| p.as_str() == "/replace.txt").count(),
        1
    );
}

pub async fn paths_are_normalized(store: &dyn FileStore) {
    store
        .write(StoreFile::new("a//b/../c.txt", "normalized"), None)
        .await
        .expect("write");

    assert!(store.has("/a/c.txt").await);
    let file = store.read("./a/./c.txt").await.expect("read");
    assert_eq!(file.path(), &normalize("/a/c.txt"));
    assert_eq!(listed(store, "a", ListOptions::NONE).await, set(&["/a/c.txt"]));
}
