//! Shared store contract checks against the in-memory backend.

use std::time::SystemTime;

use versastore_core::conformance::{self, Capabilities};
use versastore_memory::MemoryStore;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fresh store seeded through the constructor, as embedders do.
fn fixture() -> (MemoryStore, SystemTime) {
    init_tracing();
    let since = SystemTime::now();
    (MemoryStore::with_files(conformance::initial_state()), since)
}

macro_rules! conformance_tests {
    ($($name:ident),* $(,)?) => {
        $(
            #[tokio::test]
            async fn $name() {
                let (store, _since) = fixture();
                conformance::$name(&store).await;
            }
        )*
    };
}

conformance_tests!(
    saving_and_reading,
    round_trip_binary,
    reading_missing_file,
    not_found_consistency,
    listing_default_options,
    listing_direct_children,
    listing_recursive,
    listing_recursive_without_leading_slash,
    listing_recursive_with_dotfiles,
    listing_hidden_directory,
    listing_file_or_missing_is_empty,
    metadata_size_counts_bytes,
    metadata_on_missing_file,
    directories_are_not_files,
    has_existing_and_missing,
    destroy_using_path,
    destroy_using_file,
    destroy_missing_file,
    destroy_directory_recursively,
    destroy_root_twice,
    write_to_root_is_rejected,
    write_replaces,
    paths_are_normalized,
);

#[tokio::test]
async fn metadata_on_hidden_file() {
    let (store, since) = fixture();
    conformance::metadata_on_hidden_file(&store, Capabilities::FULL, since).await;
}

#[tokio::test]
async fn metadata_on_nested_file() {
    let (store, since) = fixture();
    conformance::metadata_on_nested_file(&store, Capabilities::FULL, since).await;
}

#[tokio::test]
async fn seeding_through_write() {
    init_tracing();
    let store = MemoryStore::new();
    conformance::seed(&store).await;
    assert_eq!(store.len(), conformance::initial_state().len());
    conformance::listing_recursive_with_dotfiles(&store).await;
}
