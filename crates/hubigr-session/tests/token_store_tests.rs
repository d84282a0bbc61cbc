//! Integration tests for token persistence.

use hubigr_session::{FileTokenStore, MemoryTokenStore, TokenStore};

#[test]
fn token_store_tests_file_store_round_trips_and_clears() {
    let dir = tempfile::TempDir::new().expect("temp dir should be created");
    let mut store = FileTokenStore::new(dir.path().join("nested").join("token"));

    assert_eq!(store.load().expect("missing file should load"), None);

    store.save("tok1").expect("save should succeed");
    assert_eq!(store.load().expect("load should succeed").as_deref(), Some("tok1"));

    store.clear().expect("clear should succeed");
    assert_eq!(store.load().expect("load after clear should succeed"), None);
    store.clear().expect("clearing twice should succeed");
}

#[test]
fn token_store_tests_file_store_ignores_surrounding_whitespace() {
    let dir = tempfile::TempDir::new().expect("temp dir should be created");
    let path = dir.path().join("token");
    std::fs::write(&path, "tok2\n").expect("fixture should be written");

    let store = FileTokenStore::new(path);
    assert_eq!(store.load().expect("load should succeed").as_deref(), Some("tok2"));
}

#[test]
fn token_store_tests_memory_store_replaces_value() {
    let mut store = MemoryTokenStore::with_token("old");
    store.save("new").expect("save should succeed");
    assert_eq!(store.get(), Some("new"));
    store.clear().expect("clear should succeed");
    assert_eq!(store.get(), None);
}
