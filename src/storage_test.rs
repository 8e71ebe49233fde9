use super::*;

fn temp_store() -> (tempfile::TempDir, FileTokenStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("nested").join("storage.json"));
    (dir, store)
}

// =============================================================================
// FileTokenStore
// =============================================================================

#[test]
fn file_store_missing_file_reads_none() {
    let (_dir, store) = temp_store();
    assert_eq!(store.get(), None);
}

#[test]
fn file_store_set_then_get_returns_token() {
    let (_dir, store) = temp_store();
    store.set("abc.def.ghi").unwrap();
    assert_eq!(store.get().as_deref(), Some("abc.def.ghi"));
}

#[test]
fn file_store_clear_removes_token() {
    let (_dir, store) = temp_store();
    store.set("tok").unwrap();
    store.clear().unwrap();
    assert_eq!(store.get(), None);
}

#[test]
fn file_store_clear_is_idempotent() {
    let (_dir, store) = temp_store();
    store.clear().unwrap();
    store.set("tok").unwrap();
    store.clear().unwrap();
    store.clear().unwrap();
    assert_eq!(store.get(), None);
}

#[test]
fn file_store_survives_reopen() {
    let (dir, store) = temp_store();
    store.set("persisted").unwrap();
    drop(store);
    let reopened = FileTokenStore::new(dir.path().join("nested").join("storage.json"));
    assert_eq!(reopened.get().as_deref(), Some("persisted"));
}

#[test]
fn file_store_empty_token_reads_none() {
    let (_dir, store) = temp_store();
    store.set("").unwrap();
    assert_eq!(store.get(), None);
}

#[test]
fn file_store_keeps_unrelated_keys() {
    let (_dir, store) = temp_store();
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), r#"{"theme":"dark"}"#).unwrap();

    store.set("tok").unwrap();
    store.clear().unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["theme"], "dark");
    assert!(value.get(TOKEN_KEY).is_none());
}

#[test]
fn file_store_corrupt_file_reads_none_and_is_replaced_on_set() {
    let (_dir, store) = temp_store();
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "[1, 2, 3]").unwrap();

    assert_eq!(store.get(), None);
    store.clear().unwrap();
    store.set("fresh").unwrap();
    assert_eq!(store.get().as_deref(), Some("fresh"));
}

// =============================================================================
// MemoryTokenStore
// =============================================================================

#[test]
fn memory_store_round_trip_and_clear() {
    let store = MemoryTokenStore::new();
    assert_eq!(store.get(), None);
    store.set("t1").unwrap();
    assert_eq!(store.get().as_deref(), Some("t1"));
    store.clear().unwrap();
    store.clear().unwrap();
    assert_eq!(store.get(), None);
}

#[test]
fn memory_store_with_token_prefills_slot() {
    let store = MemoryTokenStore::with_token("seeded");
    assert_eq!(store.get().as_deref(), Some("seeded"));
}
