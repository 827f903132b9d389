//! Tests for storage
//! Extracted from mod.rs

use std::sync::Arc;
use std::thread;

use callguard_core::storage::*;
use tempfile::TempDir;

#[test]
fn test_sqlite_store_set_get() {
    let store = SqliteStore::in_memory().unwrap();

    assert_eq!(store.get("missing").unwrap(), None);

    store.set("key", "value").unwrap();
    assert_eq!(store.get("key").unwrap(), Some("value".to_string()));

    store.set("key", "replaced").unwrap();
    assert_eq!(store.get("key").unwrap(), Some("replaced".to_string()));
}

#[test]
fn test_sqlite_store_remove() {
    let store = SqliteStore::in_memory().unwrap();
    store.set("key", "value").unwrap();

    store.remove("key").unwrap();
    assert_eq!(store.get("key").unwrap(), None);

    // Removing again is fine
    store.remove("key").unwrap();
}

#[test]
fn test_sqlite_store_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("callguard.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.set("fraud_detector_user_id", "user_15551234567_1").unwrap();
    }

    let reopened = SqliteStore::open(&path).unwrap();
    assert_eq!(
        reopened.get("fraud_detector_user_id").unwrap(),
        Some("user_15551234567_1".to_string())
    );
    assert_eq!(reopened.schema_version().unwrap(), 1);
}

#[test]
fn test_sqlite_store_set_if_absent_keeps_first_value() {
    let store = SqliteStore::in_memory().unwrap();

    assert_eq!(store.set_if_absent("key", "first").unwrap(), "first");
    assert_eq!(store.set_if_absent("key", "second").unwrap(), "first");
    assert_eq!(store.get("key").unwrap(), Some("first".to_string()));
}

#[test]
fn test_sqlite_store_set_if_absent_concurrent() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteStore::open(temp_dir.path().join("race.db")).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            thread::spawn(move || store.set_if_absent("key", &format!("value-{}", i)).unwrap())
        })
        .collect();

    let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let stored = store.get("key").unwrap().unwrap();
    assert!(results.iter().all(|r| *r == stored));
}

#[test]
fn test_memory_store_basic_operations() {
    let store = MemoryStore::new();
    assert!(store.is_empty());

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("a").unwrap(), Some("1".to_string()));

    store.remove("a").unwrap();
    assert_eq!(store.get("a").unwrap(), None);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_memory_store_set_if_absent_concurrent() {
    let store = Arc::new(MemoryStore::new());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            thread::spawn(move || store.set_if_absent("key", &format!("value-{}", i)).unwrap())
        })
        .collect();

    let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_storage_error_display() {
    let error = StorageError::Backend("disk full".into());
    assert!(error.to_string().contains("disk full"));
}
