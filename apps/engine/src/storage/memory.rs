#![allow(dead_code)]

//! In-memory store used by tests. Counts writes so debounce tests can assert
//! "exactly one write", and can be switched to fail writes to drive the
//! persistence-error path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::storage::KeyValueStore;

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls since construction.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// When enabled, every `set` fails with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seeds a slot without counting as a write.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("memory store poisoned")
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .entries
            .lock()
            .expect("memory store poisoned")
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!(
                "simulated write failure for key '{key}'"
            )));
        }
        self.entries
            .lock()
            .expect("memory store poisoned")
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries
            .lock()
            .expect("memory store poisoned")
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get_round_trips() {
        let store = MemoryStore::new();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let store = MemoryStore::new();
        store.set("k", "one").await.unwrap();
        store.set("k", "two").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_fail_writes_surfaces_storage_error() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let err = store.set("k", "v").await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_ok() {
        let store = MemoryStore::new();
        store.remove("missing").await.unwrap();
    }
}
