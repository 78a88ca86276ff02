// Durable key-value storage abstraction.
//
// The storefront client persists everything — auth token, cached profile,
// favorites, notification flags, ratings — through this one seam. Values
// are strings (raw or JSON-encoded); keys are namespaced in `crate::keys`.
// Implementations include the in-memory store below and whatever durable
// store the embedding application provides (secure storage, preferences).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

/// An async, string-keyed, string-valued durable store.
///
/// Each key is written independently and atomically; no cross-key
/// transactions are assumed. `remove_many` exists so callers can clear a
/// group of related keys (e.g. all auth state) as one logical unit.
#[async_trait]
pub trait KeyValueStorage: Send + Sync + std::fmt::Debug {
    /// Get a value by key. Returns `None` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set a key-value pair, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Delete a group of keys. Absent keys are skipped.
    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}

/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),
}

/// An in-memory storage implementation backed by a HashMap.
///
/// Useful for development and testing. A real deployment wires the device's
/// durable store behind the same trait.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    store: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored. Test helper.
    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let store = self.store.lock().unwrap();
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut store = self.store.lock().unwrap();
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut store = self.store.lock().unwrap();
        store.remove(key);
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut store = self.store.lock().unwrap();
        for key in keys {
            store.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_get_set() {
        let storage = MemoryStorage::new();
        storage.set("key1", "value1").await.unwrap();
        let val = storage.get("key1").await.unwrap();
        assert_eq!(val, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_memory_storage_missing_key() {
        let storage = MemoryStorage::new();
        let val = storage.get("nonexistent").await.unwrap();
        assert_eq!(val, None);
    }

    #[tokio::test]
    async fn test_memory_storage_overwrite() {
        let storage = MemoryStorage::new();
        storage.set("k", "v1").await.unwrap();
        storage.set("k", "v2").await.unwrap();
        let val = storage.get("k").await.unwrap();
        assert_eq!(val, Some("v2".to_string()));
    }

    #[tokio::test]
    async fn test_memory_storage_remove() {
        let storage = MemoryStorage::new();
        storage.set("key1", "value1").await.unwrap();
        storage.remove("key1").await.unwrap();
        assert_eq!(storage.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_storage_remove_absent() {
        let storage = MemoryStorage::new();
        storage.remove("nothing-here").await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_storage_remove_many() {
        let storage = MemoryStorage::new();
        storage.set("a", "1").await.unwrap();
        storage.set("b", "2").await.unwrap();
        storage.set("c", "3").await.unwrap();
        storage.remove_many(&["a", "b", "missing"]).await.unwrap();
        assert_eq!(storage.get("a").await.unwrap(), None);
        assert_eq!(storage.get("b").await.unwrap(), None);
        assert_eq!(storage.get("c").await.unwrap(), Some("3".to_string()));
    }
}
