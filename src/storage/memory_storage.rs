use crate::{
    error::Result,
    storage::{Storage, StorageKey},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    entries: HashMap<StorageKey, String>,
    write_counts: HashMap<StorageKey, usize>,
}

/// In-process storage. Counts writes per key so callers can observe how
/// often the store actually hit the backend.
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a value without counting it as a write
    pub fn with_entry(self, key: StorageKey, value: impl Into<String>) -> Self {
        self.lock().entries.insert(key, value.into());
        self
    }

    /// Current raw value under a key
    pub fn get(&self, key: StorageKey) -> Option<String> {
        self.lock().entries.get(&key).cloned()
    }

    /// Number of writes issued for a key since creation
    pub fn write_count(&self, key: StorageKey) -> usize {
        self.lock().write_counts.get(&key).copied().unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Every critical section leaves the maps consistent, so poisoning is benign
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn read(&self, key: StorageKey) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    async fn write(&self, key: StorageKey, value: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.entries.insert(key, value.to_string());
        *inner.write_counts.entry(key).or_insert(0) += 1;
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<()> {
        self.lock().entries.remove(&key);
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_counts_per_key() {
        let storage = MemoryStorage::new().with_entry(StorageKey::Columns, "[]");
        assert_eq!(storage.write_count(StorageKey::Columns), 0);

        storage.write(StorageKey::Columns, "[1]").await.unwrap();
        storage.write(StorageKey::Columns, "[2]").await.unwrap();
        storage.write(StorageKey::Items, "[]").await.unwrap();

        assert_eq!(storage.write_count(StorageKey::Columns), 2);
        assert_eq!(storage.write_count(StorageKey::Items), 1);
        assert_eq!(storage.get(StorageKey::Columns).as_deref(), Some("[2]"));
    }
}
