//! In-memory key-value adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KvStore;
use crate::error::StorageResult;

// == Memory Store ==
/// Key-value storage backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.write().await.remove(key);
        Ok(())
    }

    async fn multi_remove(&self, keys: &[String]) -> StorageResult<()> {
        let mut items = self.items.write().await;
        for key in keys {
            items.remove(key);
        }
        Ok(())
    }

    async fn get_all_keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.items.read().await.keys().cloned().collect())
    }
}
