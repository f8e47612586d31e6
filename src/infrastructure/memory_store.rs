// In-memory store backend for ephemeral sessions and tests
use crate::application::store_backend::StoreBackend;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStoreBackend {
    entries: RwLock<HashMap<String, Value>>,
    saves: AtomicUsize,
}

impl MemoryStoreBackend {
    pub async fn insert(&self, key: &str, value: Value) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreBackend for MemoryStoreBackend {
    async fn load(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.get(key).await)
    }

    async fn save(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.insert(key, value).await;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
