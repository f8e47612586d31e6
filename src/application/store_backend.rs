// Store backend trait - opaque key-value persistence for state snapshots
use async_trait::async_trait;
use serde_json::Value;

pub const GLOBAL_STORE_KEY: &str = "globalStore";

#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Read the value stored under `key`, `None` when nothing was saved yet
    async fn load(&self, key: &str) -> anyhow::Result<Option<Value>>;

    /// Replace the value stored under `key`
    async fn save(&self, key: &str, value: Value) -> anyhow::Result<()>;
}
