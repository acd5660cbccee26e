use crate::core::cache::KeyValueCollection;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory collection, used for non-persistent data and as the fallback
/// when the on-disk keyspace cannot be opened.
#[derive(Default)]
pub struct MemoryCollection {
    inner: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueCollection for MemoryCollection {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let entries = self.inner.lock().await;
        let value = entries.get(key).cloned();
        if value.is_some() {
            debug!(key = %String::from_utf8_lossy(key), "Cache HIT");
        } else {
            debug!(key = %String::from_utf8_lossy(key), "Cache MISS");
        }
        value
    }

    async fn put(&self, key: &[u8], value: &[u8]) {
        let mut entries = self.inner.lock().await;
        debug!(key = %String::from_utf8_lossy(key), "Cache PUT");
        entries.insert(key.to_vec(), value.to_vec());
    }
}
