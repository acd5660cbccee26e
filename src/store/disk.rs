use crate::core::cache::KeyValueCollection;
use anyhow::Result;
use async_trait::async_trait;
use fjall::{Keyspace, PartitionHandle, PersistMode};
use std::sync::Arc;
use tracing::debug;

/// A collection backed by one fjall partition.
pub struct DiskCollection {
    keyspace: Arc<Keyspace>,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(keyspace: Arc<Keyspace>, partition: PartitionHandle) -> Self {
        Self {
            keyspace,
            partition,
        }
    }

    fn read(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.partition.get(key)?.map(|value| value.to_vec()))
    }

    fn write(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.partition.insert(key, value)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueCollection for DiskCollection {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let key_str = String::from_utf8_lossy(key);
        match self.read(key) {
            Ok(Some(value)) => {
                debug!(key = %key_str, "Cache HIT");
                Some(value)
            }
            Ok(None) => {
                debug!(key = %key_str, "Cache MISS");
                None
            }
            Err(e) => {
                debug!(key = %key_str, error = %e, "DiskCollection get error");
                None
            }
        }
    }

    async fn put(&self, key: &[u8], value: &[u8]) {
        let key_str = String::from_utf8_lossy(key);
        match self.write(key, value) {
            Ok(()) => debug!(key = %key_str, "Cache PUT"),
            Err(e) => debug!(key = %key_str, error = %e, "DiskCollection put error"),
        }
    }
}
