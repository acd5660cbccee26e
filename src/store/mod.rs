pub mod disk;
pub mod memory;

use crate::core::cache::{KeyValueCollection, Store};
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};
use tracing::{debug, warn};

/// A thread-safe key-value store that can hold multiple collections.
pub struct KeyValueStore {
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Arc<Keyspace>>,
}

impl KeyValueStore {
    /// Opens the on-disk keyspace under `data_path/cache`. When it cannot be
    /// opened, persistent collections are served from memory instead.
    pub fn open(data_path: &Path) -> Self {
        let cache_dir = data_path.join("cache");
        let keyspace = match fjall::Config::new(&cache_dir).open() {
            Ok(keyspace) => {
                debug!(path = %cache_dir.display(), "Opened cache keyspace");
                Some(Arc::new(keyspace))
            }
            Err(e) => {
                warn!(
                    path = %cache_dir.display(),
                    error = %e,
                    "Failed to open cache keyspace, falling back to memory"
                );
                None
            }
        };

        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace,
        }
    }

    /// A store with no disk backing at all.
    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.keyspace.is_some()
    }

    fn create_collection(&self, name: &str, persist: bool) -> Arc<dyn KeyValueCollection> {
        if persist {
            if let Some(keyspace) = &self.keyspace {
                match keyspace.open_partition(name, PartitionCreateOptions::default()) {
                    Ok(partition) => {
                        return Arc::new(DiskCollection::new(Arc::clone(keyspace), partition));
                    }
                    Err(e) => {
                        warn!(collection = %name, error = %e, "Failed to open partition");
                    }
                }
            }
        }
        Arc::new(MemoryCollection::new())
    }
}

impl Default for KeyValueStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Store for KeyValueStore {
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>> {
        if let Some(existing) = self
            .collections
            .read()
            .ok()
            .and_then(|collections| collections.get(name).cloned())
        {
            return Some(existing);
        }

        if !create_if_missing {
            return None;
        }

        let mut collections = self.collections.write().ok()?;
        let collection = collections
            .entry(name.to_string())
            .or_insert_with(|| self.create_collection(name, persist));
        Some(Arc::clone(collection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_collection_is_shared_by_name() {
        let store = KeyValueStore::in_memory();
        let first = store.get_collection("quote", false, true).unwrap();
        first.put(b"key", b"value").await;

        let second = store.get_collection("quote", false, false).unwrap();
        assert_eq!(second.get(b"key").await, Some(b"value".to_vec()));
    }

    #[test]
    fn test_missing_collection_without_create() {
        let store = KeyValueStore::in_memory();
        assert!(store.get_collection("quote", true, false).is_none());
    }

    #[tokio::test]
    async fn test_persistent_collection_on_disk() {
        let dir = tempdir().unwrap();
        let store = KeyValueStore::open(dir.path());
        assert!(store.is_persistent());

        let collection = store.get_collection("quote", true, true).unwrap();
        collection.put(b"schd_price", b"27.41").await;
        assert_eq!(collection.get(b"schd_price").await, Some(b"27.41".to_vec()));
        assert!(dir.path().join("cache").exists());
    }

    #[tokio::test]
    async fn test_persist_without_keyspace_uses_memory() {
        let store = KeyValueStore::in_memory();
        let collection = store.get_collection("quote", true, true).unwrap();
        collection.put(b"schd_price", b"27.41").await;
        assert_eq!(collection.get(b"schd_price").await, Some(b"27.41".to_vec()));
    }
}
