use async_trait::async_trait;
use std::sync::Arc;

/// A named bag of byte keys and values. Implementations swallow their own I/O
/// errors: a failed read is a miss, a failed write is a no-op.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    async fn put(&self, key: &[u8], value: &[u8]);
}

pub trait Store: Send + Sync {
    /// Returns the collection called `name`. `persist` selects disk over
    /// memory; `None` means the collection does not exist and was not created.
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>>;
}
