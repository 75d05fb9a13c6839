use async_trait::async_trait;

use crate::errors::Result;

/// Key-value settings store.
///
/// Reads are synchronous; writes go through the storage layer's writer and
/// are async, mirroring the split used by the table repositories.
#[async_trait]
pub trait KeyValueStoreTrait: Send + Sync {
    /// Get a single setting value by key. Returns `None` if not present.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a single setting value by key.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
