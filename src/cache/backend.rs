//! Key/value store abstraction used by the coordinator.
//!
//! The coordinator only ever sees `Arc<dyn KeyValueStore>`, so tests and the
//! default deployment run against [`MemoryStore`] while production can point
//! at Redis.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::CacheStore;
use crate::error::Result;

/// TTL-bearing key/value capability.
///
/// `get` after `set` within the TTL returns the stored value verbatim; once the
/// TTL elapses the key behaves as deleted. `delete` is idempotent.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the live value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<()>;

    /// Deletes all `keys` in one batch and returns how many existed.
    async fn delete(&self, keys: &[String]) -> Result<usize>;

    /// Lists keys matching a glob `pattern`.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;
}

// == Memory Store ==
/// In-process store backed by [`CacheStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<CacheStore>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Physically drops expired entries; returns how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.inner.write().await.cleanup_expired()
    }

    /// Number of physically stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        // Write lock: expired entries are evicted on access
        Ok(self.inner.write().await.get(key))
    }

    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<()> {
        self.inner.write().await.set(key.to_string(), value, ttl_secs)
    }

    async fn delete(&self, keys: &[String]) -> Result<usize> {
        Ok(self.inner.write().await.delete_many(keys))
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        Ok(self.inner.read().await.keys(pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();

        store.set("slug", "[]".to_string(), 60).await.unwrap();

        assert_eq!(store.get("slug").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.keys("*").await.unwrap(), vec!["slug".to_string()]);
    }

    #[tokio::test]
    async fn test_memory_store_delete_is_idempotent() {
        let store = MemoryStore::new();
        store.set("a", "1".to_string(), 60).await.unwrap();

        let keys = vec!["a".to_string()];
        assert_eq!(store.delete(&keys).await.unwrap(), 1);
        assert_eq!(store.delete(&keys).await.unwrap(), 0);
        assert_eq!(store.delete(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_memory_store_expiry_and_cleanup() {
        let store = MemoryStore::new();
        store.set("a", "1".to_string(), 1).await.unwrap();
        store.set("b", "2".to_string(), 1).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(store.get("a").await.unwrap().is_none());
        assert_eq!(store.len().await, 1);
        assert_eq!(store.cleanup_expired().await, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.set("shared", "yes".to_string(), 60).await.unwrap();
        assert_eq!(handle.get("shared").await.unwrap().as_deref(), Some("yes"));
    }
}
