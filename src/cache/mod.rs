//! Cache Module
//!
//! TTL-bearing key/value storage: the in-process engine, the store trait the
//! coordinator depends on, and backend selection.

mod backend;
mod entry;
mod store;

#[cfg(feature = "redis")]
mod redis_store;


use std::sync::Arc;

// Re-export public types
pub use backend::{KeyValueStore, MemoryStore};
pub use entry::CacheEntry;
pub use store::{glob_match, CacheStore};

#[cfg(feature = "redis")]
pub use redis_store::RedisStore;

use crate::config::{CacheBackend, Config};
use crate::error::Result;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Store handle chosen from configuration.
pub enum ConnectedStore {
    /// In-process store; the caller owns its cleanup task
    Memory(MemoryStore),
    /// Any other backend
    Shared(Arc<dyn KeyValueStore>),
}

/// Opens the cache store named by `config.cache_url`.
pub async fn connect(config: &Config) -> Result<ConnectedStore> {
    match config.cache_backend()? {
        CacheBackend::Memory => Ok(ConnectedStore::Memory(MemoryStore::new())),
        CacheBackend::Redis(url) => connect_redis(&url).await,
    }
}

#[cfg(feature = "redis")]
async fn connect_redis(url: &str) -> Result<ConnectedStore> {
    let store = RedisStore::connect(url).await?;
    Ok(ConnectedStore::Shared(Arc::new(store)))
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(url: &str) -> Result<ConnectedStore> {
    Err(crate::error::AppError::Config(format!(
        "{} requires building with the `redis` feature",
        url
    )))
}
