//! Redis-backed key/value store.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use crate::cache::KeyValueStore;
use crate::error::{AppError, Result};

/// Shared cache store reached over the Redis protocol.
///
/// `ConnectionManager` reconnects on its own; each command runs on a cheap
/// clone of it.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Opens a managed connection to `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| AppError::Config(e.to_string()))?;
        let conn = client.get_connection_manager().await.map_err(unavailable)?;
        info!("Connected to redis at {}", url);
        Ok(Self { conn })
    }
}

fn unavailable(err: redis::RedisError) -> AppError {
    AppError::CacheUnavailable(err.to_string())
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(unavailable)
    }

    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set_ex(key, value, ttl_secs).await.map_err(unavailable)
    }

    async fn delete(&self, keys: &[String]) -> Result<usize> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        conn.del(keys).await.map_err(unavailable)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.keys(pattern).await.map_err(unavailable)
    }
}
