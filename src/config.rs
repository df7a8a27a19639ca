//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::error::{AppError, Result};

/// Default upstream endpoint; the department id is appended verbatim.
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://ugla.hi.is/Proftafla/View/ajax.php?sid=2027&a=getProfSvids&proftaflaID=37&svidID=";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache store location (`memory://` or `redis://host:port`)
    pub cache_url: String,
    /// TTL in seconds applied to every cache write
    pub cache_ttl: u64,
    /// Upstream timetable endpoint, department id appended
    pub upstream_url: String,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds (memory backend only)
    pub cleanup_interval: u64,
}

/// Cache backend selected by the scheme of `cache_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis(String),
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_URL` - Cache store URL (default: memory://)
    /// - `CACHE_TTL` - Cache TTL in seconds, must be positive (default: 3600)
    /// - `UPSTREAM_URL` - Timetable endpoint prefix (default: university endpoint)
    /// - `UPSTREAM_TIMEOUT` - Upstream timeout in seconds (default: 30)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_url: env::var("CACHE_URL").unwrap_or(defaults.cache_url),
            cache_ttl: parse_var("CACHE_TTL")
                .filter(|ttl| *ttl > 0)
                .unwrap_or(defaults.cache_ttl),
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.upstream_timeout),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Resolves which cache backend `cache_url` points at.
    pub fn cache_backend(&self) -> Result<CacheBackend> {
        let url = self.cache_url.trim();
        if url.starts_with("memory://") {
            Ok(CacheBackend::Memory)
        } else if url.starts_with("redis://") || url.starts_with("rediss://") {
            Ok(CacheBackend::Redis(url.to_string()))
        } else {
            Err(AppError::Config(format!(
                "unsupported cache url scheme: {}",
                self.cache_url
            )))
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_url: "memory://".to_string(),
            cache_ttl: 3600,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_timeout: 30,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_url, "memory://");
        assert_eq!(config.cache_ttl, 3600);
        assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.upstream_timeout, 30);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the process environment to avoid races between tests
        for name in [
            "CACHE_URL",
            "CACHE_TTL",
            "UPSTREAM_URL",
            "UPSTREAM_TIMEOUT",
            "SERVER_PORT",
            "CLEANUP_INTERVAL",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.cache_url, "memory://");
        assert_eq!(config.cache_ttl, 3600);
        assert_eq!(config.server_port, 3000);

        env::set_var("CACHE_TTL", "120");
        env::set_var("SERVER_PORT", "not-a-port");
        let config = Config::from_env();
        assert_eq!(config.cache_ttl, 120);
        assert_eq!(config.server_port, 3000);

        env::set_var("CACHE_TTL", "0");
        assert_eq!(Config::from_env().cache_ttl, 3600);

        env::remove_var("CACHE_TTL");
        env::remove_var("SERVER_PORT");
    }

    #[test]
    fn test_cache_backend_from_scheme() {
        let mut config = Config::default();
        assert_eq!(config.cache_backend().unwrap(), CacheBackend::Memory);

        config.cache_url = "redis://localhost:6379".to_string();
        assert_eq!(
            config.cache_backend().unwrap(),
            CacheBackend::Redis("redis://localhost:6379".to_string())
        );

        config.cache_url = "memcached://localhost".to_string();
        assert!(matches!(config.cache_backend(), Err(AppError::Config(_))));
    }
}
