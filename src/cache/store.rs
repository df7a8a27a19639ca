//! Cache Store Module
//!
//! In-process cache engine: HashMap storage with TTL expiration.

use std::collections::HashMap;

use crate::cache::{CacheEntry, MAX_KEY_LENGTH};
use crate::error::{AppError, Result};

// == Cache Store ==
/// In-memory key/value storage where every entry carries a deadline.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty CacheStore.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a key-value pair expiring after `ttl_seconds`.
    ///
    /// An existing entry under the same key is replaced wholesale, TTL included.
    pub fn set(&mut self, key: String, value: String, ttl_seconds: u64) -> Result<()> {
        if key.is_empty() {
            return Err(AppError::InvalidRequest("Key cannot be empty".to_string()));
        }

        if key.len() > MAX_KEY_LENGTH {
            return Err(AppError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        self.entries.insert(key, CacheEntry::new(value, ttl_seconds));
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed on access and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let expired = self.entries.get(key)?.is_expired();
        if expired {
            self.entries.remove(key);
            return None;
        }

        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Delete Many ==
    /// Removes every listed key, returning how many live entries were removed.
    ///
    /// Absent or already-expired keys count as zero.
    pub fn delete_many<S: AsRef<str>>(&mut self, keys: &[S]) -> usize {
        keys.iter()
            .filter_map(|key| self.entries.remove(key.as_ref()))
            .filter(|entry| !entry.is_expired())
            .count()
    }

    // == Keys ==
    /// Lists live keys matching a glob `pattern` (`*` and `?` wildcards).
    pub fn keys(&self, pattern: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired() && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the number of physically stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Redis-style glob matching restricted to `*` and `?`.
pub fn glob_match(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();

    let (mut p, mut c) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while c < candidate.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, c));
                p += 1;
            }
            Some(&ch) if ch == '?' || ch == candidate[c] => {
                p += 1;
                c += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    c = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|ch| *ch == '*')
}
