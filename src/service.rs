//! Cache-aside coordinator.
//!
//! Wraps the scrape pipeline with the key/value store: reads are served from
//! the cache while an entry is live, misses run the pipeline and store its
//! output for the configured TTL.
//!
//! Concurrent misses for the same key each run the pipeline and each write
//! the result; the last write wins. A flush racing an in-flight miss can be
//! undone by that miss's write.

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::cache::KeyValueStore;
use crate::error::Result;
use crate::scrape::{departments, Department, ScrapeResult, Scraper, StatsResult, DEPARTMENTS};

/// Cache key holding the aggregate statistics. Never a department slug.
pub const STATS_KEY: &str = "stats";

/// Public operations of the exam timetable.
#[derive(Clone)]
pub struct ExamService {
    store: Arc<dyn KeyValueStore>,
    scraper: Scraper,
    ttl_secs: u64,
}

impl ExamService {
    pub fn new(store: Arc<dyn KeyValueStore>, scraper: Scraper, ttl_secs: u64) -> Self {
        Self {
            store,
            scraper,
            ttl_secs,
        }
    }

    /// All known departments, in their fixed order.
    pub fn list_departments(&self) -> &'static [Department] {
        DEPARTMENTS
    }

    /// Exam groups for the department with `slug`.
    ///
    /// The store is read first; the slug is only resolved on a miss.
    /// `Ok(None)` means no such department, and nothing is written in that
    /// case. The reserved `stats` key is refused up front so it can never be
    /// served as a department.
    pub async fn get_tests(&self, slug: &str) -> Result<Option<ScrapeResult>> {
        if slug == STATS_KEY {
            debug!(slug, "Reserved key requested as a department");
            return Ok(None);
        }

        if let Some(groups) = self.read_cached(slug).await? {
            return Ok(Some(groups));
        }

        let Some(department) = departments::find(slug) else {
            debug!(slug, "Unknown department requested");
            return Ok(None);
        };

        let groups = self.scraper.fetch_department_exams(department).await?;
        self.write_cached(department.slug, &groups).await?;
        Ok(Some(groups))
    }

    /// Aggregate statistics over every department.
    pub async fn get_stats(&self) -> Result<StatsResult> {
        self.cached(STATS_KEY, || self.scraper.compute_stats()).await
    }

    /// Deletes every key in the store.
    ///
    /// Returns `true` only if every enumerated key was deleted; a key expiring
    /// between listing and deletion makes it `false`.
    pub async fn clear_cache(&self) -> Result<bool> {
        let keys = self.store.keys("*").await?;
        let deleted = if keys.is_empty() {
            0
        } else {
            self.store.delete(&keys).await?
        };

        info!(listed = keys.len(), deleted, "Cache cleared");
        Ok(deleted == keys.len())
    }

    /// Serves `key` from the store, or runs `produce` and stores its output.
    ///
    /// Nothing is written unless `produce` succeeds.
    async fn cached<T, F, Fut>(&self, key: &str, produce: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.read_cached(key).await? {
            return Ok(value);
        }

        let value = produce().await?;
        self.write_cached(key, &value).await?;
        Ok(value)
    }

    /// Live, readable entry under `key`. An unreadable payload counts as a miss.
    async fn read_cached<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(payload) = self.store.get(key).await? else {
            debug!(key, "Cache miss");
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(value) => {
                debug!(key, "Cache hit");
                Ok(Some(value))
            }
            Err(err) => {
                warn!(key, error = %err, "Discarding unreadable cache entry");
                Ok(None)
            }
        }
    }

    async fn write_cached<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let payload = serde_json::to_string(value)?;
        self.store.set(key, payload, self.ttl_secs).await
    }
}
