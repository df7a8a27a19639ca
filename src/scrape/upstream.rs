//! Upstream timetable client.
//!
//! The timetable endpoint answers `GET <base><id>` with a JSON envelope whose
//! `html` field carries the markup to parse.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Source of raw timetable markup, keyed by upstream department id.
#[async_trait]
pub trait ExamSource: Send + Sync {
    /// Fetches the markup for department `id` (`0` for all departments).
    async fn fetch_markup(&self, id: u32) -> Result<String>;
}

/// JSON envelope returned by the timetable endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    html: String,
}

/// Client for the university timetable endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    /// Creates a source appending department ids to `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build http client: {}", e)))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Creates a source using an existing HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Creates a source from the upstream settings in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.upstream_url.clone(),
            Duration::from_secs(config.upstream_timeout),
        )
    }

    fn url_for(&self, id: u32) -> String {
        format!("{}{}", self.base_url, id)
    }
}

fn unavailable(err: reqwest::Error) -> AppError {
    AppError::UpstreamUnavailable(err.to_string())
}

#[async_trait]
impl ExamSource for HttpSource {
    async fn fetch_markup(&self, id: u32) -> Result<String> {
        let url = self.url_for(id);
        debug!("Fetching timetable from {}", url);

        let envelope: Envelope = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;

        Ok(envelope.html)
    }
}
