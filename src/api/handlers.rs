//! API Handlers
//!
//! HTTP request handlers exposing the exam service operations.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{AppError, Result};
use crate::models::{ClearCacheResponse, HealthResponse};
use crate::scrape::{Department, ScrapeResult, StatsResult};
use crate::service::ExamService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: ExamService,
}

impl AppState {
    pub fn new(service: ExamService) -> Self {
        Self { service }
    }
}

/// Handler for GET /departments
pub async fn departments_handler(State(state): State<AppState>) -> Json<&'static [Department]> {
    Json(state.service.list_departments())
}

/// Handler for GET /departments/:slug
///
/// Unknown slugs answer 404; upstream or cache failures keep their own status.
pub async fn tests_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ScrapeResult>> {
    state
        .service
        .get_tests(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("department '{}'", slug)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResult>> {
    Ok(Json(state.service.get_stats().await?))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(
    State(state): State<AppState>,
) -> Result<Json<ClearCacheResponse>> {
    let cleared = state.service.clear_cache().await?;
    Ok(Json(ClearCacheResponse::new(cleared)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::scrape::{ExamSource, Scraper};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct EmptySource;

    #[async_trait]
    impl ExamSource for EmptySource {
        async fn fetch_markup(&self, _id: u32) -> Result<String> {
            Ok("<h3>Tóm</h3><table><tbody></tbody></table>".to_string())
        }
    }

    fn state() -> AppState {
        let service = ExamService::new(
            Arc::new(MemoryStore::new()),
            Scraper::new(Arc::new(EmptySource)),
            60,
        );
        AppState::new(service)
    }

    #[tokio::test]
    async fn test_departments_handler() {
        let response = departments_handler(State(state())).await;
        assert_eq!(response.len(), 5);
        assert_eq!(response[0].slug, "felagsvisindasvid");
    }

    #[tokio::test]
    async fn test_tests_handler_known_slug() {
        let response = tests_handler(State(state()), Path("hugvisindasvid".to_string()))
            .await
            .unwrap();
        assert_eq!(response[0].heading, "Tóm");
        assert!(response[0].tests.is_empty());
    }

    #[tokio::test]
    async fn test_tests_handler_unknown_slug() {
        let result = tests_handler(State(state()), Path("nowhere".to_string())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_handler_with_no_rows() {
        let response = stats_handler(State(state())).await.unwrap();
        assert_eq!(response.num_tests, 0);
        assert_eq!(response.average_students, "0.00");
    }

    #[tokio::test]
    async fn test_clear_cache_handler() {
        let state = state();
        let stats = stats_handler(State(state.clone())).await.unwrap();
        assert_eq!(stats.num_tests, 0);

        let response = clear_cache_handler(State(state)).await.unwrap();
        assert!(response.cleared);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
