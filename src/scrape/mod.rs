//! Scrape Pipeline
//!
//! Fetches timetable markup from the upstream source and turns it into exam
//! groups or aggregate statistics. Each call performs exactly one fetch and
//! never retries.

pub mod departments;
pub mod parser;
pub mod stats;
pub mod types;
pub mod upstream;

use std::sync::Arc;

use tracing::info;

use crate::error::Result;

pub use departments::{Department, ALL_DEPARTMENTS_ID, DEPARTMENTS};
pub use types::{ExamGroup, ExamRecord, ScrapeResult, StatsResult};
pub use upstream::{ExamSource, HttpSource};

/// Runs fetch-then-parse against an injected [`ExamSource`].
#[derive(Clone)]
pub struct Scraper {
    source: Arc<dyn ExamSource>,
}

impl Scraper {
    pub fn new(source: Arc<dyn ExamSource>) -> Self {
        Self { source }
    }

    /// Scrapes the exam groups of one department.
    pub async fn fetch_department_exams(&self, department: &Department) -> Result<ScrapeResult> {
        let html = self.source.fetch_markup(department.id).await?;
        let groups = parser::parse_document(&html)?.into_groups();

        info!(
            slug = department.slug,
            groups = groups.len(),
            "Scraped department timetable"
        );
        Ok(groups)
    }

    /// Computes statistics over every exam row of every department.
    pub async fn compute_stats(&self) -> Result<StatsResult> {
        let html = self.source.fetch_markup(ALL_DEPARTMENTS_ID).await?;
        let document = parser::parse_document(&html)?;
        let stats = stats::summarize(document.rows());

        info!(num_tests = stats.num_tests, "Computed exam statistics");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records requested ids and replies with fixed markup.
    struct FixedSource {
        html: String,
        requested: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl ExamSource for FixedSource {
        async fn fetch_markup(&self, id: u32) -> Result<String> {
            self.requested.lock().unwrap().push(id);
            Ok(self.html.clone())
        }
    }

    struct DownSource;

    #[async_trait]
    impl ExamSource for DownSource {
        async fn fetch_markup(&self, _id: u32) -> Result<String> {
            Err(AppError::UpstreamUnavailable("connection refused".to_string()))
        }
    }

    const MARKUP: &str = "<div><h3>Deild</h3></div>\
        <table><tbody>\
        <tr><td>A</td><td>a</td><td>S</td><td>10</td><td>d</td></tr>\
        <tr><td>B</td><td>b</td><td>S</td><td>20</td><td>d</td></tr>\
        </tbody></table>\
        <table><tbody>\
        <tr><td>C</td><td>c</td><td>S</td><td>30</td><td>d</td></tr>\
        </tbody></table>";

    fn fixed() -> Arc<FixedSource> {
        Arc::new(FixedSource {
            html: MARKUP.to_string(),
            requested: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_fetch_department_exams_uses_department_id() {
        let source = fixed();
        let scraper = Scraper::new(source.clone());
        let department = departments::find("menntavisindasvid").unwrap();

        let groups = scraper.fetch_department_exams(department).await.unwrap();

        assert_eq!(*source.requested.lock().unwrap(), vec![4]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].heading, "Deild");
        assert_eq!(groups[1].heading, "");
        assert_eq!(groups[1].tests[0].course, "C");
    }

    #[tokio::test]
    async fn test_compute_stats_uses_all_sentinel() {
        let source = fixed();
        let scraper = Scraper::new(source.clone());

        let stats = scraper.compute_stats().await.unwrap();

        assert_eq!(*source.requested.lock().unwrap(), vec![ALL_DEPARTMENTS_ID]);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.num_tests, 3);
        assert_eq!(stats.num_students, 60.0);
        assert_eq!(stats.average_students, "20.00");
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let scraper = Scraper::new(Arc::new(DownSource));
        let department = departments::find("hugvisindasvid").unwrap();

        assert!(matches!(
            scraper.fetch_department_exams(department).await,
            Err(AppError::UpstreamUnavailable(_))
        ));
        assert!(matches!(
            scraper.compute_stats().await,
            Err(AppError::UpstreamUnavailable(_))
        ));
    }
}
