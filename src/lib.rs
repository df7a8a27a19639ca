//! Exam Timetable - cache-aside scraper for university exam listings
//!
//! Scrapes per-department exam tables and aggregate statistics from the
//! timetable endpoint and serves repeat requests from a TTL cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod scrape;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use service::ExamService;
pub use tasks::spawn_cleanup_task;
