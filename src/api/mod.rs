//! API Module
//!
//! HTTP handlers and routing for the exam timetable.
//!
//! # Endpoints
//! - `GET /departments` - List departments
//! - `GET /departments/:slug` - Exam groups for one department
//! - `GET /stats` - Aggregate exam statistics
//! - `DELETE /cache` - Flush the cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
