//! Response models for the HTTP API
//!
//! Domain payloads (departments, exam groups, statistics) serialize directly;
//! this module only holds the envelopes the API adds around them.

pub mod responses;

pub use responses::{ClearCacheResponse, ErrorResponse, HealthResponse};
