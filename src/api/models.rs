//! Response bodies owned by the HTTP surface.
//!
//! Facade payloads travel as already-stamped JSON bytes; only the service
//! endpoints and errors have their own shapes here.

use serde::Serialize;
use std::collections::HashMap;

use crate::observability::MetricsSnapshot;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, String>,
    pub vendor: MetricsSnapshot,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
