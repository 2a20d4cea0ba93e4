//! Data transfer objects specific to the HTTP surface.
//!
//! Planning requests and responses are the service's own `PlanRequest` and
//! `PlanResponse`.

use serde::Serialize;

/// Response for a successful snapshot reload.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    /// Version of the snapshot now active
    pub version: u64,
    pub stops: usize,
    pub trips: usize,
    pub patterns: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
