//! Health check endpoint for load balancers and monitors.
//!
//! Provides a simple liveness probe that returns 200 OK when the process is running.
//! It only checks that the process can respond to HTTP; no dependencies are probed.

use axum::Json;
use serde::Serialize;

/// Body of a successful health check.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Health check handler.
///
/// Always returns `{"status": "ok"}`.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}
