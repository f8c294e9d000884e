//! # Health Check
//!
//! `GET /api/health` for the web UI. Orchestrator probes live at
//! `/health/liveness` and `/health/readiness`.

use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Build the health router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health -- Report that the server is up.
async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK",
        timestamp: Utc::now(),
    })
}
