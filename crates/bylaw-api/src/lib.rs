//! # bylaw-api -- Axum API for the Bylaw Compliance Stack
//!
//! HTTP surface over [`bylaw_core`] and [`bylaw_resolver`]. A web UI posts
//! project rows for compliance checks and free-text bylaw questions.
//!
//! ## API Surface
//!
//! | Route                       | Module                       |
//! |-----------------------------|------------------------------|
//! | `POST /api/checkCompliance` | [`routes::compliance`]       |
//! | `POST /api/askBylaw`        | [`routes::bylaw`]            |
//! | `GET /api/health`           | [`routes::health`]           |
//! | `GET /health/liveness`      | probe                        |
//! | `GET /health/readiness`     | probe                        |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → Handler
//! ```

pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::compliance::router())
        .merge(routes::bylaw::router())
        .merge(routes::health::router())
        .with_state(state);

    let probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new()
        .merge(probes)
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Liveness probe -- always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe -- returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
