//! Liveness and readiness probes.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

/// `GET /health/ready`
///
/// Ready when the data directory can be read.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.db().is_ready().await {
        (StatusCode::OK, "ready")
    } else {
        tracing::warn!("Readiness check failed: data store unavailable");
        (StatusCode::SERVICE_UNAVAILABLE, "data store unavailable")
    }
}
