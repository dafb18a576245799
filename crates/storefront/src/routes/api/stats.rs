//! Dashboard statistics handler.

use axum::extract::State;

use flatstore_core::DashboardStats;

use crate::error::{ApiJson, Result};
use crate::middleware::AdminGate;
use crate::services::stats;
use crate::state::AppState;

/// `GET /api/stats`
pub async fn show(
    State(state): State<AppState>,
    _admin: AdminGate,
) -> Result<ApiJson<DashboardStats>> {
    Ok(ApiJson(stats::dashboard(state.db()).await?))
}
