//! Order route handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use flatstore_core::UserId;
use flatstore_core::models::{Order, OrderRequest};

use crate::error::{ApiJson, ApiQuery, Result};
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Query for `GET /api/orders/user`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrdersQuery {
    pub user_id: UserId,
}

/// `POST /api/orders`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<OrderRequest>,
) -> Result<impl IntoResponse> {
    let order = OrderService::new(state.db()).create_order(request).await?;
    Ok((StatusCode::CREATED, ApiJson(order)))
}

/// `GET /api/orders/user?userId=<id>`
#[instrument(skip(state))]
pub async fn for_user(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserOrdersQuery>,
) -> Result<ApiJson<Vec<Order>>> {
    Ok(ApiJson(
        OrderService::new(state.db()).orders_for_user(query.user_id).await?,
    ))
}
