//! Category route handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use flatstore_core::CategoryId;
use flatstore_core::models::{Category, NewCategory};

use super::products::MessageBody;
use crate::error::{ApiJson, ApiPath, Result};
use crate::middleware::AdminGate;
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// `GET /api/categories`
pub async fn index(State(state): State<AppState>) -> Result<ApiJson<Vec<Category>>> {
    Ok(ApiJson(CatalogService::new(state.db()).list_categories().await?))
}

/// `POST /api/categories`
#[instrument(skip(state, _admin, new), fields(name = %new.name))]
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminGate,
    ApiJson(new): ApiJson<NewCategory>,
) -> Result<impl IntoResponse> {
    let category = CatalogService::new(state.db()).create_category(new).await?;
    Ok((StatusCode::CREATED, ApiJson(category)))
}

/// `DELETE /api/categories/{id}`
///
/// Products in the category are deleted with it.
#[instrument(skip(state, _admin))]
pub async fn destroy(
    State(state): State<AppState>,
    _admin: AdminGate,
    ApiPath(id): ApiPath<CategoryId>,
) -> Result<ApiJson<MessageBody>> {
    let removed = CatalogService::new(state.db()).delete_category(id).await?;
    tracing::info!(category_id = %id, products_removed = removed, "Category deleted");
    Ok(ApiJson(MessageBody::new("Category deleted")))
}
