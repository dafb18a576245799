//! Product route handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use flatstore_core::ProductId;
use flatstore_core::catalog::ProductWithCategory;
use flatstore_core::models::{NewProduct, Product, ProductPatch};

use crate::error::{ApiJson, ApiPath, Result};
use crate::middleware::AdminGate;
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// Confirmation body for deletions.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Favorite toggle body. `delta` is `1` or `-1`.
#[derive(Debug, Deserialize)]
pub struct FavoriteDelta {
    pub delta: i64,
}

/// `GET /api/products`
pub async fn index(State(state): State<AppState>) -> Result<ApiJson<Vec<ProductWithCategory>>> {
    Ok(ApiJson(CatalogService::new(state.db()).list_products().await?))
}

/// `POST /api/products`
#[instrument(skip(state, _admin, new), fields(name = %new.name))]
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminGate,
    ApiJson(new): ApiJson<NewProduct>,
) -> Result<impl IntoResponse> {
    let product = CatalogService::new(state.db()).create_product(new).await?;
    Ok((StatusCode::CREATED, ApiJson(product)))
}

/// `PUT /api/products/{id}`
#[instrument(skip(state, _admin, patch))]
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminGate,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<ApiJson<Product>> {
    Ok(ApiJson(
        CatalogService::new(state.db())
            .update_product(id, patch)
            .await?,
    ))
}

/// `DELETE /api/products/{id}`
#[instrument(skip(state, _admin))]
pub async fn destroy(
    State(state): State<AppState>,
    _admin: AdminGate,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<ApiJson<MessageBody>> {
    CatalogService::new(state.db()).delete_product(id).await?;
    Ok(ApiJson(MessageBody::new("Product deleted")))
}

/// `POST /api/products/{id}/favorite`
#[instrument(skip(state, body), fields(delta = body.delta))]
pub async fn favorite(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(body): ApiJson<FavoriteDelta>,
) -> Result<ApiJson<Product>> {
    Ok(ApiJson(
        CatalogService::new(state.db())
            .apply_favorite_delta(id, body.delta)
            .await?,
    ))
}
