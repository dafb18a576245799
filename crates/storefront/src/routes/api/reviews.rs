//! Review route handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use flatstore_core::ReviewId;
use flatstore_core::models::{AdminReply, NewReview, Review};

use crate::error::{ApiJson, ApiPath, Result};
use crate::middleware::AdminGate;
use crate::services::reviews::ReviewService;
use crate::state::AppState;

/// `GET /api/reviews`
pub async fn index(State(state): State<AppState>) -> Result<ApiJson<Vec<Review>>> {
    Ok(ApiJson(ReviewService::new(state.db()).list().await?))
}

/// `POST /api/reviews`
#[instrument(skip(state, new), fields(product_id = %new.product_id, user_id = %new.user_id))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewReview>,
) -> Result<impl IntoResponse> {
    let review = ReviewService::new(state.db()).submit(new).await?;
    Ok((StatusCode::CREATED, ApiJson(review)))
}

/// `PUT /api/reviews/{id}`
#[instrument(skip(state, _admin, body))]
pub async fn reply(
    State(state): State<AppState>,
    _admin: AdminGate,
    ApiPath(id): ApiPath<ReviewId>,
    ApiJson(body): ApiJson<AdminReply>,
) -> Result<ApiJson<Review>> {
    Ok(ApiJson(
        ReviewService::new(state.db())
            .attach_reply(id, body.admin_reply)
            .await?,
    ))
}
