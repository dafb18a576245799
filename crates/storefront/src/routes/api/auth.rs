//! Account route handlers.
//!
//! Username/password login and registration. A successful login or
//! registration stores the public identity in the session.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use flatstore_core::{Identity, IdentityProvider};

use crate::error::{ApiJson, AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalIdentity, clear_current_identity, set_current_identity};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: SecretString,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: SecretString,
    #[serde(default)]
    pub email: String,
}

/// Body returned by login and registration.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: Identity,
}

async fn remember(session: &Session, identity: Identity) -> Result<AuthResponse> {
    set_current_identity(session, &identity)
        .await
        .map_err(|e| AppError::Internal(format!("session: {e}")))?;
    set_sentry_user(&identity.id, &identity.username);

    Ok(AuthResponse {
        success: true,
        user: identity,
    })
}

/// `POST /api/login`
#[instrument(skip(state, session, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<ApiJson<AuthResponse>> {
    let user = AuthService::new(state.db())
        .login(&request.username, request.password.expose_secret())
        .await
        .inspect_err(|e| tracing::info!(error = %e, "Login rejected"))?;

    Ok(ApiJson(remember(&session, user.identity()).await?))
}

/// `POST /api/register`
#[instrument(skip(state, session, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let user = AuthService::new(state.db())
        .register(
            &request.username,
            request.password.expose_secret(),
            &request.email,
        )
        .await?;

    let body = remember(&session, user.identity()).await?;
    Ok((StatusCode::CREATED, ApiJson(body)))
}

/// `POST /api/logout`
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_identity(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session: {e}")))?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/session`
///
/// Answers from the stored account, not the session copy. A session whose
/// account is gone is cleared.
pub async fn current(
    State(state): State<AppState>,
    session: Session,
    identity: OptionalIdentity,
) -> Result<ApiJson<Identity>> {
    let who = identity
        .current_user()
        .ok_or_else(|| AppError::Unauthorized("not signed in".to_string()))?;

    let Some(user) = AuthService::new(state.db()).account(who.id).await? else {
        tracing::info!(user_id = %who.id, "Session refers to a missing account");
        clear_current_identity(&session)
            .await
            .map_err(|e| AppError::Internal(format!("session: {e}")))?;
        clear_sentry_user();
        return Err(AppError::Unauthorized("account no longer exists".to_string()));
    };

    Ok(ApiJson(user.identity()))
}
