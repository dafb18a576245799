//! Identity extractors backed by the session.
//!
//! The signed-in [`Identity`] is stored in the tower-sessions session under
//! [`CURRENT_USER_KEY`].

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use flatstore_core::{Identity, IdentityProvider};

use crate::error::AppError;
use crate::state::AppState;

/// Session key for the signed-in identity.
pub const CURRENT_USER_KEY: &str = "current_user";

async fn session_identity(parts: &Parts) -> Option<Identity> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<Identity>(CURRENT_USER_KEY)
        .await
        .ok()
        .flatten()
}

/// Extractor that optionally gets the signed-in identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(OptionalIdentity(identity): OptionalIdentity) -> impl IntoResponse {
///     match identity {
///         Some(who) => format!("Hello, {}!", who.username),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_identity(parts).await))
    }
}

impl IdentityProvider for OptionalIdentity {
    fn current_user(&self) -> Option<Identity> {
        self.0.clone()
    }
}

/// Guard for admin-only routes.
///
/// Open unless `FLATSTORE_REQUIRE_ADMIN` is set; then it rejects requests
/// without a session (401) or with a non-admin identity (403).
#[derive(Debug, Clone)]
pub struct AdminGate(pub Option<Identity>);

impl FromRequestParts<AppState> for AdminGate {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = session_identity(parts).await;
        if !state.config().require_admin {
            return Ok(Self(identity));
        }

        match identity {
            Some(identity) if identity.is_admin() => Ok(Self(Some(identity))),
            Some(identity) => {
                tracing::warn!(user_id = %identity.id, "Non-admin attempted an admin action");
                Err(AppError::Forbidden("admin access required".to_string()))
            }
            None => Err(AppError::Unauthorized("not signed in".to_string())),
        }
    }
}

/// Helper to set the signed-in identity in the session.
///
/// Cycles the session id first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_identity(
    session: &Session,
    identity: &Identity,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(CURRENT_USER_KEY, identity).await
}

/// Helper to clear the signed-in identity from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_identity(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Identity>(CURRENT_USER_KEY).await?;
    Ok(())
}
