//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! fs-cli admin create -u manager -e manager@store.kz -p 's3cret'
//!
//! # Or keep the password out of shell history
//! FLATSTORE_ADMIN_PASSWORD='s3cret' fs-cli admin create -u manager
//! ```
//!
//! # Environment Variables
//!
//! - `FLATSTORE_ADMIN_PASSWORD` - Password used when `-p` is omitted

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use flatstore_core::{Role, UserId};
use flatstore_storefront::config::{ConfigError, get_required_env};
use flatstore_storefront::db::RepositoryError;
use flatstore_storefront::db::seed::{SeedError, upgrade_legacy_users};
use flatstore_storefront::services::auth::{AuthError, AuthService};

use super::open_database;

/// Environment variable consulted when no password flag is given.
pub const ADMIN_PASSWORD_ENV: &str = "FLATSTORE_ADMIN_PASSWORD";

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Password neither passed nor set in the environment.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The data directory could not be opened.
    #[error("Data directory error: {0}")]
    Repository(#[from] RepositoryError),

    /// Existing accounts could not be upgraded.
    #[error("Could not upgrade stored accounts: {0}")]
    Seed(#[from] SeedError),

    /// Account creation was rejected.
    #[error("Could not create admin: {0}")]
    Auth(#[from] AuthError),
}

/// Create a new admin account.
///
/// # Returns
///
/// The ID of the created account.
///
/// # Errors
///
/// Returns `AdminError::Auth` if the username is blank or already taken.
pub async fn create_user(
    data_dir: &Path,
    username: &str,
    email: &str,
    password: Option<String>,
) -> Result<UserId, AdminError> {
    dotenvy::dotenv().ok();

    let password = match password {
        Some(password) => SecretString::from(password),
        None => SecretString::from(get_required_env(ADMIN_PASSWORD_ENV)?),
    };

    let db = open_database(data_dir)?;
    let upgraded = upgrade_legacy_users(&db).await?;
    if upgraded > 0 {
        tracing::info!("Rehashed {} plaintext account passwords", upgraded);
    }
    tracing::info!("Creating admin account: {}", username);

    let user = AuthService::new(&db)
        .create_account(username, password.expose_secret(), email, Role::Admin)
        .await?;

    tracing::info!(
        "Admin account created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );
    Ok(user.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flatstore_storefront::db::users::UserRepository;

    use super::*;

    #[tokio::test]
    async fn test_create_admin_in_empty_directory() {
        let dir = tempfile::tempdir().unwrap();

        let id = create_user(dir.path(), "manager", "m@store.kz", Some("pw".to_string()))
            .await
            .unwrap();
        assert_eq!(id, UserId::new(1));

        let db = open_database(dir.path()).unwrap();
        let stored = UserRepository::new(&db)
            .find_by_username("manager")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        create_user(dir.path(), "manager", "", Some("pw".to_string()))
            .await
            .unwrap();

        let err = create_user(dir.path(), "manager", "", Some("other".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Auth(AuthError::UserAlreadyExists)));
    }
}
