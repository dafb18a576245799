//! Authentication service.
//!
//! Username and password accounts. Passwords are stored as Argon2id PHC
//! strings and never compared in plaintext. Hashing and verification run
//! on tokio's blocking pool.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use flatstore_core::models::User;
use flatstore_core::{PasswordHash, Role, UserId};

use crate::db::users::UserRepository;
use crate::db::{Database, RepositoryError};

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self {
            users: UserRepository::new(db),
        }
    }

    /// Register a shopper account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if the username or password is empty.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<User, AuthError> {
        self.create_account(username, password, email, Role::User)
            .await
    }

    /// Create an account with an explicit role.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        email: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let password_hash = hash_password_blocking(password.to_owned()).await?;

        self.users
            .create(username, email.trim(), password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    /// The stored account behind a session identity, if it still exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the users collection cannot be read.
    pub async fn account(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.get_by_id(id).await?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password_blocking(password.to_owned(), user.password_hash.clone()).await?;

        Ok(user)
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<PasswordHash, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| PasswordHash::new(hash.to_string()))
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or an unparsable hash.
pub fn verify_password(password: &str, hash: &PasswordHash) -> Result<(), AuthError> {
    let parsed_hash = argon2::PasswordHash::new(hash.as_str())
        .map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// [`hash_password`] on the blocking pool.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails or the task dies.
pub async fn hash_password_blocking(password: String) -> Result<PasswordHash, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|_| AuthError::PasswordHash)?
}

/// [`verify_password`] on the blocking pool.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch, or
/// `AuthError::PasswordHash` if the task dies.
pub async fn verify_password_blocking(
    password: String,
    hash: PasswordHash,
) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|_| AuthError::PasswordHash)?
}
