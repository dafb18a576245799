//! User repository.
//!
//! Usernames are unique; the check and the insert happen under the users
//! lock so two registrations of the same name cannot both succeed.

use chrono::Utc;

use flatstore_core::models::User;
use flatstore_core::{PasswordHash, Role, UserId};

use super::{Collection, Database, RepositoryError};

/// Repository for account records.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Find a user by exact username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the users collection
    /// doesn't decode.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .db
            .read_all::<User>(Collection::Users)
            .await?
            .into_iter()
            .find(|user| user.username == username))
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the users collection
    /// doesn't decode.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .db
            .read_all::<User>(Collection::Users)
            .await?
            .into_iter()
            .find(|user| user.id == id))
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    /// Returns `RepositoryError::Io` if the collection cannot be written.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: PasswordHash,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let guard = self.db.begin(&[Collection::Users]).await;
        let mut users = guard.load::<User>(Collection::Users).await?;

        if users.records().iter().any(|user| user.username == username) {
            return Err(RepositoryError::Conflict(format!(
                "username {username} already exists"
            )));
        }

        let user = User {
            id: UserId::new(users.allocate_id()?),
            username: username.to_owned(),
            password_hash,
            role,
            email: email.to_owned(),
            created_at: Utc::now(),
        };
        users.records_mut().push(user.clone());
        guard.save(&users).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hash() -> PasswordHash {
        PasswordHash::new("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned())
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = Database::in_memory();
        let users = UserRepository::new(&db);

        let created = users
            .create("aigerim", "aigerim@store.kz", hash(), Role::User)
            .await
            .unwrap();
        assert_eq!(created.id, UserId::new(1));

        let found = users.find_by_username("aigerim").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(users.get_by_id(created.id).await.unwrap(), Some(created));
        assert!(users.find_by_username("Aigerim").await.unwrap().is_none());
        assert!(users.get_by_id(UserId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let db = Database::in_memory();
        let users = UserRepository::new(&db);
        users.create("dana", "", hash(), Role::User).await.unwrap();

        let result = users.create("dana", "other@store.kz", hash(), Role::User).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }
}
