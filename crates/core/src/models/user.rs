//! Store accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::types::{PasswordHash, Role, UserId};

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Unique across all accounts.
    pub username: String,
    pub password_hash: PasswordHash,
    pub role: Role,
    #[serde(default)]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The public view of this account.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            email: self.email.clone(),
        }
    }
}
