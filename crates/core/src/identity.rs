//! Signed-in identity.
//!
//! The storefront keeps the identity in a server session; a client keeps a
//! copy in its local storage. Both sides expose it through
//! [`IdentityProvider`].

use serde::{Deserialize, Serialize};

use crate::storage::{LocalStorage, load_json, save_json};
use crate::types::{Role, UserId};

/// Local storage key for the signed-in identity.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Public account data: what login returns and what a session remembers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub email: String,
}

impl Identity {
    /// Whether the identity belongs to an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Source of the current identity.
pub trait IdentityProvider {
    /// The signed-in account, if any.
    fn current_user(&self) -> Option<Identity>;
}

/// Client-side session backed by local storage.
#[derive(Debug)]
pub struct ClientSession<S: LocalStorage> {
    storage: S,
    current: Option<Identity>,
}

impl<S: LocalStorage> ClientSession<S> {
    /// Restore the session from storage.
    pub fn load(storage: S) -> Self {
        let current = load_json(&storage, CURRENT_USER_KEY);
        Self { storage, current }
    }

    /// Remember a freshly authenticated identity.
    pub fn sign_in(&mut self, identity: Identity) {
        save_json(&mut self.storage, CURRENT_USER_KEY, &identity);
        self.current = Some(identity);
    }

    /// Forget the identity.
    pub fn sign_out(&mut self) {
        self.storage.remove_item(CURRENT_USER_KEY);
        self.current = None;
    }

    /// Give back the underlying storage.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

impl<S: LocalStorage> IdentityProvider for ClientSession<S> {
    fn current_user(&self) -> Option<Identity> {
        self.current.clone()
    }
}
