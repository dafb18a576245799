//! Client-local key-value storage.
//!
//! The cart, favorites and signed-in identity live on the client, not on the
//! server. Each store owns a [`LocalStorage`] and writes its whole state as a
//! JSON string under a fixed key after every mutation.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A string key-value scope private to one client.
pub trait LocalStorage {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: String);

    /// Delete `key`.
    fn remove_item(&mut self, key: &str);
}

/// In-process storage, used by tests and headless clients.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove_item(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Decode the JSON stored under `key`; missing or corrupt entries read as `None`.
pub(crate) fn load_json<T: DeserializeOwned>(storage: &impl LocalStorage, key: &str) -> Option<T> {
    storage
        .get_item(key)
        .and_then(|raw| serde_json::from_str(&raw).ok())
}

/// Encode `value` as JSON under `key`.
pub(crate) fn save_json<T: Serialize>(storage: &mut impl LocalStorage, key: &str, value: &T) {
    if let Ok(raw) = serde_json::to_string(value) {
        storage.set_item(key, raw);
    }
}
