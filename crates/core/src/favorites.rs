//! Client-held favorites list.
//!
//! Toggling a favorite yields the delta to apply to the product's shared
//! `favorited` counter on the server.
//!
//! The list is keyed by storage, not by account: two people sharing one
//! client share one list, while the server counter is global.

use thiserror::Error;

use crate::catalog::ProductView;
use crate::identity::Identity;
use crate::models::{Category, Product};
use crate::storage::{LocalStorage, load_json, save_json};
use crate::types::ProductId;

/// Local storage key for favorites.
pub const FAVORITES_KEY: &str = "favorites";

/// Favorites require a signed-in shopper.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteError {
    /// No signed-in identity.
    #[error("sign in to add products to favorites")]
    NotSignedIn,
}

/// Outcome of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    /// The product was not a favorite and now is.
    Added,
    /// The product was a favorite and no longer is.
    Removed,
}

impl FavoriteToggle {
    /// Change to send for the product's `favorited` counter.
    #[must_use]
    pub const fn stat_delta(self) -> i64 {
        match self {
            Self::Added => 1,
            Self::Removed => -1,
        }
    }
}

/// Saved product snapshots.
#[derive(Debug)]
pub struct FavoritesStore<S: LocalStorage> {
    storage: S,
    items: Vec<Product>,
}

impl<S: LocalStorage> FavoritesStore<S> {
    /// Restore favorites from storage.
    pub fn load(storage: S) -> Self {
        let items = load_json(&storage, FAVORITES_KEY).unwrap_or_default();
        Self { storage, items }
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    /// Add `product` if absent, remove it otherwise.
    ///
    /// # Errors
    ///
    /// Returns `FavoriteError::NotSignedIn` without touching the list when
    /// `viewer` is `None`.
    pub fn toggle(
        &mut self,
        viewer: Option<&Identity>,
        product: &Product,
    ) -> Result<FavoriteToggle, FavoriteError> {
        if viewer.is_none() {
            return Err(FavoriteError::NotSignedIn);
        }

        let outcome = if let Some(index) = self.items.iter().position(|p| p.id == product.id) {
            self.items.remove(index);
            FavoriteToggle::Removed
        } else {
            self.items.push(product.clone());
            FavoriteToggle::Added
        };
        self.persist();
        Ok(outcome)
    }

    /// Remove a favorite from the profile page.
    ///
    /// Returns `None` if the product was not a favorite.
    pub fn remove(&mut self, product_id: ProductId) -> Option<FavoriteToggle> {
        let before = self.items.len();
        self.items.retain(|p| p.id != product_id);
        if self.items.len() == before {
            return None;
        }
        self.persist();
        Some(FavoriteToggle::Removed)
    }

    /// Display models for the saved snapshots.
    #[must_use]
    pub fn views(&self, categories: &[Category]) -> Vec<ProductView> {
        self.items
            .iter()
            .map(|product| ProductView::new(product, categories))
            .collect()
    }

    /// Give back the underlying storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        save_json(&mut self.storage, FAVORITES_KEY, &self.items);
    }
}
