//! Client-held shopping cart.
//!
//! The cart never talks to the server. Line items are priced when they are
//! added and only reach the server as a flat snapshot at checkout.

use thiserror::Error;

use crate::identity::Identity;
use crate::models::{LineItem, OrderRequest, Product, items_total};
use crate::storage::{LocalStorage, load_json, save_json};
use crate::types::{Price, ProductId};

/// Local storage key for the cart.
pub const CART_KEY: &str = "cart";

/// Reasons a checkout cannot start. Display text is shown to the shopper as is.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    /// No signed-in identity.
    #[error("sign in to place an order")]
    NotSignedIn,

    /// Admins manage the store and cannot buy from it.
    #[error("sign in as a customer to place an order")]
    AdminAccount,

    /// Nothing to order.
    #[error("your cart is empty")]
    EmptyCart,
}

/// The shopper's basket.
///
/// Holds at most one line item per product.
#[derive(Debug)]
pub struct CartStore<S: LocalStorage> {
    storage: S,
    items: Vec<LineItem>,
}

impl<S: LocalStorage> CartStore<S> {
    /// Restore the cart from storage.
    pub fn load(storage: S) -> Self {
        let items = load_json(&storage, CART_KEY).unwrap_or_default();
        Self { storage, items }
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `product`.
    ///
    /// A product already in the cart gets its quantity bumped; its price
    /// snapshot is kept even if the catalog price changed since.
    pub fn add(&mut self, product: &Product) {
        if let Some(item) = self.find_mut(product.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(LineItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.effective_price(),
                quantity: 1,
                image: product.image.clone(),
            });
        }
        self.persist();
    }

    /// Drop the line item for `product_id`.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.product_id != product_id);
        self.persist();
    }

    /// Adjust a quantity by `delta`; a result of zero or less removes the line.
    pub fn change_quantity(&mut self, product_id: ProductId, delta: i64) {
        let Some(item) = self.find_mut(product_id) else {
            return;
        };
        let next = i64::from(item.quantity) + delta;
        if next <= 0 {
            self.remove(product_id);
            return;
        }
        item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        self.persist();
    }

    /// Sum of unit price snapshots times quantities.
    #[must_use]
    pub fn total(&self) -> Price {
        items_total(&self.items)
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Build the order submission for `identity`.
    ///
    /// The cart is left as is; call [`clear`](Self::clear) once the server has
    /// accepted the order so a failed request keeps the basket intact.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] when nobody is signed in, when the account
    /// is an administrator, or when the cart is empty.
    pub fn checkout_request(&self, identity: Option<&Identity>) -> Result<OrderRequest, CheckoutError> {
        let identity = identity.ok_or(CheckoutError::NotSignedIn)?;
        if identity.is_admin() {
            return Err(CheckoutError::AdminAccount);
        }
        if self.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(OrderRequest {
            user_id: identity.id,
            items: self.items.clone(),
            total: self.total(),
        })
    }

    /// Give back the underlying storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn find_mut(&mut self, product_id: ProductId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }

    fn persist(&mut self) {
        save_json(&mut self.storage, CART_KEY, &self.items);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::stats::ProductStats;
    use crate::storage::MemoryStorage;
    use crate::types::{CategoryId, DiscountPercent, Role, UserId};

    fn product(id: i32, price: i64, discount: u8) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            base_price: Price::from_units(price),
            category_id: CategoryId::new(1),
            description: String::new(),
            image: Some(format!("/assets/{id}.jpg")),
            discount: DiscountPercent::new(discount).unwrap(),
            stats: ProductStats::default(),
        }
    }

    fn shopper() -> Identity {
        Identity {
            id: UserId::new(2),
            username: "shopper".to_owned(),
            role: Role::User,
            email: String::new(),
        }
    }

    fn empty_cart() -> CartStore<MemoryStorage> {
        CartStore::load(MemoryStorage::new())
    }

    #[test]
    fn test_adding_twice_increments_quantity() {
        let mut cart = empty_cart();
        let phone = product(1, 100, 0);
        cart.add(&phone);
        cart.add(&phone);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_captures_discounted_price() {
        let mut cart = empty_cart();
        cart.add(&product(1, 100, 25));
        assert_eq!(cart.items()[0].price, Price::from_units(75));
        assert_eq!(cart.items()[0].image.as_deref(), Some("/assets/1.jpg"));
    }

    #[test]
    fn test_price_snapshot_not_refreshed() {
        let mut cart = empty_cart();
        let mut phone = product(1, 100, 0);
        cart.add(&phone);

        phone.discount = DiscountPercent::new(50).unwrap();
        cart.add(&phone);

        assert_eq!(cart.items()[0].price, Price::from_units(100));
        assert_eq!(cart.total(), Price::from_units(200));
    }

    #[test]
    fn test_change_quantity_down_to_zero_removes_item() {
        let mut cart = empty_cart();
        let phone = product(1, 100, 0);
        cart.add(&phone);
        cart.add(&phone);
        cart.add(&phone);

        cart.change_quantity(phone.id, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_below_zero_removes_item() {
        let mut cart = empty_cart();
        cart.add(&product(1, 100, 0));
        cart.change_quantity(ProductId::new(1), -5);
        assert!(cart.items().iter().all(|i| i.product_id != ProductId::new(1)));
    }

    #[test]
    fn test_change_quantity_unknown_product_is_noop() {
        let mut cart = empty_cart();
        cart.add(&product(1, 100, 0));
        cart.change_quantity(ProductId::new(9), 4);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_and_total() {
        let mut cart = empty_cart();
        cart.add(&product(1, 100, 25));
        cart.add(&product(1, 100, 25));
        cart.add(&product(2, 5000, 0));
        assert_eq!(cart.total(), Price::from_units(5150));

        cart.remove(ProductId::new(2));
        assert_eq!(cart.total(), Price::from_units(150));
    }

    #[test]
    fn test_cart_is_persisted_after_every_mutation() {
        let mut cart = empty_cart();
        cart.add(&product(1, 100, 0));
        cart.change_quantity(ProductId::new(1), 2);

        let restored = CartStore::load(cart.into_storage());
        assert_eq!(restored.items().len(), 1);
        assert_eq!(restored.items()[0].quantity, 3);
    }

    #[test]
    fn test_checkout_request_snapshot() {
        let mut cart = empty_cart();
        let phone = product(1, 100, 25);
        cart.add(&phone);
        cart.add(&phone);

        let request = cart.checkout_request(Some(&shopper())).unwrap();
        assert_eq!(request.user_id, UserId::new(2));
        assert_eq!(request.total, Price::from_units(150));
        assert_eq!(request.items, cart.items());
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_checkout_rejections() {
        let mut cart = empty_cart();
        assert_eq!(
            cart.checkout_request(Some(&shopper())),
            Err(CheckoutError::EmptyCart)
        );

        cart.add(&product(1, 100, 0));
        assert_eq!(cart.checkout_request(None), Err(CheckoutError::NotSignedIn));

        let admin = Identity {
            role: Role::Admin,
            ..shopper()
        };
        assert_eq!(
            cart.checkout_request(Some(&admin)),
            Err(CheckoutError::AdminAccount)
        );
    }

    #[test]
    fn test_clear_empties_storage_too() {
        let mut cart = empty_cart();
        cart.add(&product(1, 100, 0));
        cart.clear();
        let restored = CartStore::load(cart.into_storage());
        assert!(restored.is_empty());
    }
}
