//! Order assembly.
//!
//! An order is accepted as submitted: line items are not checked against the
//! catalog and the total is not recomputed. Each line item whose product
//! still exists bumps that product's purchased counter; unknown product ids
//! are skipped.
//!
//! The products collection is written before the order is appended. The two
//! writes are not atomic together; if the second fails the counters have
//! already moved.

use chrono::Utc;

use flatstore_core::models::{Order, OrderRequest, Product};
use flatstore_core::{OrderId, UserId};

use crate::db::{Collection, Database, RepositoryError};

/// Places and lists orders.
pub struct OrderService<'a> {
    db: &'a Database,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Persist a submitted order and count its units as purchased.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if either collection cannot be read or
    /// written.
    #[tracing::instrument(skip(self, request), fields(user_id = %request.user_id, items = request.items.len()))]
    pub async fn create_order(&self, request: OrderRequest) -> Result<Order, RepositoryError> {
        let guard = self
            .db
            .begin(&[Collection::Products, Collection::Orders])
            .await;

        let mut products = guard.load::<Product>(Collection::Products).await?;
        for item in &request.items {
            match products
                .records_mut()
                .iter_mut()
                .find(|product| product.id == item.product_id)
            {
                Some(product) => product.stats.record_purchase(item.quantity),
                None => tracing::debug!(
                    product_id = %item.product_id,
                    "Ordered product no longer exists, skipping stats"
                ),
            }
        }
        guard.save(&products).await?;

        let mut orders = guard.load::<Order>(Collection::Orders).await?;
        let order = Order::from_request(OrderId::new(orders.allocate_id()?), request, Utc::now());
        orders.records_mut().push(order.clone());
        guard.save(&orders).await?;

        tracing::info!(order_id = %order.id, total = %order.total, "Order placed");
        Ok(order)
    }

    /// Orders placed by `user_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the orders collection cannot be read.
    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .db
            .read_all::<Order>(Collection::Orders)
            .await?
            .into_iter()
            .filter(|order| order.user_id == user_id)
            .collect())
    }
}
