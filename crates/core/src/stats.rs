//! Inventory statistics.
//!
//! Every product carries two counters: how many units were purchased and how
//! many shoppers currently have it in their favorites. Counters never go
//! below zero. The dashboard summary is derived from these counters and the
//! order history.

use serde::{Deserialize, Serialize};

use crate::models::{Order, Product};
use crate::types::Price;

/// Number of products reported in [`DashboardStats::top_products`].
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Per-product counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ProductStats {
    /// Units purchased across all orders.
    #[serde(default)]
    pub purchased: u32,
    /// Shoppers that have the product in their favorites.
    #[serde(default)]
    pub favorited: u32,
}

/// Which counter to adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    /// Units sold across all orders.
    Purchased,
    /// Shoppers holding the product as a favorite.
    Favorited,
}

impl ProductStats {
    /// Read a counter.
    #[must_use]
    pub const fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Purchased => self.purchased,
            StatKind::Favorited => self.favorited,
        }
    }

    /// Record `quantity` purchased units. Purchases are never reverted.
    pub const fn record_purchase(&mut self, quantity: u32) {
        self.purchased = self.purchased.saturating_add(quantity);
    }

    /// Apply a signed delta, flooring the counter at zero.
    pub fn apply_delta(&mut self, kind: StatKind, delta: i64) {
        let counter = match kind {
            StatKind::Purchased => &mut self.purchased,
            StatKind::Favorited => &mut self.favorited,
        };
        let next = (i64::from(*counter) + delta).max(0);
        *counter = u32::try_from(next).unwrap_or(u32::MAX);
    }
}

/// Admin dashboard summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Sum of submitted order totals.
    pub total_revenue: Price,
    /// Number of orders ever placed.
    pub total_orders: usize,
    /// Best sellers by purchased units, descending.
    pub top_products: Vec<Product>,
}

impl DashboardStats {
    /// Summarize products and orders.
    ///
    /// Ties keep catalog order.
    #[must_use]
    pub fn compute(products: &[Product], orders: &[Order]) -> Self {
        let mut ranked = products.to_vec();
        ranked.sort_by(|a, b| b.stats.purchased.cmp(&a.stats.purchased));
        ranked.truncate(TOP_PRODUCTS_LIMIT);

        Self {
            total_revenue: orders.iter().map(|order| order.total).sum(),
            total_orders: orders.len(),
            top_products: ranked,
        }
    }
}
