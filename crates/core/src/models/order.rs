//! Orders and their line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus, Price, ProductId, UserId};

/// A (product, quantity, price snapshot) tuple inside a cart or order.
///
/// Name, price and image are captured when the product is added to the cart
/// and are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Weak reference; the product may no longer exist.
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the moment the item was added.
    pub price: Price,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Sum of line totals.
#[must_use]
pub fn items_total(items: &[LineItem]) -> Price {
    items.iter().map(LineItem::line_total).sum()
}

/// Checkout submission: a flat snapshot of the cart.
///
/// The total is computed by the submitter and stored as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    pub total: Price,
}

/// A persisted, immutable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    pub total: Price,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Freeze a submission into an order.
    #[must_use]
    pub fn from_request(id: OrderId, request: OrderRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: request.user_id,
            items: request.items,
            total: request.total,
            created_at,
            status: OrderStatus::Completed,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_order_request_wire_shape() {
        let request: OrderRequest = serde_json::from_value(json!({
            "userId": 2,
            "items": [
                { "productId": 1, "name": "Смартфон", "price": 75, "quantity": 2, "image": "/assets/phone.jpg" }
            ],
            "total": 150
        }))
        .unwrap();

        assert_eq!(request.items.len(), 1);
        assert_eq!(items_total(&request.items), Price::from_units(150));
    }

    #[test]
    fn test_negative_quantity_is_malformed() {
        let result = serde_json::from_value::<LineItem>(json!({
            "productId": 1, "name": "x", "price": 1, "quantity": -1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_order_keeps_submitted_total() {
        let request = OrderRequest {
            user_id: UserId::new(2),
            items: vec![LineItem {
                product_id: ProductId::new(1),
                name: "Смартфон".to_owned(),
                price: Price::from_units(75),
                quantity: 2,
                image: None,
            }],
            total: Price::from_units(1),
        };
        let order = Order::from_request(OrderId::new(1), request, Utc::now());
        assert_eq!(order.total, Price::from_units(1));
        assert_eq!(order.status, OrderStatus::Completed);

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["status"], json!("completed"));
        assert!(value.get("createdAt").is_some());
    }
}
