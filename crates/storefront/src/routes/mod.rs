//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness probe
//! GET    /health/ready           - Readiness probe (data directory readable)
//!
//! # Accounts
//! POST   /api/login              - Sign in, stores identity in session
//! POST   /api/register           - Create a shopper account (201, 409 if taken)
//! POST   /api/logout             - Clear session identity (204)
//! GET    /api/session            - Current identity (401 if none)
//!
//! # Catalog
//! GET    /api/products           - Products with embedded category
//! POST   /api/products           - Create product (admin)
//! PUT    /api/products/{id}      - Patch product (admin)
//! DELETE /api/products/{id}      - Delete product (admin)
//! POST   /api/products/{id}/favorite - Adjust favorited counter
//! GET    /api/categories         - Categories
//! POST   /api/categories         - Create category (admin)
//! DELETE /api/categories/{id}    - Delete category and its products (admin)
//!
//! # Orders
//! POST   /api/orders             - Place an order (201)
//! GET    /api/orders/user?userId - Orders for one user
//!
//! # Reviews
//! GET    /api/reviews            - All reviews
//! POST   /api/reviews            - Submit a review (201)
//! PUT    /api/reviews/{id}       - Attach admin reply (admin)
//!
//! # Dashboard
//! GET    /api/stats              - Revenue, order count, top products (admin)
//! ```
//!
//! Routes marked admin are open unless `FLATSTORE_REQUIRE_ADMIN` is set.

pub mod api;
pub mod health;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .nest("/api", api::routes())
}
