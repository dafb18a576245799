//! JSON API consumed by the storefront and admin frontends.

pub mod auth;
pub mod categories;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod stats;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::error::AppError;
use crate::state::AppState;

/// Account and session routes.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::current))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/{id}", put(products::update).delete(products::destroy))
        .route("/{id}/favorite", post(products::favorite))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/{id}", axum::routing::delete(categories::destroy))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create))
        .route("/user", get(orders::for_user))
}

fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::index).post(reviews::create))
        .route("/{id}", put(reviews::reply))
}

async fn not_found() -> AppError {
    AppError::NotFound("API endpoint not found".to_string())
}

/// Every `/api` route. Unknown paths answer 404 with a JSON body.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/orders", order_routes())
        .nest("/reviews", review_routes())
        .route("/stats", get(stats::show))
        .fallback(not_found)
}
