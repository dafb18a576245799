//! Stored entity records and request bodies.
//!
//! Field names follow the JSON wire format (camelCase) so the same types
//! are used for the collection files, the HTTP API and the client.

pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use order::{LineItem, Order, OrderRequest, items_total};
pub use product::{Category, NewCategory, NewProduct, Product, ProductPatch};
pub use review::{AdminReply, NewReview, Review, reviews_by_user};
pub use user::User;
