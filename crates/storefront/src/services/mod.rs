//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Account registration and password login
//! - `catalog` - Products, categories and the favorite counter
//! - `orders` - Order assembly and purchase counting
//! - `reviews` - Review submission and admin replies
//! - `stats` - Admin dashboard figures

pub mod auth;
pub mod catalog;
pub mod orders;
pub mod reviews;
pub mod stats;
