//! Flatstore Core - Shared domain library.
//!
//! This crate provides the types and rules used across all Flatstore components:
//! - `storefront` - JSON API server over the flat-file collections
//! - `cli` - Command-line tools for seeding, admin accounts and reports
//!
//! # Architecture
//!
//! The core crate contains only types, pure computations and client-side
//! stores over an abstract [`storage::LocalStorage`]. No filesystem access,
//! no HTTP. Every price shown or charged anywhere is computed by
//! [`effective_price`].
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, discounts and statuses
//! - [`models`] - Products, categories, orders, reviews and users as stored
//! - [`stats`] - Per-product counters and the dashboard aggregate
//! - [`catalog`] - Category filtering and product display models
//! - [`cart`], [`favorites`], [`identity`] - Client-held state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod identity;
pub mod models;
pub mod stats;
pub mod storage;
pub mod types;

pub use identity::{Identity, IdentityProvider};
pub use stats::{DashboardStats, ProductStats, StatKind};
pub use types::*;
