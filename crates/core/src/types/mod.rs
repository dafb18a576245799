//! Core types for Flatstore.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod id;
pub mod price;
pub mod status;

pub use credential::PasswordHash;
pub use id::*;
pub use price::{DiscountPercent, Price, PriceError, effective_price};
pub use status::*;
