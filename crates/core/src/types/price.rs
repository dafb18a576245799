//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are single-currency amounts. They are stored and sent over the
//! wire as plain JSON numbers but computed with [`Decimal`] so that discounts
//! never drift between the catalog, the cart and the order total.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when validating price inputs.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Discount outside the 0-100 range.
    #[error("discount must be between 0 and 100 (got {0})")]
    DiscountOutOfRange(i64),
    /// Base price must be strictly positive.
    #[error("price must be greater than zero")]
    NotPositive,
}

/// A monetary amount in the store currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the price if it is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotPositive` for zero or negative amounts.
    pub fn ensure_positive(self) -> Result<Self, PriceError> {
        if self.0 > Decimal::ZERO {
            Ok(self)
        } else {
            Err(PriceError::NotPositive)
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// A whole-number discount percentage between 0 and 100 inclusive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct DiscountPercent(u8);

impl DiscountPercent {
    /// No discount.
    pub const NONE: Self = Self(0);

    /// Create a discount, rejecting values above 100.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::DiscountOutOfRange` when `percent > 100`.
    pub fn new(percent: u8) -> Result<Self, PriceError> {
        Self::try_from(i64::from(percent))
    }

    /// The percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Whether any discount applies.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.0 > 0
    }
}

impl TryFrom<i64> for DiscountPercent {
    type Error = PriceError;

    fn try_from(percent: i64) -> Result<Self, Self::Error> {
        u8::try_from(percent)
            .ok()
            .filter(|p| *p <= 100)
            .map(Self)
            .ok_or(PriceError::DiscountOutOfRange(percent))
    }
}

impl From<DiscountPercent> for u8 {
    fn from(discount: DiscountPercent) -> Self {
        discount.0
    }
}

/// Price after applying a discount percentage.
///
/// This is the single source of truth for every displayed or captured price:
/// catalog views, cart line-item snapshots and favorites all go through it.
///
/// ```
/// use flatstore_core::{DiscountPercent, Price, effective_price};
///
/// let base = Price::from_units(100);
/// let discount = DiscountPercent::new(25).unwrap();
/// assert_eq!(effective_price(base, discount), Price::from_units(75));
/// assert_eq!(effective_price(base, DiscountPercent::NONE), base);
/// ```
#[must_use]
pub fn effective_price(base: Price, discount: DiscountPercent) -> Price {
    if !discount.is_active() {
        return base;
    }
    let remaining = Decimal::from(100 - discount.value());
    Price(base.0 * remaining / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_effective_price_without_discount_is_identity() {
        for amount in [dec!(0.01), dec!(5000), dec!(150000), dec!(19.99)] {
            let base = Price::new(amount);
            assert_eq!(effective_price(base, DiscountPercent::NONE), base);
        }
    }

    #[test]
    fn test_effective_price_quarter_off() {
        let discounted = effective_price(Price::from_units(100), DiscountPercent::new(25).unwrap());
        assert_eq!(discounted, Price::from_units(75));
    }

    #[test]
    fn test_effective_price_full_discount_is_free() {
        let discounted = effective_price(Price::new(dec!(19.99)), DiscountPercent::new(100).unwrap());
        assert_eq!(discounted, Price::ZERO);
    }

    #[test]
    fn test_effective_price_keeps_fractional_cents() {
        let discounted = effective_price(Price::new(dec!(9.99)), DiscountPercent::new(10).unwrap());
        assert_eq!(discounted.amount(), dec!(8.991));
    }

    #[test]
    fn test_discount_rejects_out_of_range() {
        assert_eq!(
            DiscountPercent::new(101),
            Err(PriceError::DiscountOutOfRange(101))
        );
        assert!(serde_json::from_str::<DiscountPercent>("-5").is_err());
        assert!(serde_json::from_str::<DiscountPercent>("250").is_err());
        assert_eq!(
            serde_json::from_str::<DiscountPercent>("15").unwrap(),
            DiscountPercent::new(15).unwrap()
        );
    }

    #[test]
    fn test_price_wire_format_is_number() {
        let price: Price = serde_json::from_str("150000").unwrap();
        assert_eq!(price, Price::from_units(150_000));

        let price: Price = serde_json::from_str("12.5").unwrap();
        assert_eq!(price.amount(), dec!(12.5));

        let json = serde_json::to_value(Price::from_units(75)).unwrap();
        assert!(json.is_number());
        assert_eq!(json.as_f64(), Some(75.0));
    }

    #[test]
    fn test_price_arithmetic() {
        let total: Price = [Price::from_units(75) * 2, Price::new(dec!(0.5)) * 3]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), dec!(151.5));
    }

    #[test]
    fn test_ensure_positive() {
        assert!(Price::from_units(1).ensure_positive().is_ok());
        assert_eq!(Price::ZERO.ensure_positive(), Err(PriceError::NotPositive));
        assert_eq!(
            Price::from_units(-3).ensure_positive(),
            Err(PriceError::NotPositive)
        );
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::new(dec!(8.5)).to_string(), "8.50");
    }
}
