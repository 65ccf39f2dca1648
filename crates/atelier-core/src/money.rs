//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  Here every amount is an integer number of minor units, end to      │
//! │  end. Rounding happens exactly once, at the tax step.               │
//! │                                                                     │
//! │  1000 cents / 3 = 333 cents (×3 = 999 cents)                        │
//! │  We KNOW we lost 1 cent, and handle it explicitly                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use atelier_core::money::Money;
//!
//! // Create from minor units (the only constructor from raw amounts)
//! let price = Money::from_cents(5000);
//!
//! // Arithmetic operations
//! let line = price * 2;                        // quantity
//! let total = line + Money::from_cents(500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate values (e.g. tendered − total) may be
///   negative; committed totals are clamped before they reach a `Sale`
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit remainder (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps a negative value to zero.
    ///
    /// Used where the pricing rules forbid negatives: the taxable amount
    /// when discounts exceed the subtotal, and change due on short tenders.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-250).floor_zero().cents(), 0);
    /// assert_eq!(Money::from_cents(250).floor_zero().cents(), 250);
    /// ```
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Calculates tax on this amount at the given rate.
    ///
    /// ## Implementation
    /// Integer math with half-up rounding: `(amount * bps + 5000) / 10000`.
    /// i128 intermediates prevent overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::Money;
    /// use atelier_core::types::TaxRate;
    ///
    /// let amount = Money::from_cents(1000);
    /// let rate = TaxRate::from_bps(825); // 8.25%
    ///
    /// // 1000 × 8.25% = 82.5 → rounds to 83
    /// assert_eq!(amount.calculate_tax(rate).cents(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2500);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 7500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and receipts. Currency symbol formatting lives
/// with the store settings, not here.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_floor_zero() {
        assert_eq!(Money::from_cents(-1).floor_zero(), Money::zero());
        assert_eq!(Money::zero().floor_zero(), Money::zero());
        assert_eq!(Money::from_cents(42).floor_zero().cents(), 42);
    }

    #[test]
    fn test_tax_calculation_basic() {
        // 10% of 1000 = 100
        let amount = Money::from_cents(1000);
        let tax = amount.calculate_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.cents(), 100);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // 8.25% of 1000 = 82.5 → rounds half-up to 83
        let amount = Money::from_cents(1000);
        let tax = amount.calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.cents(), 83);
    }

    #[test]
    fn test_tax_on_zero_rate_is_zero() {
        let amount = Money::from_cents(123456);
        assert_eq!(amount.calculate_tax(TaxRate::zero()), Money::zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    }

    /// Documents the intentional precision loss of integer division.
    #[test]
    fn test_division_precision_loss_documented() {
        let ten = Money::from_cents(1000);
        let one_third = Money::from_cents(1000 / 3); // 333
        let reconstructed = one_third * 3; // 999

        assert_eq!(reconstructed.cents(), 999);
        assert_eq!((ten - reconstructed).cents(), 1);
    }
}
