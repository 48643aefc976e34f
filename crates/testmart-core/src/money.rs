//! # Money Module
//!
//! Provides the `Money` type for handling monetary values in cents.
//!
//! ## Integer Cents
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every price, discount, shipping cost and total is a whole number of    │
//! │  cents. Percentage discounts compute in floating point, but the result  │
//! │  must land back on a whole cent or validation rejects it.               │
//! │                                                                         │
//! │    2500 cents × 90 / 100 = 2250.0  → accepted                          │
//! │     333 cents × 90 / 100 =  299.7  → rejected (Invalid sale_price)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use testmart_core::money::Money;
//!
//! let price = Money::from_cents(123400);
//! assert_eq!(price.to_string(), "$1,234.00");
//!
//! let total = price + Money::from_cents(500);
//! assert_eq!(total.cents(), 123900);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Inputs are validated as non-negative, but intermediate
///   arithmetic (total minus cart discounts) stays signed
/// - **Single field tuple struct**: Serializes as a bare number in JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Returns the value as a float, for percentage math only.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// Multiplies money by a quantity, returning `None` on overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Takes a fraction of this amount and rounds down to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use testmart_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(19950);
    /// assert_eq!(subtotal.fraction_floor(0.1).cents(), 1995);
    /// assert_eq!(Money::from_cents(10001).fraction_floor(0.1).cents(), 1000);
    /// ```
    pub fn fraction_floor(&self, fraction: f64) -> Money {
        Money((self.0 as f64 * fraction).floor() as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Receipt formatting: `$` + dollars grouped by thousands + two-digit cents.
///
/// ```rust
/// use testmart_core::money::Money;
///
/// assert_eq!(Money::from_cents(5).to_string(), "$0.05");
/// assert_eq!(Money::from_cents(1234567800).to_string(), "$12,345,678.00");
/// ```
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.dollars().unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        write!(f, "{}${}.{:02}", sign, grouped, self.cents_part())
    }
}

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

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
