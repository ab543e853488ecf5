//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A quotation total must equal the sum of its line subtotals EXACTLY.   │
//! │  S/ 9000.00 + S/ 1500.00 has to be S/ 10500.00, byte for byte, or      │
//! │  the recalculate path starts producing drifting totals.                │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centimos                                         │
//! │    All decimal(·,2) columns are stored and summed as i64 centimos.     │
//! │    Addition of integers is exact; there is nothing to round.           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mequip_core::money::Money;
//!
//! // Create from centimos (preferred)
//! let price = Money::from_cents(450_000); // S/ 4500.00
//!
//! // Arithmetic operations
//! let line = price.multiply_quantity(2);          // S/ 9000.00
//! let total = line + Money::from_cents(150_000);  // S/ 10500.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(4500.00); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (centimos).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for corrections and credits
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Currency-agnostic**: The quotation's `moneda` field says whether the
///   value is soles or dolares; the arithmetic is identical either way
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centimos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use mequip_core::money::Money;
    ///
    /// let price = Money::from_cents(150_000); // Represents 1500.00
    /// assert_eq!(price.cents(), 150_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (e.g. soles and centimos).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -5.50, not -4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in centimos (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (soles or dolares).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99, absolute value).
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// This is the line-item subtotal rule: `cantidad × precio_unitario`.
    /// Both factors are bounded upstream (`MAX_UNIT_PRICE_CENTS`,
    /// `MAX_ITEM_QUANTITY`), so the product fits in i64.
    ///
    /// ## Example
    /// ```rust
    /// use mequip_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(450_000); // 4500.00
    /// let subtotal = unit_price.multiply_quantity(2);
    /// assert_eq!(subtotal.cents(), 900_000); // 9000.00
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
/// This is for debugging and logs. Use frontend formatting for actual UI
/// display to handle the currency symbol and localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
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

/// Summing an iterator of Money values.
///
/// This is what the totals recomputation uses:
/// `items.iter().map(|li| li.subtotal).sum()`
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
