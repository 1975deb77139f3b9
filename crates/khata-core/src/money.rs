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
//! │  A customer ledger is a long fold: hundreds of debits and credits per   │
//! │  customer. Binary-float drift across that fold silently corrupts the    │
//! │  running balance — the one number the shop owner trusts.                │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units (paise/cents)                        │
//! │    Every amount is an i64 count of the smallest currency unit.          │
//! │    Rounding happens exactly once per percentage operation, half-up.     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use khata_core::money::Money;
//!
//! // Create from minor units (the only constructor)
//! let price = Money::from_cents(120_000); // 1200.00
//!
//! // Arithmetic operations
//! let gross = price.multiply_quantity(2);       // 2400.00
//! let discount = gross.percent_of(1000);        // 10% => 240.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit, exactly 2 fractional
/// digits when displayed.
///
/// ## Design Decisions
/// - **i64 (signed)**: the running balance is signed — positive means the
///   customer owes the store (Dr), negative means the store owes the
///   customer (Cr). The sign is never discarded inside the engine.
/// - **Single field tuple struct**: zero-cost abstraction over i64.
/// - **Currency-agnostic**: the engine tracks one currency; symbols and
///   localization belong to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (cents/paise).
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
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

    /// Returns the major-unit portion (e.g. whole rupees/dollars).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit portion, always 0-99.
    #[inline]
    pub const fn fraction(&self) -> i64 {
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

    /// Checks if the value is strictly negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    ///
    /// The statement renderer shows `abs(balance)` next to a Dr/Cr label;
    /// this is the helper it uses. The signed value stays authoritative.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(10_000); // 100.00
    /// let gross = unit_price.multiply_quantity(2);
    /// assert_eq!(gross.cents(), 20_000); // 200.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Computes a percentage of this amount, expressed in basis points
    /// (1 bps = 0.01%, so 1000 bps = 10%).
    ///
    /// ## Rounding
    /// Half-up on the final cent, via integer math:
    /// `(amount × bps + 5000) / 10000`. Intermediates widen to i128 so
    /// large amounts cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
    ///
    /// let gross = Money::from_cents(20_000);    // 200.00
    /// let discount = gross.percent_of(1000);    // 10%
    /// assert_eq!(discount.cents(), 2_000);      // 20.00
    /// ```
    pub fn percent_of(&self, bps: u32) -> Money {
        let part = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(part as i64)
    }

    /// Subtracts `other`, flooring the result at zero.
    ///
    /// Used for the final order total: an order-level amount discount may
    /// nominally exceed the items subtotal; the charged total never goes
    /// below zero, while the raw discount is still reported for audit.
    #[inline]
    pub fn sub_floor_zero(&self, other: Money) -> Money {
        if other.0 >= self.0 {
            Money::zero()
        } else {
            Money(self.0 - other.0)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows the amount with exactly two decimals and no
/// currency symbol, e.g. `1200.00` or `-550.50`.
///
/// ## Note
/// This is the stable decimal formatting consumed by the statement/invoice
/// renderer. Currency symbols and localization live in the frontend.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.fraction())
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

/// Multiplication by integer (for quantity calculations).
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
