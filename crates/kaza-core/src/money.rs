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
//! │    299.00 * 0.8 = 239.20000000000002  ❌ WRONG!                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    29900 * 8000 / 10000 = 23920 centavos (R$ 239,20)                    │
//! │    Every rounding step is explicit and half-up                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kaza_core::money::Money;
//!
//! let price = Money::from_cents(29900); // R$ 299,00
//! let doubled = price * 2u32;           // R$ 598,00
//! assert_eq!(doubled.cents(), 59800);
//! assert_eq!(price.to_string(), "R$ 299,00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos for BRL).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate results (subtotal − discount) may dip
///   below zero before the total is floored
/// - **Single field tuple struct**: zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Item.price ──► CartLine.unit_price ──► Cart.subtotal                   │
/// │                                              │                          │
/// │                      Coupon.discount_for ◄───┤                          │
/// │                      PricingPolicy.shipping ◄┘                          │
/// │                                              │                          │
/// │                                   CartTotals.total ──► loyalty bonus    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use kaza_core::money::Money;
    ///
    /// let price = Money::from_cents(18900); // R$ 189,00
    /// assert_eq!(price.cents(), 18900);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from reais and centavos.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -R$ 5,50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-reais portion (truncated toward zero).
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns zero for negative values, the value itself otherwise.
    ///
    /// Used for the final cart total, which never goes below zero.
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use kaza_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(8900); // R$ 89,00
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 26700);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }

    /// Returns `percent`% of this amount, rounded half-up to the centavo.
    ///
    /// ## Example
    /// ```rust
    /// use kaza_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(29900);
    /// // 15% of R$ 299,00 = R$ 44,85
    /// assert_eq!(subtotal.percentage(15).cents(), 4485);
    /// ```
    pub fn percentage(&self, percent: u32) -> Money {
        self.basis_points(percent * 100)
    }

    /// Returns `bps`/10000 of this amount, rounded half-up to the centavo.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`, widened to i128 so large
    /// carts cannot overflow.
    pub fn basis_points(&self, bps: u32) -> Money {
        let value = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(value as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Arguments
    /// * `discount_bps` - Discount in basis points (2000 = 20%)
    ///
    /// ## Example
    /// ```rust
    /// use kaza_core::money::Money;
    ///
    /// let price = Money::from_cents(29900); // R$ 299,00
    /// let reseller = price.apply_percentage_discount(2000); // 20% off
    /// assert_eq!(reseller.cents(), 23920); // R$ 239,20
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        *self - self.basis_points(discount_bps)
    }

    /// Number of whole `unit`s contained in this amount, for point accrual.
    ///
    /// Negative amounts contain no units.
    ///
    /// ## Example
    /// ```rust
    /// use kaza_core::money::Money;
    ///
    /// // R$ 299,00 holds 29 whole R$ 10,00 units
    /// assert_eq!(Money::from_cents(29900).whole_units_of(Money::from_cents(1000)), 29);
    /// ```
    pub fn whole_units_of(&self, unit: Money) -> u64 {
        if self.0 <= 0 || unit.0 <= 0 {
            return 0;
        }
        (self.0 / unit.0) as u64
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Brazilian real formatting: `R$ 1.234,56`.
///
/// ## Note
/// Intended for logs, notifications and tests. The SPA formats with
/// `Intl.NumberFormat` for display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.reais().abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}R$ {},{:02}", sign, grouped, self.cents_part())
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

/// Multiplication by a line quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
