//! # Money Module
//!
//! Provides the `Money` and `Quantity` types used by every pricing step.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A quotation total must equal the sum of its printed lines, to the     │
//! │  paisa, every time.                                                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paisa + Integer Milli-units                      │
//! │    Rs 500.00 ──► Money(50_000)                                          │
//! │    1.44 sqm  ──► Quantity(1_440)                                        │
//! │    Line amount = Quantity × Money, rounded once, in i128               │
//! │                                                                         │
//! │  Arithmetic saturates at the i64 range instead of wrapping or          │
//! │  panicking, so absurd cart input yields a clamped total, never a crash │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tiles_core::money::{Money, Quantity};
//!
//! let rate = Money::from_paisa(50_000);     // Rs 500.00
//! let qty = Quantity::from_units(50.0);      // 50 sqm
//! let amount = qty.times_price(rate);
//! assert_eq!(amount.paisa(), 2_500_000);     // Rs 25,000.00
//! assert_eq!(amount.format_grouped(), "25,000.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::validation::MAX_NUMERIC_INPUT;

/// Milli-units per whole unit of [`Quantity`].
const MILLI: i128 = 1_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paisa (1/100 of a rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative inputs propagate instead of being rejected
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Saturating operators**: `+`, `-`, negation and `Sum` clamp to the
///   i64 range
/// - **Decimal input only at the edge**: the app sends rupees as decimals;
///   [`Money::from_decimal`] rounds them exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paisa (the smallest currency unit).
    #[inline]
    pub const fn from_paisa(paisa: i64) -> Self {
        Money(paisa)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees.saturating_mul(100))
    }

    /// Converts a decimal rupee amount coming from the app.
    ///
    /// Rounds half away from zero to the nearest paisa. Non-finite input
    /// becomes zero and magnitudes above [`MAX_NUMERIC_INPUT`] rupees are
    /// clamped to it; callers are expected to have coerced and reported
    /// such input already.
    ///
    /// ```rust
    /// use tiles_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.345).paisa(), 1235);
    /// assert_eq!(Money::from_decimal(-0.5).paisa(), -50);
    /// assert_eq!(Money::from_decimal(1e18), Money::from_decimal(1e12));
    /// ```
    pub fn from_decimal(rupees: f64) -> Self {
        if !rupees.is_finite() {
            return Money::zero();
        }
        let rupees = rupees.clamp(-MAX_NUMERIC_INPUT, MAX_NUMERIC_INPUT);
        Money((rupees * 100.0).round() as i64)
    }

    /// Returns the value in paisa.
    #[inline]
    pub const fn paisa(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paisa portion (always 0-99).
    #[inline]
    pub const fn paisa_part(&self) -> i64 {
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Expresses `self` as a percentage of `base`.
    ///
    /// Returns 0 when `base` is not positive. The result is not clamped;
    /// see [`crate::pricing`] for the clamped discount percentage.
    pub fn percent_of(&self, base: Money) -> f64 {
        if base.0 <= 0 {
            return 0.0;
        }
        self.0 as f64 / base.0 as f64 * 100.0
    }

    /// Plain two-decimal rendering without grouping, e.g. `"25000.00"`.
    ///
    /// This is the format of the `total`, `so_advance` and `discount1`
    /// submission fields.
    pub fn to_fixed_2(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.rupees().abs(), self.paisa_part())
    }

    /// Two-decimal rendering with thousands separators, e.g. `"1,250,000.00"`.
    ///
    /// Used for every amount printed on the quotation.
    pub fn format_grouped(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}.{:02}",
            sign,
            group_thousands(self.rupees().unsigned_abs()),
            self.paisa_part()
        )
    }
}

/// Inserts a comma every three digits from the right.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Quantity Type
// =============================================================================

/// A packing-normalized quantity in thousandths of a unit.
///
/// Tiles are sold by area (sqm) while the shop floor counts boxes and loose
/// pieces; the packing factor converts both into this single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from milli-units.
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a quantity from a decimal unit count (rounded to 0.001).
    ///
    /// Saturates at the i64 range; non-finite input is zero.
    pub fn from_units(units: f64) -> Self {
        if !units.is_finite() {
            return Quantity(0);
        }
        Quantity((units * 1000.0).round() as i64)
    }

    /// Returns the value in milli-units.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal unit count.
    #[inline]
    pub fn units(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Zero quantity.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    /// Multiplies a per-unit price by this quantity.
    ///
    /// Computed in i128 and rounded half away from zero once, so a line
    /// amount never drifts by more than half a paisa. A product beyond the
    /// i64 range saturates.
    pub fn times_price(&self, per_unit: Money) -> Money {
        let product = self.0 as i128 * per_unit.paisa() as i128;
        let rounded = if product >= 0 {
            (product + MILLI / 2) / MILLI
        } else {
            (product - MILLI / 2) / MILLI
        };
        let saturated = if rounded < 0 { i64::MIN } else { i64::MAX };
        Money::from_paisa(i64::try_from(rounded).unwrap_or(saturated))
    }
}

/// Shows whole quantities without decimals and trims trailing zeros
/// otherwise: `50`, `4.32`, `0.5`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / 1000;
        let frac = abs % 1000;
        if frac == 0 {
            return write!(f, "{}{}", sign, whole);
        }
        let frac = format!("{:03}", frac);
        write!(f, "{}{}.{}", sign, whole, frac.trim_end_matches('0'))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money the way the storefront does: `Rs 1,250.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rs {}", self.format_grouped())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Summing line amounts (used by the order aggregator).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
