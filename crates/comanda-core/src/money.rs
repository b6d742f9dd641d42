//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A tab with 40 rounds of 0.10 coffee refills:                           │
//! │    sum of 0.1 forty times = 4.000000000000001  ❌ drift                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    10 cents × 40 = 400 cents, exactly                                  │
//! │    Rounding happens once, when the service fee is taken                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use comanda_core::money::Money;
//!
//! let price = Money::from_cents(2000);                     // 20.00
//! let line = price.checked_mul_quantity(2).unwrap();       // 40.00
//! let parsed: Money = "15.00".parse().unwrap();            // operator input
//! assert_eq!(line.checked_add(parsed).unwrap().cents(), 5500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::ServiceFeeRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos, cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences between totals can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No float constructor**: amounts come from cents or decimal strings
///
/// ## Where Money is Used
/// ```text
/// MenuItem.price_cents ──► TabLineItem.unit_price_cents (frozen at order)
///                                   │
///                                   ▼
///                         quantity × unit price = line total
///                                   │
///                                   ▼
///          Σ line totals = subtotal ──► service fee ──► total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::Money;
    ///
    /// let price = Money::from_cents(1550); // 15.50
    /// assert_eq!(price.cents(), 1550);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
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

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// The only way to multiply `Money`: line totals come from stored rows
    /// and must never wrap.
    #[inline]
    pub fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Calculates the service fee on this amount, rounded half-up to the cent.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(amount × bps + 5000) / 10000`.
    /// The +5000 is the half-cent that makes 0.5 round up.
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::Money;
    /// use comanda_core::types::ServiceFeeRate;
    ///
    /// let subtotal = Money::from_cents(5500);      // 55.00
    /// let rate = ServiceFeeRate::from_bps(1000);   // 10%
    /// assert_eq!(subtotal.service_fee(rate).cents(), 550);
    ///
    /// // 0.05 at 10% = 0.005 → 0.01
    /// assert_eq!(Money::from_cents(5).service_fee(rate).cents(), 1);
    /// ```
    pub fn service_fee(&self, rate: ServiceFeeRate) -> Money {
        // i128 so that large subtotals cannot overflow the intermediate product
        let fee = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(fee as i64)
    }

    /// Renders the amount with a currency symbol, e.g. `R$ 60.50`.
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if symbol.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", symbol, self)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`60.50`, `-5.50`). Currency symbols are a
/// presentation concern, see [`Money::format_with_symbol`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

/// Parses operator input such as `20`, `20.5`, `20.00` or `20,00`.
///
/// At most two decimal places are accepted; anything finer than a cent is
/// rejected rather than silently rounded.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (major_str, minor_str) = match digits.find(|c| c == '.' || c == ',') {
            Some(idx) => (&digits[..idx], &digits[idx + 1..]),
            None => (digits, ""),
        };

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected digits before the decimal separator"));
        }
        if minor_str.len() > 2 || !minor_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("at most two decimal digits are allowed"));
        }

        let major: i64 = major_str
            .parse()
            .map_err(|_| invalid("amount is too large"))?;
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| invalid("bad cents"))? * 10,
            _ => minor_str.parse().map_err(|_| invalid("bad cents"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
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

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(6050);
        assert_eq!(money.cents(), 6050);
        assert_eq!(money.major(), 60);
        assert_eq!(money.minor_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(6050).to_string(), "60.50");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(6050).format_with_symbol("R$"), "R$ 60.50");
        assert_eq!(Money::from_cents(6050).format_with_symbol(""), "60.50");
    }

    #[test]
    fn test_parse_operator_input() {
        assert_eq!("20".parse::<Money>().unwrap().cents(), 2000);
        assert_eq!("20.5".parse::<Money>().unwrap().cents(), 2050);
        assert_eq!("20.05".parse::<Money>().unwrap().cents(), 2005);
        assert_eq!("15,00".parse::<Money>().unwrap().cents(), 1500);
        assert_eq!(" 0.99 ".parse::<Money>().unwrap().cents(), 99);
        assert_eq!("-3.10".parse::<Money>().unwrap().cents(), -310);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let mut acc = Money::zero();
        acc += a;
        acc += b;
        assert_eq!(acc.cents(), 1500);
    }

    #[test]
    fn test_service_fee_default_rate() {
        let fee = Money::from_cents(5500).service_fee(ServiceFeeRate::default());
        assert_eq!(fee.cents(), 550);
    }

    #[test]
    fn test_service_fee_rounds_half_up() {
        let rate = ServiceFeeRate::from_bps(1000);
        // 12.35 × 10% = 1.235 → 1.24
        assert_eq!(Money::from_cents(1235).service_fee(rate).cents(), 124);
        // 12.34 × 10% = 1.234 → 1.23
        assert_eq!(Money::from_cents(1234).service_fee(rate).cents(), 123);
    }

    #[test]
    fn test_service_fee_zero_rate_and_zero_amount() {
        assert!(Money::from_cents(5500)
            .service_fee(ServiceFeeRate::from_bps(0))
            .is_zero());
        assert!(Money::zero()
            .service_fee(ServiceFeeRate::default())
            .is_zero());
    }

    #[test]
    fn test_checked_operations() {
        assert_eq!(
            Money::from_cents(2000).checked_mul_quantity(2),
            Some(Money::from_cents(4000))
        );
        assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    /// Forty 0.10 refills must sum to exactly 4.00.
    #[test]
    fn test_no_drift_over_many_lines() {
        let refill = Money::from_cents(10);
        let total = (0..40).fold(Money::zero(), |acc, _| acc + refill);
        assert_eq!(total.cents(), 400);
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
}
