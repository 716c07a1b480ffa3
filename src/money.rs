//! Exact decimal money with a cent-scale settlement tolerance.
//!
//! Uses `rust_decimal` internally. Values keep their full precision through
//! arithmetic (a fair share of `100 / 3` is not rounded to cents), and are
//! only rounded to 2 decimal places when displayed or serialized.
//!
//! The operators saturate at [`Money::MAX`] / [`Money::MIN`] instead of
//! panicking on overflow; use [`Money::checked_add`] to detect it.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A currency-agnostic monetary amount.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use trip_settlement::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Decimal places used for display.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Band around zero inside which a balance counts as settled (one cent).
    pub const TOLERANCE: Self = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// Largest representable amount.
    pub const MAX: Self = Money(Decimal::MAX);

    /// Smallest representable amount.
    pub const MIN: Self = Money(Decimal::MIN);

    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Whole currency units.
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Minor units (cents).
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, Self::SCALE))
    }

    /// Parses an amount, treating empty or non-numeric text as zero.
    pub fn parse_lenient(s: &str) -> Self {
        Money::from_str(s).unwrap_or(Money::ZERO)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Floating-point view of the amount for external consumers.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// `None` when the sum does not fit.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// `None` when the difference does not fit.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `true` when `|self| <= 0.01`.
    pub fn is_settled(&self) -> bool {
        self.abs() <= Self::TOLERANCE
    }

    /// Rounded to cents, midpoint away from zero.
    pub fn round_cents(self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Divides evenly across `count` parts, flooring the divisor at 1.
    pub fn split(self, count: usize) -> Self {
        let divisor = count.max(1) as u64;
        Money(self.0 / Decimal::from(divisor))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_cents().0;
        // avoid "-0.00" for sub-cent negatives
        let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
        write!(f, "{:.2}", rounded)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Div<u32> for Money {
    type Output = Self;

    fn div(self, rhs: u32) -> Self::Output {
        Money(self.0 / Decimal::from(rhs.max(1)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(money("1").to_string(), "1.00");
        assert_eq!(money("1.5").to_string(), "1.50");
        assert_eq!(money("  2.345  ").to_string(), "2.35");
        assert_eq!(money("-2.345").to_string(), "-2.35");
        assert_eq!(Money::from_units(100).split(3).to_string(), "33.33");
    }

    #[test]
    fn test_parse_lenient_defaults_to_zero() {
        assert_eq!(Money::parse_lenient(""), Money::ZERO);
        assert_eq!(Money::parse_lenient("abc"), Money::ZERO);
        assert_eq!(Money::parse_lenient(" 12.5 "), money("12.5"));
    }

    #[test]
    fn test_tolerance_band() {
        assert!(Money::ZERO.is_settled());
        assert!(money("0.01").is_settled());
        assert!(money("-0.01").is_settled());
        assert!(!money("0.011").is_settled());
        assert!(!money("-0.02").is_settled());
        assert_eq!(Money::TOLERANCE, Money::from_cents(1));
    }

    #[test]
    fn test_split_floors_divisor_at_one() {
        assert_eq!(Money::from_units(90).split(0), Money::from_units(90));
        assert_eq!(Money::from_units(90).split(1), Money::from_units(90));
        assert_eq!(Money::from_units(90).split(3), Money::from_units(30));
    }

    #[test]
    fn test_split_keeps_precision() {
        let share = Money::from_units(100).split(3);
        let recombined = share + share + share;
        assert!((recombined - Money::from_units(100)).abs() < money("0.000001"));
    }

    #[test]
    fn test_sum_and_negation() {
        let values = [money("1.25"), money("2.75"), -money("1")];
        let total: Money = values.iter().sum();
        assert_eq!(total, money("3"));
    }

    #[test]
    fn test_overflow_saturates() {
        let big = money("50000000000000000000000000000");
        assert_eq!(big + big, Money::MAX);
        assert_eq!(-big - big, Money::MIN);

        let mut acc = big;
        acc += big;
        assert_eq!(acc, Money::MAX);
        acc -= -big;
        assert_eq!(acc, Money::MAX);

        assert!(big.checked_add(big).is_none());
        assert!((-big).checked_sub(big).is_none());
        assert_eq!(big.checked_add(Money::ZERO), Some(big));
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(money("50.25").to_f64(), 50.25);
    }
}
