//! Money type for representing currency amounts
//!
//! Wraps `rust_decimal::Decimal` so that splitting an amount across members
//! (e.g. 10 / 3) keeps 28 significant digits instead of accumulating
//! floating-point or whole-cent rounding error.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount in currency units (e.g. 12.50)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Amounts whose magnitude is below this are considered zero (one cent)
    pub const EPSILON: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// Create a Money amount from a decimal value
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use travelsplit::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the underlying decimal
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is exactly zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is within one cent of zero
    pub fn is_settled(&self) -> bool {
        self.abs() < Self::EPSILON
    }

    /// Check if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Divide into `parts` equal shares, keeping full decimal precision
    ///
    /// Returns zero when `parts` is zero.
    pub fn share(&self, parts: usize) -> Self {
        if parts == 0 {
            return Self::zero();
        }
        Self(self.0 / Decimal::from(parts as u64))
    }

    /// Round to whole cents (banker's rounding), for display and export
    pub fn round_to_cents(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Parse a money amount from user input
    ///
    /// Accepts "10.50", "10,50", "€10.50", "$10", "-3.2". Surrounding whitespace
    /// is ignored.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };

        let rest = rest
            .trim_start_matches(['$', '€', '£'])
            .trim_end_matches(['$', '€', '£'])
            .trim()
            .replace(',', ".");

        if rest.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let value = Decimal::from_str(&rest)
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol, rounded to cents
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let rounded = self.round_to_cents();
        if rounded.is_negative() {
            format!("-{}{:.2}", symbol, rounded.0.abs())
        } else {
            format!("{}{:.2}", symbol, rounded.0)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round_to_cents().0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyParseError {
    #[error("Invalid money format: {0}")]
    InvalidFormat(String),
}
