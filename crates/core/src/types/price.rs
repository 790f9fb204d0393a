//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in dollars with two decimal places. All arithmetic goes
//! through [`rust_decimal::Decimal`] so cart totals never pick up float drift.

use core::fmt;
use core::iter::Sum;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The input is above [`MAX_PRICE_CENTS`].
    #[error("price cannot exceed $1,000,000,000.00")]
    TooLarge,
}

/// Largest accepted price, in cents.
pub const MAX_PRICE_CENTS: u64 = 100_000_000_000;

/// A non-negative USD price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u64) -> Self {
        Self(Decimal::from(cents) / Decimal::ONE_HUNDRED)
    }

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero and
    /// `PriceError::TooLarge` above one billion.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount > Self::from_cents(MAX_PRICE_CENTS).0 {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        ))
    }

    /// Parse a price from user input such as `"129.99"` or `"$24.99"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a number or is negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let amount = Decimal::from_str(digits).map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// Price of `quantity` units, saturating at the largest representable
    /// amount.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }

    /// Sum of two prices, saturating like [`Price::times`].
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.checked_add(other.0).unwrap_or(Decimal::MAX))
    }

    /// Format for display with the amount fixed to two decimals, e.g. `$19.99`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }

    /// Format for form inputs (no currency symbol), e.g. `19.99`.
    #[must_use]
    pub fn input_value(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_dollar_prefix() {
        assert_eq!(Price::parse("$24.99").unwrap(), Price::from_cents(2499));
        assert_eq!(Price::parse(" 129.99 ").unwrap(), Price::from_cents(12999));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Price::parse("abc"), Err(PriceError::NotANumber));
        assert_eq!(Price::parse(""), Err(PriceError::NotANumber));
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
    }

    #[test]
    fn test_parse_rounds_to_cents() {
        assert_eq!(Price::parse("1.005").unwrap(), Price::from_cents(101));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(12999).display(), "$129.99");
        assert_eq!(Price::from_cents(500).display(), "$5.00");
        assert_eq!(Price::ZERO.display(), "$0.00");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_cents(2499).times(2), Price::from_cents(3999)]
            .iter()
            .sum();
        assert_eq!(total, Price::from_cents(8997));
    }

    #[test]
    fn test_parse_rejects_amounts_above_limit() {
        assert_eq!(
            Price::parse("79228162514264337593543950335"),
            Err(PriceError::TooLarge)
        );
        assert_eq!(Price::parse("1000000000.01"), Err(PriceError::TooLarge));
        assert_eq!(
            Price::parse("1000000000").unwrap(),
            Price::from_cents(MAX_PRICE_CENTS)
        );
    }

    #[test]
    fn test_times_and_sum_saturate_instead_of_overflowing() {
        let huge = Price(Decimal::MAX);
        assert_eq!(huge.times(2), huge);

        let total: Price = [huge, Price::from_cents(100)].iter().sum();
        assert_eq!(total, huge);
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("\"-3.00\"").is_err());
        assert_eq!(
            serde_json::from_str::<Price>("\"3.50\"").unwrap(),
            Price::from_cents(350)
        );
    }
}
