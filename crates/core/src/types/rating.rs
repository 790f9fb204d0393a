//! Product rating on a zero-to-five star scale.

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Highest rating a product can carry.
const MAX_STARS: u8 = 5;

/// Errors that can occur when parsing a [`Rating`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingError {
    #[error("rating must be a number")]
    NotANumber,
    #[error("rating must be between 0 and 5")]
    OutOfRange,
}

/// A rating in `0.0..=5.0`, kept to one decimal place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rating(Decimal);

impl Rating {
    /// Create a rating.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` outside `0..=5`.
    pub fn new(value: Decimal) -> Result<Self, RatingError> {
        if value < Decimal::ZERO || value > Decimal::from(MAX_STARS) {
            return Err(RatingError::OutOfRange);
        }
        Ok(Self(
            value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        ))
    }

    /// Parse a rating from form input; blank input is a zero rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a number or is out of range.
    pub fn parse(s: &str) -> Result<Self, RatingError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let value = Decimal::from_str(trimmed).map_err(|_| RatingError::NotANumber)?;
        Self::new(value)
    }

    /// Number of filled stars (the rating rounded down).
    #[must_use]
    pub fn stars(&self) -> u8 {
        self.0.floor().to_u8().unwrap_or(0).min(MAX_STARS)
    }

    /// Star glyphs for display, e.g. `★★★★☆` for 4.5.
    #[must_use]
    pub fn glyphs(&self) -> String {
        let filled = usize::from(self.stars());
        let empty = usize::from(MAX_STARS) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl TryFrom<Decimal> for Rating {
    type Error = RatingError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for Decimal {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}
