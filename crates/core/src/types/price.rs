//! Type-safe price representation using decimal arithmetic.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
    /// The text is not a decimal number.
    #[error("price is not a valid decimal: {0}")]
    Malformed(String),
}

/// A strictly positive price in the store's currency.
///
/// Serializes as a decimal string (e.g. `"19.99"`) so no precision is lost
/// on the way to JavaScript clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotPositive` if the amount is zero or negative.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount))
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, or `None` if it does not fit in a `Decimal`.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Option<Decimal> {
        self.0.checked_mul(Decimal::from(quantity))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s).map_err(|e| PriceError::Malformed(e.to_string()))?;
        Self::new(amount)
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_price() {
        let price = Price::new(Decimal::new(1999, 2)).unwrap();
        assert_eq!(price.to_string(), "19.99");
    }

    #[test]
    fn test_zero_and_negative_rejected() {
        assert_eq!(Price::new(Decimal::ZERO), Err(PriceError::NotPositive));
        assert_eq!(Price::new(Decimal::new(-1, 0)), Err(PriceError::NotPositive));
    }

    #[test]
    fn test_from_str() {
        let price: Price = "42.50".parse().unwrap();
        assert_eq!(price.amount(), Decimal::new(4250, 2));
        assert!(matches!("abc".parse::<Price>(), Err(PriceError::Malformed(_))));
    }

    #[test]
    fn test_times() {
        let price: Price = "2.25".parse().unwrap();
        assert_eq!(price.times(4), Some(Decimal::new(900, 2)));
    }

    #[test]
    fn test_times_overflow() {
        let price = Price::new(Decimal::MAX).unwrap();
        assert_eq!(price.times(1), Some(Decimal::MAX));
        assert_eq!(price.times(2), None);
    }

    #[test]
    fn test_serde_rejects_non_positive() {
        assert!(serde_json::from_str::<Price>("\"0\"").is_err());
        let price: Price = serde_json::from_str("\"10.00\"").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"10.00\"");
    }
}
