//! Value amounts in the ledger's smallest unit.

use crate::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroU64;

/// A strictly positive amount in the smallest ledger unit (MIST).
///
/// Zero, negative, and out-of-range values are rejected, never clamped.
/// On the wire the amount is a decimal string, as the node expects for
/// 64-bit integers.
///
/// ```rust
/// use vaultrpc_core::types::Amount;
///
/// let amount = Amount::new(1_000_000_000).unwrap();
/// assert_eq!(amount.get(), 1_000_000_000);
/// assert!(Amount::try_from(-1_i64).is_err());
/// assert!(Amount::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount(NonZeroU64);

impl Amount {
    /// Creates an amount, rejecting zero.
    pub fn new(value: u64) -> Result<Self, ValidationError> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidAmount("amount must be positive, got 0".into()))
    }

    /// Returns the raw value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<i128> for Amount {
    type Error = ValidationError;

    fn try_from(value: i128) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(ValidationError::InvalidAmount(format!(
                "amount must be positive, got {value}"
            )));
        }
        let value = u64::try_from(value).map_err(|_| {
            ValidationError::InvalidAmount(format!("amount {value} exceeds {}", u64::MAX))
        })?;
        Self::new(value)
    }
}

impl TryFrom<i64> for Amount {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_from(i128::from(value))
    }
}

impl TryFrom<u64> for Amount {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.get()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        let value = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n,
            Raw::Text(s) => s.trim().parse::<u64>().map_err(serde::de::Error::custom)?,
        };
        Amount::new(value).map_err(serde::de::Error::custom)
    }
}
