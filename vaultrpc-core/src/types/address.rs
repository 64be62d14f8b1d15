//! Ledger address type.

use crate::error::ValidationError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of hex characters after the `0x` prefix.
pub const ADDRESS_HEX_LEN: usize = 40;

lazy_static! {
    static ref ADDRESS_PATTERN: Regex =
        Regex::new(&format!(r"^0x[0-9a-fA-F]{{{ADDRESS_HEX_LEN}}}$"))
            .expect("Invalid address regex pattern");
}

/// A `0x`-prefixed, fixed-width hexadecimal address.
///
/// Accounts, packages and objects share this format. Construction trims
/// surrounding whitespace and lower-cases the hex body, so two spellings of
/// the same address compare equal.
///
/// ```rust
/// use vaultrpc_core::types::Address;
///
/// let addr: Address = " 0x1234567890ABCDEF1234567890abcdef12345678 ".parse().unwrap();
/// assert_eq!(addr.as_str(), "0x1234567890abcdef1234567890abcdef12345678");
/// assert!(Address::parse("0x123").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parses and normalizes an address.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if !ADDRESS_PATTERN.is_match(trimmed) {
            return Err(ValidationError::InvalidAddress(input.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Returns `true` if `input` matches the address pattern exactly, without trimming.
    pub fn is_valid(input: &str) -> bool {
        ADDRESS_PATTERN.is_match(input)
    }

    /// Returns the normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the address, returning the normalized string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
