//! Transaction digests.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref DIGEST_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9]{40,}$").expect("Invalid digest regex pattern");
}

/// Identifier of an executed transaction, as returned by the node.
///
/// ```rust
/// use vaultrpc_core::types::TransactionDigest;
///
/// let digest: TransactionDigest = "9mZmFjJkYP3sgnPK2kZ6KbFpq1Mq5pQtsCbwgM1Jw2d8a9A"
///     .parse()
///     .unwrap();
/// assert!(digest.as_str().len() >= 40);
/// assert!("short".parse::<TransactionDigest>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionDigest(String);

impl TransactionDigest {
    /// Parses a digest, rejecting anything but 40 or more ASCII alphanumerics.
    pub fn parse(input: &str) -> Result<Self> {
        if DIGEST_PATTERN.is_match(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(Error::parse_value(
                "digest",
                format!("expected at least 40 alphanumeric characters, got {input:?}"),
            ))
        }
    }

    /// Returns the digest string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TransactionDigest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TransactionDigest {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TransactionDigest> for String {
    fn from(digest: TransactionDigest) -> Self {
        digest.0
    }
}

impl fmt::Display for TransactionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
