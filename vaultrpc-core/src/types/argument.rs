//! Primitive move-call arguments.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// A primitive argument value as supplied by the caller.
///
/// Integers are kept as `i128` so that negative or oversized inputs survive
/// until validation can reject them with a precise error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Argument {
    /// A string (object ids, symbols).
    String(String),
    /// An integer (amounts, counters).
    Integer(i128),
    /// A boolean flag.
    Bool(bool),
}

impl Argument {
    /// Renders the argument in the node's JSON convention.
    ///
    /// Integers become decimal strings, since 64-bit values do not fit a
    /// JSON number losslessly.
    pub fn to_json(&self) -> Value {
        match self {
            Argument::String(s) => Value::String(s.clone()),
            Argument::Integer(n) => Value::String(n.to_string()),
            Argument::Bool(b) => Value::Bool(*b),
        }
    }

    /// Returns the string payload, if this is a string argument.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer argument.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Argument::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::String(s) => write!(f, "{s:?}"),
            Argument::Integer(n) => write!(f, "{n}"),
            Argument::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::String(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::String(value)
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Argument::Bool(value)
    }
}

macro_rules! impl_integer_argument {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Argument::Integer(i128::from(value))
                }
            }
        )*
    };
}

impl_integer_argument!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl From<crate::types::Address> for Argument {
    fn from(value: crate::types::Address) -> Self {
        Argument::String(value.into_string())
    }
}

impl From<crate::types::Amount> for Argument {
    fn from(value: crate::types::Amount) -> Self {
        Argument::Integer(i128::from(value.get()))
    }
}
