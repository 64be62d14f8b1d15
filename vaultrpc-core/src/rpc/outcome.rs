//! Closed result type of a dispatched call.

use crate::error::{Error, Result, TransportError};
use serde_json::Value;
use std::fmt;

/// The categorized result of exactly one dispatched call.
///
/// Every raw response or failure maps to one variant; callers match on it
/// instead of probing payload properties.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The node returned a `result` member.
    Success(Value),
    /// The node returned a JSON-RPC `error` object.
    ProtocolError {
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
        /// Optional `data` member
        data: Option<Value>,
    },
    /// The request did not produce a usable JSON-RPC response.
    TransportError(TransportError),
    /// The dispatch deadline elapsed.
    Timeout,
    /// The dispatch was cancelled by the caller.
    Cancelled,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns `true` for a transport failure a retry may fix.
    pub fn is_transient_failure(&self) -> bool {
        match self {
            Outcome::TransportError(err) => err.kind.is_transient(),
            _ => false,
        }
    }

    /// Short variant name, used as a structured log field.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::ProtocolError { .. } => "protocol_error",
            Outcome::TransportError(_) => "transport_error",
            Outcome::Timeout => "timeout",
            Outcome::Cancelled => "cancelled",
        }
    }

    /// Returns the success payload, if any.
    pub fn as_success(&self) -> Option<&Value> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Converts the outcome into a `Result` for `?` propagation.
    ///
    /// ```rust
    /// use vaultrpc_core::rpc::Outcome;
    ///
    /// let value = Outcome::Success(serde_json::json!("42")).into_result().unwrap();
    /// assert_eq!(value, "42");
    /// assert!(Outcome::Timeout.into_result().is_err());
    /// ```
    pub fn into_result(self) -> Result<Value> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::ProtocolError {
                code,
                message,
                data,
            } => Err(Error::protocol(code, message, data)),
            Outcome::TransportError(err) => Err(err.into()),
            Outcome::Timeout => Err(Error::timeout("dispatch deadline elapsed")),
            Outcome::Cancelled => Err(Error::cancelled("dispatch cancelled")),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(_) => write!(f, "success"),
            Outcome::ProtocolError { code, message, .. } => {
                write!(f, "protocol error {code}: {message}")
            }
            Outcome::TransportError(err) => write!(f, "transport error: {err}"),
            Outcome::Timeout => write!(f, "timeout"),
            Outcome::Cancelled => write!(f, "cancelled"),
        }
    }
}
