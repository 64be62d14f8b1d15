//! Result-payload parsing errors.

use std::borrow::Cow;
use thiserror::Error;

/// Errors raised while interpreting a successful RPC `result` payload.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// Failed to deserialize JSON.
    #[error("Failed to deserialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing required field in the payload.
    #[error("Missing required field: {0}")]
    MissingField(Cow<'static, str>),

    /// A field was present but its value could not be used.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: Cow<'static, str>,
        /// Error message
        message: Cow<'static, str>,
    },
}

impl ParseError {
    /// Creates an `InvalidValue` error.
    pub fn invalid_value(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
