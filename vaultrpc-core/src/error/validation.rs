//! Request validation errors.

use thiserror::Error;

/// Errors raised while building an operation request.
///
/// The set is closed on purpose so callers can match exhaustively. None of
/// these are ever retried: they describe caller input, not the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The string is not a `0x`-prefixed fixed-width hex address.
    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    /// The operation received the wrong number of arguments.
    #[error("expected {expected} arguments, got {actual}")]
    ArityMismatch {
        /// Arity required by the operation kind
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
    },

    /// An amount argument was not a strictly positive integer in range.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
