//! # Error Handling for vaultrpc
//!
//! Errors are split along the request lifecycle:
//!
//! ```text
//! Error (main error type)
//! ├── Validation     - Caller input rejected before any I/O (via ValidationError)
//! ├── Config         - Invalid or missing configuration (via ConfigValidationError)
//! ├── NotConfigured  - A required collaborator (signer, package id) is absent
//! ├── Protocol       - JSON-RPC error object returned by the node
//! ├── Transport      - Network/transport layer failure (via TransportError)
//! ├── Timeout        - Dispatch deadline elapsed
//! ├── Cancelled      - Dispatch aborted through a CancellationToken
//! ├── Parse          - Result payload did not have the expected shape (via ParseError)
//! ├── Signing        - Signer capability failed
//! ├── ObjectNotFound - Ledger object lookup returned no data
//! ├── ExecutionFailed - Transaction was executed but its effects report failure
//! ├── Metrics        - A metrics collector could not be created or encoded
//! └── Context        - Error with additional context
//! ```
//!
//! The dispatcher itself never returns [`Error`]: it produces an
//! [`Outcome`](crate::rpc::Outcome). `Error` is used at the boundaries that
//! need `?` propagation, such as the ledger client and configuration loading.
//!
//! ## Quick Start
//!
//! ```rust
//! use vaultrpc_core::error::{Error, Result, ContextExt};
//!
//! fn gas_price(raw: &serde_json::Value) -> Result<u64> {
//!     raw.as_str()
//!         .context("gas price must be a string")?
//!         .parse::<u64>()
//!         .map_err(|e| Error::parse_value("result", e.to_string()))
//! }
//!
//! assert_eq!(gas_price(&serde_json::json!("750")).unwrap(), 750);
//! ```

mod config;
mod context;
mod parse;
mod transport;
mod validation;

use serde_json::Value;
use std::borrow::Cow;
use std::error::Error as StdError;
use thiserror::Error;

pub use config::{ConfigValidationError, ValidationResult};
pub use context::ContextExt;
pub use parse::ParseError;
pub use transport::{TransportError, TransportErrorKind};
pub use validation::ValidationError;

/// Result type alias for all vaultrpc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type for the `vaultrpc` crates.
///
/// Large variants are boxed to keep the enum small; static messages use
/// `Cow<'static, str>` so they do not allocate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Caller-supplied request fields failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigValidationError),

    /// A required collaborator or setting has not been supplied.
    #[error("Not configured: {0}")]
    NotConfigured(Cow<'static, str>),

    /// JSON-RPC error object returned by the remote node.
    #[error("RPC error {code}: {message}")]
    Protocol {
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
        /// Optional `data` member of the error object
        data: Option<Box<Value>>,
    },

    /// Transport-level failure. Boxed to reduce enum size.
    #[error("Transport error: {0}")]
    Transport(Box<TransportError>),

    /// The dispatch deadline elapsed.
    #[error("Timeout: {0}")]
    Timeout(Cow<'static, str>),

    /// The operation was cancelled.
    #[error("Cancelled: {0}")]
    Cancelled(Cow<'static, str>),

    /// The response payload could not be interpreted. Boxed to reduce enum size.
    #[error("Parse error: {0}")]
    Parse(Box<ParseError>),

    /// The signer capability failed to produce a signature.
    #[error("Signing error: {0}")]
    Signing(Cow<'static, str>),

    /// The requested ledger object does not exist.
    #[error("Object not found: {0}")]
    ObjectNotFound(Cow<'static, str>),

    /// The transaction executed but its effects report a failure.
    #[error("Execution failed: {0}")]
    ExecutionFailed(Cow<'static, str>),

    /// A metrics collector could not be registered or encoded.
    #[error("Metrics error: {0}")]
    Metrics(Cow<'static, str>),

    /// Error with additional context, preserving the error chain.
    #[error("{context}")]
    Context {
        /// Context message describing what operation failed
        context: String,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    // ==================== Constructor Methods ====================

    /// Creates a not-configured error.
    pub fn not_configured(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotConfigured(msg.into())
    }

    /// Creates a protocol error from a JSON-RPC error object.
    pub fn protocol(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self::Protocol {
            code,
            message: message.into(),
            data: data.map(Box::new),
        }
    }

    /// Creates a transport error.
    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self::Transport(Box::new(TransportError::new(kind, message)))
    }

    /// Creates a timeout error.
    pub fn timeout(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates a cancelled error.
    pub fn cancelled(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Creates a missing-field parse error.
    pub fn missing_field(field: impl Into<Cow<'static, str>>) -> Self {
        Self::Parse(Box::new(ParseError::MissingField(field.into())))
    }

    /// Creates an invalid-value parse error.
    pub fn parse_value(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Parse(Box::new(ParseError::invalid_value(field, message)))
    }

    /// Creates a signing error.
    pub fn signing(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Signing(msg.into())
    }

    /// Creates an object-not-found error.
    pub fn object_not_found(id: impl Into<Cow<'static, str>>) -> Self {
        Self::ObjectNotFound(id.into())
    }

    /// Creates an execution-failed error.
    pub fn execution_failed(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Creates a metrics error.
    pub fn metrics(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Metrics(msg.into())
    }

    // ==================== Context Methods ====================

    /// Attaches context to an existing error.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    fn iter_chain(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(Some(self), |err| match err {
            Error::Context { source, .. } => Some(source.as_ref()),
            _ => None,
        })
    }

    /// Returns the root cause of the error, skipping Context layers.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        self.iter_chain().last().unwrap_or(self)
    }

    /// Generates a detailed error report with the full chain.
    ///
    /// ```rust
    /// use vaultrpc_core::error::{Error, TransportErrorKind};
    ///
    /// let err = Error::transport(TransportErrorKind::Connect, "connection refused")
    ///     .context("Failed to fetch gas price");
    /// assert!(err.report().contains("Caused by"));
    /// ```
    #[must_use]
    pub fn report(&self) -> String {
        use std::fmt::Write;
        let mut report = String::new();
        report.push_str(&self.to_string());

        let mut current: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = current {
            let _ = write!(report, "\nCaused by: {err}");
            current = err.source();
        }
        report
    }

    // ==================== Helper Methods (Context Penetrating) ====================

    /// Checks if this error is a transport failure that a retry might fix.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self.root_cause() {
            Error::Transport(err) => err.kind.is_transient(),
            _ => false,
        }
    }

    /// Returns the validation error, if this is one (penetrates Context layers).
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self.root_cause() {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the JSON-RPC code and message, if this is a protocol error.
    #[must_use]
    pub fn as_protocol(&self) -> Option<(i64, &str)> {
        match self.root_cause() {
            Error::Protocol { code, message, .. } => Some((*code, message.as_str())),
            _ => None,
        }
    }

    /// Returns `true` if a required collaborator was missing.
    #[must_use]
    pub fn is_not_configured(&self) -> bool {
        matches!(self.root_cause(), Error::NotConfigured(_))
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(Box::new(e))
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(Box::new(e))
    }
}

impl From<prometheus::Error> for Error {
    fn from(e: prometheus::Error) -> Self {
        Error::Metrics(e.to_string().into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(Box::new(ParseError::Json(e)))
    }
}

#[cfg(test)]
mod tests;
