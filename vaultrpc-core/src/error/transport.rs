//! Transport-layer error types.

use std::fmt;
use thiserror::Error;

/// Category of a transport failure.
///
/// Wraps network failures without exposing `reqwest::Error` in the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportErrorKind {
    /// TCP/TLS connection could not be established.
    Connect,
    /// Host name could not be resolved.
    Dns,
    /// Connection was reset or aborted mid-request.
    ConnectionReset,
    /// Non-success HTTP status without a JSON-RPC error body.
    Status(u16),
    /// Body was not a well-formed JSON-RPC response.
    MalformedBody,
    /// Body exceeded the configured response size limit.
    ResponseTooLarge,
    /// The connection pool was closed.
    PoolClosed,
    /// Any other transport failure.
    Other,
}

impl TransportErrorKind {
    /// Returns `true` for failures a retry may plausibly fix.
    ///
    /// Malformed or oversized bodies and a closed pool are deterministic.
    #[must_use]
    pub fn is_transient(self) -> bool {
        match self {
            TransportErrorKind::Connect
            | TransportErrorKind::Dns
            | TransportErrorKind::ConnectionReset
            | TransportErrorKind::Other => true,
            TransportErrorKind::Status(status) => status == 429 || (500..600).contains(&status),
            TransportErrorKind::MalformedBody
            | TransportErrorKind::ResponseTooLarge
            | TransportErrorKind::PoolClosed => false,
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Connect => write!(f, "connection failed"),
            TransportErrorKind::Dns => write!(f, "DNS resolution failed"),
            TransportErrorKind::ConnectionReset => write!(f, "connection reset"),
            TransportErrorKind::Status(status) => write!(f, "HTTP status {status}"),
            TransportErrorKind::MalformedBody => write!(f, "malformed response body"),
            TransportErrorKind::ResponseTooLarge => write!(f, "response too large"),
            TransportErrorKind::PoolClosed => write!(f, "connection pool closed"),
            TransportErrorKind::Other => write!(f, "transport failure"),
        }
    }
}

/// A classified transport failure with its cause message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct TransportError {
    /// Failure category
    pub kind: TransportErrorKind,
    /// Human-readable cause
    pub message: String,
}

impl TransportError {
    /// Maximum stored message length; node error pages can be large.
    pub const MAX_MESSAGE_LEN: usize = 1024;

    /// Creates a transport error, truncating oversized messages.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.len() > Self::MAX_MESSAGE_LEN {
            let mut cut = Self::MAX_MESSAGE_LEN;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
            message.push_str("... (truncated)");
        }
        Self { kind, message }
    }

    /// Shorthand for a malformed-body error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::MalformedBody, message)
    }
}
