//! Context attachment for results and options.

use crate::error::{Error, Result};
use std::fmt;

/// Extension trait for attaching context to errors.
///
/// Works on any `Result` whose error converts into [`Error`], and on `Option`
/// (a `None` becomes a missing-field parse error carrying the context text).
///
/// ```rust
/// use vaultrpc_core::error::{ContextExt, Result};
///
/// fn digest(json: &serde_json::Value) -> Result<&str> {
///     json.get("digest")
///         .and_then(|v| v.as_str())
///         .context("digest")
/// }
///
/// assert!(digest(&serde_json::json!({})).is_err());
/// ```
pub trait ContextExt<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds lazily-built context to an error.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ContextExt<T, E> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| e.into().context(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().context(f().to_string()))
    }
}

impl<T> ContextExt<T, Error> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::missing_field(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::missing_field(f().to_string()))
    }
}
