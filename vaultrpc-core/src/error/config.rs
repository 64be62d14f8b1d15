//! Errors raised while loading or validating `VAULTRPC_*` settings.
//!
//! Settings are checked under their field names (`pool_size`, `timeout`).
//! Messages also name the environment variable a field is read from, so an
//! operator can fix the variable rather than search for the field.
//!
//! ```rust
//! use vaultrpc_core::error::ConfigValidationError;
//!
//! let err = ConfigValidationError::too_low("pool_size", 0, 1);
//! assert_eq!(err.field_name(), "pool_size");
//! assert_eq!(err.env_key(), Some("VAULTRPC_POOL_SIZE"));
//! assert_eq!(
//!     err.to_string(),
//!     "pool_size (VAULTRPC_POOL_SIZE) = 0 is out of range, expected at least 1"
//! );
//! ```

use crate::config::{
    ENV_COIN_TYPE, ENV_CONNECT_TIMEOUT_MS, ENV_GAS_BUDGET, ENV_MAX_RETRIES, ENV_PACKAGE_ID,
    ENV_POOL_SIZE, ENV_PREFIX, ENV_RPC_URL, ENV_TIMEOUT_MS,
};
use std::fmt;
use thiserror::Error;

/// Environment variable feeding each validated field.
const FIELD_KEYS: &[(&str, &str)] = &[
    ("endpoint", ENV_RPC_URL),
    ("timeout", ENV_TIMEOUT_MS),
    ("connect_timeout", ENV_CONNECT_TIMEOUT_MS),
    ("max_retries", ENV_MAX_RETRIES),
    ("pool_size", ENV_POOL_SIZE),
    ("package_id", ENV_PACKAGE_ID),
    ("gas_budget", ENV_GAS_BUDGET),
    ("coin_type", ENV_COIN_TYPE),
];

fn env_key_for(field: &str) -> Option<&'static str> {
    if field.starts_with(ENV_PREFIX) {
        return None;
    }
    FIELD_KEYS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, key)| *key)
}

fn describe(field: &str) -> String {
    match env_key_for(field) {
        Some(key) => format!("{field} ({key})"),
        None => field.to_string(),
    }
}

/// A setting that cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigValidationError {
    /// A required variable is unset or blank.
    #[error("{key} is required but not set")]
    Missing {
        /// The variable name
        key: &'static str,
    },

    /// A numeric setting outside its accepted range.
    #[error("{} = {value} is out of range, expected {bound}", describe(.field))]
    OutOfRange {
        /// Field (or variable) name
        field: &'static str,
        /// Value as supplied
        value: String,
        /// Accepted range, e.g. `at most 10`
        bound: String,
    },

    /// A setting that does not parse or is otherwise unusable.
    #[error("{} is invalid: {reason}", describe(.field))]
    Invalid {
        /// Field (or variable) name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A `VAULTRPC_*` variable that no component reads; usually a typo.
    #[error("{key} is not a recognized VAULTRPC_* setting")]
    Unrecognized {
        /// The variable as supplied
        key: String,
    },
}

impl ConfigValidationError {
    /// Field or variable the error is about.
    ///
    /// [`ConfigValidationError::Unrecognized`] reports `"<unrecognized>"`;
    /// the supplied key stays on the variant.
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            ConfigValidationError::Missing { key: field }
            | ConfigValidationError::OutOfRange { field, .. }
            | ConfigValidationError::Invalid { field, .. } => *field,
            ConfigValidationError::Unrecognized { .. } => "<unrecognized>",
        }
    }

    /// The `VAULTRPC_*` variable to change, when one exists.
    #[must_use]
    pub fn env_key(&self) -> Option<&'static str> {
        match self {
            ConfigValidationError::Missing { key } => Some(*key),
            ConfigValidationError::OutOfRange { field, .. }
            | ConfigValidationError::Invalid { field, .. } => {
                if field.starts_with(ENV_PREFIX) {
                    Some(*field)
                } else {
                    env_key_for(field)
                }
            }
            ConfigValidationError::Unrecognized { .. } => None,
        }
    }

    /// `value` is above `max`.
    pub fn too_high(field: &'static str, value: impl fmt::Display, max: impl fmt::Display) -> Self {
        ConfigValidationError::OutOfRange {
            field,
            value: value.to_string(),
            bound: format!("at most {max}"),
        }
    }

    /// `value` is below `min`.
    pub fn too_low(field: &'static str, value: impl fmt::Display, min: impl fmt::Display) -> Self {
        ConfigValidationError::OutOfRange {
            field,
            value: value.to_string(),
            bound: format!("at least {min}"),
        }
    }

    /// Unusable value.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigValidationError::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Required variable is absent.
    pub fn missing(key: &'static str) -> Self {
        ConfigValidationError::Missing { key }
    }

    /// Unknown prefixed variable.
    pub fn unrecognized(key: impl Into<String>) -> Self {
        ConfigValidationError::Unrecognized { key: key.into() }
    }
}

/// Non-fatal findings of a successful validation, such as a sub-second
/// dispatch timeout or a client with no vault package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Human-readable warnings, logged at debug level by the loaders.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// No warnings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps already collected warnings.
    #[must_use]
    pub fn with_warnings(warnings: Vec<String>) -> Self {
        Self { warnings }
    }

    /// Records a warning.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Returns `true` if anything was recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Appends the warnings of a nested validation, e.g. the retry settings.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_names_variable() {
        let err = ConfigValidationError::too_high("max_retries", 15, 10);
        assert_eq!(
            err.to_string(),
            "max_retries (VAULTRPC_MAX_RETRIES) = 15 is out of range, expected at most 10"
        );
        assert_eq!(err.env_key(), Some(ENV_MAX_RETRIES));
    }

    #[test]
    fn test_field_without_variable() {
        let err = ConfigValidationError::too_low("base_delay_ms", 5, 10);
        assert_eq!(
            err.to_string(),
            "base_delay_ms = 5 is out of range, expected at least 10"
        );
        assert_eq!(err.env_key(), None);
    }

    #[test]
    fn test_unparseable_variable_is_named_once() {
        let err = ConfigValidationError::invalid(ENV_GAS_BUDGET, "\"lots\": invalid digit");
        assert_eq!(
            err.to_string(),
            "VAULTRPC_GAS_BUDGET is invalid: \"lots\": invalid digit"
        );
        assert_eq!(err.env_key(), Some(ENV_GAS_BUDGET));
    }

    #[test]
    fn test_field_name() {
        assert_eq!(
            ConfigValidationError::invalid("endpoint", "not a URL").field_name(),
            "endpoint"
        );
        assert_eq!(
            ConfigValidationError::missing(ENV_RPC_URL).field_name(),
            ENV_RPC_URL
        );
        assert_eq!(
            ConfigValidationError::unrecognized("VAULTRPC_TIMEOUT").field_name(),
            "<unrecognized>"
        );
    }

    #[test]
    fn test_missing_and_unrecognized_messages() {
        assert_eq!(
            ConfigValidationError::missing(ENV_RPC_URL).to_string(),
            "VAULTRPC_RPC_URL is required but not set"
        );
        let err = ConfigValidationError::unrecognized("VAULTRPC_RETRIES");
        assert_eq!(
            err.to_string(),
            "VAULTRPC_RETRIES is not a recognized VAULTRPC_* setting"
        );
        assert_eq!(err.env_key(), None);
    }

    #[test]
    fn test_validation_result_merge() {
        let mut first = ValidationResult::new();
        first.add_warning("timeout is very short");

        let second = ValidationResult::with_warnings(vec!["no vault package".to_string()]);
        first.merge(second);

        assert!(first.has_warnings());
        assert_eq!(first.warnings.len(), 2);
    }
}
