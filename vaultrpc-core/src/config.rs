//! Configuration types for the dispatcher.
//!
//! Configuration can be built in code or read from `VAULTRPC_*` environment
//! variables (with `.env` support through `dotenvy`). Every recognized key
//! is listed in [`RECOGNIZED_KEYS`]; any other key carrying the prefix is
//! rejected so a typo cannot silently fall back to a default.
//!
//! ```rust
//! use vaultrpc_core::config::RpcConfig;
//!
//! let config = RpcConfig::from_vars([
//!     ("VAULTRPC_RPC_URL", "https://fullnode.testnet.sui.io:443"),
//!     ("VAULTRPC_MAX_RETRIES", "5"),
//! ])
//! .unwrap();
//! assert_eq!(config.retry_config.max_retries, 5);
//! assert_eq!(config.pool_size, 10);
//! ```

use crate::error::{ConfigValidationError, ValidationResult};
use crate::retry_strategy::RetryConfig;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Prefix shared by every environment key.
pub const ENV_PREFIX: &str = "VAULTRPC_";

/// Node endpoint (required).
pub const ENV_RPC_URL: &str = "VAULTRPC_RPC_URL";
/// Whole-dispatch deadline in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "VAULTRPC_TIMEOUT_MS";
/// Retry budget per dispatch.
pub const ENV_MAX_RETRIES: &str = "VAULTRPC_MAX_RETRIES";
/// Concurrent request slots.
pub const ENV_POOL_SIZE: &str = "VAULTRPC_POOL_SIZE";
/// TCP connect timeout in milliseconds.
pub const ENV_CONNECT_TIMEOUT_MS: &str = "VAULTRPC_CONNECT_TIMEOUT_MS";
/// Vault package id, read by the ledger client.
pub const ENV_PACKAGE_ID: &str = "VAULTRPC_PACKAGE_ID";
/// Gas budget in MIST, read by the ledger client.
pub const ENV_GAS_BUDGET: &str = "VAULTRPC_GAS_BUDGET";
/// Coin type tag, read by the ledger client.
pub const ENV_COIN_TYPE: &str = "VAULTRPC_COIN_TYPE";

/// All keys any component reads.
pub const RECOGNIZED_KEYS: &[&str] = &[
    ENV_RPC_URL,
    ENV_TIMEOUT_MS,
    ENV_MAX_RETRIES,
    ENV_POOL_SIZE,
    ENV_CONNECT_TIMEOUT_MS,
    ENV_PACKAGE_ID,
    ENV_GAS_BUDGET,
    ENV_COIN_TYPE,
];

/// Public Sui testnet full node.
pub const DEFAULT_RPC_URL: &str = "https://fullnode.testnet.sui.io:443";

const MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// A snapshot of `VAULTRPC_*` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    vars: BTreeMap<String, String>,
}

impl EnvVars {
    /// Loads `.env` if present, then captures the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Captures the prefixed keys of an arbitrary key/value source.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();
        Self { vars }
    }

    /// Rejects any prefixed key not listed in [`RECOGNIZED_KEYS`].
    pub fn check_recognized(&self) -> Result<(), ConfigValidationError> {
        match self
            .vars
            .keys()
            .find(|key| !RECOGNIZED_KEYS.contains(&key.as_str()))
        {
            Some(key) => Err(ConfigValidationError::unrecognized(key.clone())),
            None => Ok(()),
        }
    }

    /// Returns the trimmed value of `key`, treating empty values as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Parses `key` if set. Unparseable values are errors, never defaults.
    pub fn parse<T>(&self, key: &'static str) -> Result<Option<T>, ConfigValidationError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| ConfigValidationError::invalid(key, format!("{raw:?}: {e}")))
            })
            .transpose()
    }
}

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcConfig {
    /// JSON-RPC endpoint (http or https).
    pub endpoint: String,
    /// Deadline for a whole dispatch, retries included (default: 30 seconds).
    pub timeout: Duration,
    /// TCP connection timeout (default: 10 seconds).
    pub connect_timeout: Duration,
    /// Concurrent request slots, also the idle connections kept per host (default: 10).
    pub pool_size: usize,
    /// Idle connections older than this are closed (default: 90 seconds).
    pub pool_idle_timeout: Duration,
    /// Backoff curve and retryable failure categories.
    pub retry_config: RetryConfig,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Maximum response body size in bytes (default: 10MB).
    pub max_response_size: usize,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RPC_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_size: crate::pool::DEFAULT_POOL_SIZE,
            pool_idle_timeout: Duration::from_secs(90),
            retry_config: RetryConfig::default(),
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
            max_response_size: 10 * 1024 * 1024,
        }
    }
}

impl RpcConfig {
    /// Creates a configuration for `endpoint` with default settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Sets the dispatch deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the default retry budget, stored on [`RetryConfig::max_retries`].
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry_config.max_retries = max_retries;
        self
    }

    /// Sets the pool size.
    #[must_use]
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Sets the backoff configuration.
    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Loads configuration from the environment (and `.env`).
    ///
    /// # Errors
    ///
    /// Fails if `VAULTRPC_RPC_URL` is missing, a value does not parse, an
    /// unknown `VAULTRPC_*` key is present, or validation fails.
    pub fn from_env() -> Result<Self, ConfigValidationError> {
        Self::from_env_vars(&EnvVars::from_env())
    }

    /// Loads configuration from explicit key/value pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_env_vars(&EnvVars::from_vars(vars))
    }

    /// Loads configuration from a captured variable set.
    pub fn from_env_vars(env: &EnvVars) -> Result<Self, ConfigValidationError> {
        env.check_recognized()?;

        let endpoint = env
            .get(ENV_RPC_URL)
            .ok_or_else(|| ConfigValidationError::missing(ENV_RPC_URL))?;

        let mut config = Self::new(endpoint);
        if let Some(ms) = env.parse::<u64>(ENV_TIMEOUT_MS)? {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = env.parse::<u64>(ENV_CONNECT_TIMEOUT_MS)? {
            config.connect_timeout = Duration::from_millis(ms);
        }
        if let Some(retries) = env.parse::<u32>(ENV_MAX_RETRIES)? {
            config.retry_config.max_retries = retries;
        }
        if let Some(size) = env.parse::<usize>(ENV_POOL_SIZE)? {
            config.pool_size = size;
        }

        let result = config.validate()?;
        for warning in &result.warnings {
            debug!(warning = %warning, "Configuration warning");
        }
        Ok(config)
    }

    /// Validates the configuration parameters.
    ///
    /// # Validation Rules
    ///
    /// - `endpoint` must be an absolute http or https URL
    /// - `timeout` must be non-zero and at most 5 minutes
    /// - `pool_size` must be >= 1
    /// - `max_response_size` must be non-zero
    /// - `retry_config` must itself validate (this bounds `max_retries` at 10)
    /// - `timeout` < 1 second generates a warning
    pub fn validate(&self) -> Result<ValidationResult, ConfigValidationError> {
        let mut result = ValidationResult::new();

        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| ConfigValidationError::invalid("endpoint", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigValidationError::invalid(
                "endpoint",
                format!("unsupported scheme {:?}", url.scheme()),
            ));
        }
        if url.host_str().is_none() {
            return Err(ConfigValidationError::invalid("endpoint", "missing host"));
        }

        if self.timeout.is_zero() {
            return Err(ConfigValidationError::too_low("timeout", "0ms", "1ms"));
        }
        if self.timeout > MAX_TIMEOUT {
            return Err(ConfigValidationError::too_high(
                "timeout",
                format!("{:?}", self.timeout),
                "5 minutes",
            ));
        }
        if self.timeout < Duration::from_secs(1) {
            result.add_warning(format!(
                "timeout {:?} is very short, may cause frequent timeouts",
                self.timeout
            ));
        }

        if self.pool_size == 0 {
            return Err(ConfigValidationError::too_low("pool_size", 0, 1));
        }

        if self.max_response_size == 0 {
            return Err(ConfigValidationError::invalid(
                "max_response_size",
                "max_response_size cannot be zero",
            ));
        }

        result.merge(self.retry_config.validate()?);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://127.0.0.1:9000";

    #[test]
    fn test_defaults() {
        let config = RpcConfig::from_vars([(ENV_RPC_URL, URL)]).unwrap();
        assert_eq!(config.endpoint, URL);
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert_eq!(config.connect_timeout, Duration::from_millis(10_000));
        assert_eq!(config.retry_config.max_retries, 3);
        assert_eq!(config.pool_size, 10);
    }

    #[test]
    fn test_overrides() {
        let config = RpcConfig::from_vars([
            (ENV_RPC_URL, URL),
            (ENV_TIMEOUT_MS, "5000"),
            (ENV_CONNECT_TIMEOUT_MS, " 2000 "),
            (ENV_MAX_RETRIES, "0"),
            (ENV_POOL_SIZE, "32"),
        ])
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.retry_config.max_retries, 0);
        assert_eq!(config.pool_size, 32);
    }

    #[test]
    fn test_missing_url() {
        let err = RpcConfig::from_vars([(ENV_TIMEOUT_MS, "5000")]).unwrap_err();
        assert_eq!(err, ConfigValidationError::missing(ENV_RPC_URL));

        let err = RpcConfig::from_vars([(ENV_RPC_URL, "  ")]).unwrap_err();
        assert_eq!(err, ConfigValidationError::missing(ENV_RPC_URL));
    }

    #[test]
    fn test_unparseable_value_is_error() {
        let err = RpcConfig::from_vars([(ENV_RPC_URL, URL), (ENV_TIMEOUT_MS, "thirty")])
            .unwrap_err();
        assert_eq!(err.field_name(), ENV_TIMEOUT_MS);

        let err = RpcConfig::from_vars([(ENV_RPC_URL, URL), (ENV_MAX_RETRIES, "-1")])
            .unwrap_err();
        assert_eq!(err.field_name(), ENV_MAX_RETRIES);
    }

    #[test]
    fn test_unrecognized_key_rejected() {
        let err = RpcConfig::from_vars([(ENV_RPC_URL, URL), ("VAULTRPC_TIMEOUT", "5000")])
            .unwrap_err();
        assert_eq!(err, ConfigValidationError::unrecognized("VAULTRPC_TIMEOUT"));
    }

    #[test]
    fn test_foreign_keys_ignored() {
        let config = RpcConfig::from_vars([(ENV_RPC_URL, URL), ("PATH", "/usr/bin")]).unwrap();
        assert_eq!(config.endpoint, URL);
    }

    #[test]
    fn test_ledger_client_keys_are_recognized() {
        let env = EnvVars::from_vars([
            (ENV_RPC_URL, URL),
            (ENV_PACKAGE_ID, "0x1234567890abcdef1234567890abcdef12345678"),
            (ENV_GAS_BUDGET, "5000000"),
            (ENV_COIN_TYPE, "0x2::sui::SUI"),
        ]);
        assert!(env.check_recognized().is_ok());
        assert!(RpcConfig::from_env_vars(&env).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            RpcConfig::from_vars([(ENV_RPC_URL, URL), (ENV_MAX_RETRIES, "11")])
                .unwrap_err()
                .field_name(),
            "max_retries"
        );
        assert_eq!(
            RpcConfig::from_vars([(ENV_RPC_URL, URL), (ENV_POOL_SIZE, "0")])
                .unwrap_err()
                .field_name(),
            "pool_size"
        );
        assert_eq!(
            RpcConfig::from_vars([(ENV_RPC_URL, "ftp://node.example")])
                .unwrap_err()
                .field_name(),
            "endpoint"
        );
        assert_eq!(
            RpcConfig::from_vars([(ENV_RPC_URL, "not a url")])
                .unwrap_err()
                .field_name(),
            "endpoint"
        );
        assert_eq!(
            RpcConfig::from_vars([(ENV_RPC_URL, URL), (ENV_TIMEOUT_MS, "0")])
                .unwrap_err()
                .field_name(),
            "timeout"
        );
    }

    #[test]
    fn test_retry_budget_has_one_home() {
        let config = RpcConfig::new(URL).with_max_retries(7);
        assert_eq!(config.retry_config.max_retries, 7);

        let config = RpcConfig::new(URL)
            .with_max_retries(7)
            .with_retry_config(RetryConfig::disabled());
        assert_eq!(config.retry_config.max_retries, 0);
    }

    #[test]
    fn test_short_timeout_warns() {
        let result = RpcConfig::new(URL)
            .with_timeout(Duration::from_millis(200))
            .validate()
            .unwrap();
        assert!(result.has_warnings());
        assert!(!RpcConfig::new(URL).validate().unwrap().has_warnings());
    }
}
