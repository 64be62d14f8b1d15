//! Retry strategy module.
//!
//! Decides whether a failed attempt is retried and how long to wait first:
//! - Fixed delay
//! - Exponential backoff (default)
//! - Linear backoff
//! - Per-category retry switches for transport failures
//!
//! Only [`Outcome::TransportError`] is ever retried. Protocol errors,
//! timeouts and cancellations are terminal.

use crate::error::{ConfigValidationError, TransportErrorKind, ValidationResult};
use crate::rpc::Outcome;
use std::time::Duration;

/// Upper bound accepted for `max_retries`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Smallest accepted base delay.
pub const MIN_BASE_DELAY_MS: u64 = 10;

/// Retry strategy type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStrategyType {
    /// Fixed delay: wait a constant duration between retries.
    Fixed,
    /// Exponential backoff: `base_delay * 2^(attempt-1)`.
    Exponential,
    /// Linear backoff: `base_delay * attempt`.
    Linear,
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Default maximum number of retries (attempts = retries + 1).
    pub max_retries: u32,
    /// Type of retry strategy to use.
    pub strategy_type: RetryStrategyType,
    /// Base delay in milliseconds.
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds.
    pub max_delay_ms: u64,
    /// Retry connect, DNS, reset and other network failures.
    pub retry_on_connection_error: bool,
    /// Retry HTTP 429 responses.
    pub retry_on_rate_limit: bool,
    /// Retry HTTP 5xx responses.
    pub retry_on_server_error: bool,
    /// Jitter factor (0.0-1.0) added on top of the computed delay.
    /// The jittered delay is still bounded by `max_delay_ms`.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            strategy_type: RetryStrategyType::Exponential,
            base_delay_ms: 100,
            max_delay_ms: 30_000,
            retry_on_connection_error: true,
            retry_on_rate_limit: true,
            retry_on_server_error: true,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    /// Fewer retries at a fixed delay; server errors are not retried.
    pub fn conservative() -> Self {
        Self {
            max_retries: 2,
            strategy_type: RetryStrategyType::Fixed,
            base_delay_ms: 500,
            max_delay_ms: 5_000,
            retry_on_connection_error: true,
            retry_on_rate_limit: true,
            retry_on_server_error: false,
            jitter_factor: 0.0,
        }
    }

    /// More retries with longer exponential backoff.
    pub fn aggressive() -> Self {
        Self {
            max_retries: 5,
            strategy_type: RetryStrategyType::Exponential,
            base_delay_ms: 200,
            max_delay_ms: 60_000,
            retry_on_connection_error: true,
            retry_on_rate_limit: true,
            retry_on_server_error: true,
            jitter_factor: 0.2,
        }
    }

    /// Never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Validates the retry configuration parameters.
    ///
    /// # Validation Rules
    ///
    /// - `max_retries` must be <= 10
    /// - `base_delay_ms` must be >= 10
    /// - `max_delay_ms` must be >= `base_delay_ms`
    /// - `jitter_factor` must be within `0.0..=1.0`
    ///
    /// # Example
    ///
    /// ```rust
    /// use vaultrpc_core::retry_strategy::RetryConfig;
    ///
    /// assert!(RetryConfig::default().validate().is_ok());
    ///
    /// let invalid = RetryConfig {
    ///     max_retries: 15,
    ///     ..Default::default()
    /// };
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<ValidationResult, ConfigValidationError> {
        let mut result = ValidationResult::new();

        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigValidationError::too_high(
                "max_retries",
                self.max_retries,
                MAX_RETRIES_LIMIT,
            ));
        }

        if self.base_delay_ms < MIN_BASE_DELAY_MS {
            return Err(ConfigValidationError::too_low(
                "base_delay_ms",
                self.base_delay_ms,
                MIN_BASE_DELAY_MS,
            ));
        }

        if self.max_delay_ms < self.base_delay_ms {
            return Err(ConfigValidationError::too_low(
                "max_delay_ms",
                self.max_delay_ms,
                self.base_delay_ms,
            ));
        }

        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err(ConfigValidationError::invalid(
                "jitter_factor",
                format!("{} is outside 0.0..=1.0", self.jitter_factor),
            ));
        }

        if !self.retry_on_connection_error && !self.retry_on_server_error && self.max_retries > 0 {
            result.add_warning(
                "max_retries is set but connection and server errors are not retried",
            );
        }

        Ok(result)
    }
}

/// Retry strategy.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    config: RetryConfig,
}

impl RetryStrategy {
    /// Creates a new retry strategy with the given configuration.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Creates a retry strategy with default configuration.
    pub fn default_strategy() -> Self {
        Self::new(RetryConfig::default())
    }

    /// Determines whether a failed attempt should be retried.
    ///
    /// # Arguments
    ///
    /// * `outcome` - Outcome of the attempt that just finished.
    /// * `attempt` - The retry that would follow (1-based).
    /// * `max_retries` - Retry budget for this dispatch.
    /// * `retry_safe` - Whether the call may be sent more than once.
    pub fn should_retry(
        &self,
        outcome: &Outcome,
        attempt: u32,
        max_retries: u32,
        retry_safe: bool,
    ) -> bool {
        if !retry_safe || attempt > max_retries {
            return false;
        }
        match outcome {
            Outcome::TransportError(err) => self.is_retryable_kind(err.kind),
            _ => false,
        }
    }

    /// Returns `true` if this strategy retries the given failure category.
    pub fn is_retryable_kind(&self, kind: TransportErrorKind) -> bool {
        match kind {
            TransportErrorKind::Status(429) => self.config.retry_on_rate_limit,
            TransportErrorKind::Status(status) if Self::is_server_error_code(status) => {
                self.config.retry_on_server_error
            }
            kind if kind.is_transient() => self.config.retry_on_connection_error,
            _ => false,
        }
    }

    /// Calculates the delay before the given retry (1-based).
    ///
    /// The result never exceeds `max_delay_ms`, jitter included.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let base = self.config.base_delay_ms;
        let base_delay = match self.config.strategy_type {
            RetryStrategyType::Fixed => base,
            RetryStrategyType::Exponential => 2_u64
                .checked_pow(attempt.saturating_sub(1))
                .and_then(|factor| base.checked_mul(factor))
                .unwrap_or(u64::MAX),
            RetryStrategyType::Linear => base.saturating_mul(u64::from(attempt)),
        };

        let max_delay = self.config.max_delay_ms;
        let mut delay = base_delay.min(max_delay);
        if self.config.jitter_factor > 0.0 {
            delay = self.apply_jitter(delay).min(max_delay);
        }

        Duration::from_millis(delay)
    }

    fn apply_jitter(&self, delay_ms: u64) -> u64 {
        use rand::Rng;
        let mut rng = rand::rngs::ThreadRng::default();
        #[allow(clippy::cast_precision_loss)]
        #[allow(clippy::cast_possible_truncation)]
        #[allow(clippy::cast_sign_loss)]
        let jitter_range = (delay_ms as f64 * self.config.jitter_factor) as u64;
        let jitter = rng.random_range(0..=jitter_range);
        delay_ms.saturating_add(jitter)
    }

    /// Checks if an HTTP status code indicates a server error (5xx).
    ///
    /// ```rust
    /// use vaultrpc_core::retry_strategy::RetryStrategy;
    ///
    /// assert!(RetryStrategy::is_server_error_code(503));
    /// assert!(!RetryStrategy::is_server_error_code(429));
    /// ```
    pub fn is_server_error_code(status: u16) -> bool {
        (500..600).contains(&status)
    }

    /// Returns a reference to the retry configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Returns the default maximum number of retries.
    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }
}
