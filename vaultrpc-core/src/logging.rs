//! Structured logging setup.
//!
//! The crates emit `tracing` events with structured fields (`method`, `id`,
//! `attempt`, `delay_ms`, `status`) inside `rpc_dispatch` / `rpc_attempt` /
//! `http_send` spans. This module installs a `tracing-subscriber` pipeline
//! for binaries and tests; libraries embedding vaultrpc can install their
//! own subscriber instead.
//!
//! `RUST_LOG` takes precedence over [`LogConfig::level`] when set.

use std::fmt;
use std::str::FromStr;
use tracing::{Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self as tfmt, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Crates whose events the default filter enables.
const CRATE_TARGETS: &[&str] = &["vaultrpc", "vaultrpc_core", "vaultrpc_sui"];

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Per-slot pool bookkeeping.
    Trace,
    /// Request validation and per-response details.
    Debug,
    /// Timeouts and cancellations.
    Info,
    /// Retries and malformed responses.
    Warn,
    /// Final failures.
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level {other:?}")),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human-readable output.
    Pretty,
    /// Single-line output.
    Compact,
    /// Newline-delimited JSON.
    Json,
}

/// Log configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level for the vaultrpc crates.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Whether to show timestamps.
    pub show_time: bool,
    /// Whether to show thread IDs.
    pub show_thread_ids: bool,
    /// Whether to show the event target.
    pub show_target: bool,
    /// Whether to log span creation and close (dispatch/attempt timings).
    pub show_span_events: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            show_time: true,
            show_thread_ids: false,
            show_target: true,
            show_span_events: false,
        }
    }
}

impl LogConfig {
    /// Verbose output with span timings.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            show_span_events: true,
            ..Self::default()
        }
    }

    /// JSON output for log aggregation.
    pub fn production() -> Self {
        Self {
            format: LogFormat::Json,
            show_thread_ids: true,
            ..Self::default()
        }
    }

    /// Quiet output for test runs.
    pub fn test() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            show_time: false,
            show_thread_ids: false,
            show_target: false,
            show_span_events: false,
        }
    }

    /// Filter directive enabling [`LogConfig::level`] for the vaultrpc crates.
    pub fn directive(&self) -> String {
        CRATE_TARGETS
            .iter()
            .map(|target| format!("{target}={}", self.level))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }

    fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    {
        let span_events = if self.show_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = tfmt::layer()
            .with_thread_ids(self.show_thread_ids)
            .with_target(self.show_target)
            .with_span_events(span_events);

        match (self.format, self.show_time) {
            (LogFormat::Pretty, true) => layer.pretty().boxed(),
            (LogFormat::Pretty, false) => layer.pretty().without_time().boxed(),
            (LogFormat::Compact, true) => layer.compact().boxed(),
            (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
            (LogFormat::Json, true) => layer.json().boxed(),
            (LogFormat::Json, false) => layer.json().without_time().boxed(),
        }
    }
}

/// Installs the global subscriber.
///
/// # Panics
///
/// Panics if a global subscriber is already installed; use
/// [`try_init_logging`] where that can happen.
///
/// ```no_run
/// use vaultrpc_core::logging::{LogConfig, init_logging};
///
/// init_logging(&LogConfig::development());
/// ```
pub fn init_logging(config: &LogConfig) {
    tracing_subscriber::registry()
        .with(config.fmt_layer().with_filter(config.env_filter()))
        .init();
}

/// Installs the global subscriber unless one is already set.
///
/// Returns `true` if this call installed it. Safe to call from every test.
pub fn try_init_logging(config: &LogConfig) -> bool {
    tracing_subscriber::registry()
        .with(config.fmt_layer().with_filter(config.env_filter()))
        .try_init()
        .is_ok()
}
