//! Prometheus metrics for dispatches and vault transactions.
//!
//! Each [`Metrics`] owns its own [`Registry`]; nothing is registered
//! globally. Dispatchers created with the same `Arc<Metrics>` share counters.
//!
//! ```rust
//! use std::time::Duration;
//! use vaultrpc_core::metrics::Metrics;
//! use vaultrpc_core::rpc::Outcome;
//!
//! let metrics = Metrics::new().unwrap();
//! metrics.record_dispatch(&Outcome::Timeout, Duration::from_millis(30));
//! assert_eq!(metrics.dispatch_count("timeout"), 1);
//! assert!(metrics.encode().unwrap().contains("vaultrpc_dispatches_total"));
//! ```

use crate::error::{Error, Result};
use crate::rpc::Outcome;
use crate::types::OperationKind;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};
use std::fmt;
use std::time::Duration;

const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
];

/// Final state of a submitted vault transaction, as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Executed and the effects report success.
    Executed,
    /// Executed but aborted on chain.
    Aborted,
    /// Never executed: rejected, unsigned or lost in transport.
    Failed,
}

impl TransactionStatus {
    /// Label value used in `vaultrpc_transactions_total`.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Executed => "executed",
            TransactionStatus::Aborted => "aborted",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch and transaction counters plus latency histograms.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    dispatches_total: IntCounterVec,
    dispatch_latency: Histogram,
    transactions_total: IntCounterVec,
    transaction_latency: Histogram,
}

impl Metrics {
    /// Creates the collectors and registers them in a fresh registry.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let dispatches_total = IntCounterVec::new(
            Opts::new("vaultrpc_dispatches_total", "Dispatches by final outcome"),
            &["outcome"],
        )?;
        let dispatch_latency = Histogram::with_opts(
            HistogramOpts::new(
                "vaultrpc_dispatch_latency_seconds",
                "Wall time of a dispatch, retries included",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
        )?;
        let transactions_total = IntCounterVec::new(
            Opts::new("vaultrpc_transactions_total", "Vault transactions by operation and status"),
            &["operation", "status"],
        )?;
        let transaction_latency = Histogram::with_opts(
            HistogramOpts::new(
                "vaultrpc_transaction_latency_seconds",
                "Wall time from prepare to executed effects",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
        )?;

        registry.register(Box::new(dispatches_total.clone()))?;
        registry.register(Box::new(dispatch_latency.clone()))?;
        registry.register(Box::new(transactions_total.clone()))?;
        registry.register(Box::new(transaction_latency.clone()))?;

        Ok(Self {
            registry,
            dispatches_total,
            dispatch_latency,
            transactions_total,
            transaction_latency,
        })
    }

    /// Counts one finished dispatch.
    pub fn record_dispatch(&self, outcome: &Outcome, elapsed: Duration) {
        self.dispatches_total
            .with_label_values(&[outcome.label()])
            .inc();
        self.dispatch_latency.observe(elapsed.as_secs_f64());
    }

    /// Counts one finished transaction submission.
    pub fn record_transaction(
        &self,
        operation: OperationKind,
        status: TransactionStatus,
        elapsed: Duration,
    ) {
        let operation = operation.to_string();
        self.transactions_total
            .with_label_values(&[operation.as_str(), status.as_str()])
            .inc();
        self.transaction_latency.observe(elapsed.as_secs_f64());
    }

    /// Dispatches recorded with the given outcome label.
    pub fn dispatch_count(&self, outcome: &str) -> u64 {
        self.dispatches_total.with_label_values(&[outcome]).get()
    }

    /// Dispatches observed by the latency histogram.
    pub fn dispatch_latency_samples(&self) -> u64 {
        self.dispatch_latency.get_sample_count()
    }

    /// Transactions recorded for `operation` with `status`.
    pub fn transaction_count(&self, operation: OperationKind, status: TransactionStatus) -> u64 {
        let operation = operation.to_string();
        self.transactions_total
            .with_label_values(&[operation.as_str(), status.as_str()])
            .get()
    }

    /// Transactions observed by the latency histogram.
    pub fn transaction_latency_samples(&self) -> u64 {
        self.transaction_latency.get_sample_count()
    }

    /// The registry holding every collector, for exposition by the caller.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Renders all collectors in the Prometheus text format.
    pub fn encode(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::metrics(e.to_string()))
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("dispatches", &self.dispatch_latency.get_sample_count())
            .field("transactions", &self.transaction_latency.get_sample_count())
            .finish_non_exhaustive()
    }
}
