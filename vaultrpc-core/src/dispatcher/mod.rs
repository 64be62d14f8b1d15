//! The dispatcher: sends calls, enforces deadlines, retries what is safe.
//!
//! ```rust,no_run
//! use vaultrpc_core::config::RpcConfig;
//! use vaultrpc_core::dispatcher::Dispatcher;
//! use vaultrpc_core::rpc::Outcome;
//!
//! # async fn example() -> vaultrpc_core::Result<()> {
//! let dispatcher = Dispatcher::new(RpcConfig::new("https://fullnode.testnet.sui.io:443"))?;
//! let call = dispatcher.call("suix_getReferenceGasPrice", vec![]);
//! match dispatcher.dispatch(call, dispatcher.default_options()).await {
//!     Outcome::Success(price) => println!("gas price {price}"),
//!     other => println!("failed: {other}"),
//! }
//! # Ok(())
//! # }
//! ```

mod options;
mod retry;

pub use options::DispatchOptions;

use crate::config::RpcConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::pool::ConnectionPool;
use crate::retry_strategy::RetryStrategy;
use crate::rpc::{Outcome, RequestId, RpcCall};
use crate::transport::{HttpTransport, Transport};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Sends JSON-RPC calls and turns every one into exactly one [`Outcome`].
///
/// `Dispatcher` is `Send + Sync`; share it with `Arc`. Concurrent dispatches
/// are independent, attempts within one dispatch are sequential.
#[derive(Debug)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    pool: ConnectionPool,
    retry_strategy: RetryStrategy,
    defaults: DispatchOptions,
    metrics: Arc<Metrics>,
    next_id: AtomicU64,
}

impl Dispatcher {
    /// Creates a dispatcher talking HTTP to the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: RpcConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Self::build(&config, Arc::new(transport))
    }

    /// Creates a dispatcher over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_transport(config: &RpcConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Self::build(config, transport)
    }

    fn build(config: &RpcConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self {
            transport,
            pool: ConnectionPool::new(config.pool_size),
            retry_strategy: RetryStrategy::new(config.retry_config.clone()),
            defaults: DispatchOptions::new(config.timeout, config.retry_config.max_retries),
            metrics: Arc::new(Metrics::new()?),
            next_id: AtomicU64::new(1),
        })
    }

    /// Records into `metrics` instead of this dispatcher's own collectors.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Builds a call with a fresh id, semantics inferred from `method`.
    pub fn call(&self, method: impl Into<String>, params: Vec<Value>) -> RpcCall {
        RpcCall::new(self.next_id(), method, params)
    }

    /// Allocates the next request id.
    pub fn next_id(&self) -> RequestId {
        RequestId::Number(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Options derived from the configuration.
    pub fn default_options(&self) -> DispatchOptions {
        self.defaults
    }

    /// Dispatches `call` under `options`.
    pub async fn dispatch(&self, call: RpcCall, options: DispatchOptions) -> Outcome {
        self.dispatch_with_cancel(call, options, CancellationToken::new())
            .await
    }

    /// Dispatches `call`, returning [`Outcome::Cancelled`] as soon as `cancel` fires.
    ///
    /// The in-flight attempt is dropped on cancellation or timeout, which
    /// releases its pool slot. A timeout too large to represent as an instant
    /// leaves the dispatch without a deadline.
    #[instrument(
        name = "rpc_dispatch",
        skip(self, call, options, cancel),
        fields(
            method = %call.method(),
            id = %call.id(),
            timeout_ms = %options.timeout.as_millis(),
            max_retries = options.max_retries
        )
    )]
    pub async fn dispatch_with_cancel(
        &self,
        call: RpcCall,
        options: DispatchOptions,
        cancel: CancellationToken,
    ) -> Outcome {
        let started = Instant::now();
        let deadline = started.checked_add(options.timeout);

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Outcome::Cancelled,
            result = tokio::time::timeout(
                options.timeout,
                self.execute_with_retry(&call, options.max_retries, deadline),
            ) => result.unwrap_or(Outcome::Timeout),
        };

        match &outcome {
            Outcome::Timeout => info!(
                timeout_ms = %options.timeout.as_millis(),
                "Dispatch timed out (including retries)"
            ),
            Outcome::Cancelled => info!("Dispatch cancelled"),
            _ => {}
        }
        self.metrics.record_dispatch(&outcome, started.elapsed());
        outcome
    }

    /// Builds and dispatches a call with the default options.
    pub async fn request(&self, method: impl Into<String>, params: Vec<Value>) -> Outcome {
        let call = self.call(method, params);
        self.dispatch(call, self.defaults).await
    }

    /// The connection pool shared by all dispatches.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Collectors updated by every dispatch.
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// The configured retry strategy.
    pub fn retry_strategy(&self) -> &RetryStrategy {
        &self.retry_strategy
    }

    /// The endpoint of the underlying transport.
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}

#[cfg(test)]
mod tests;
