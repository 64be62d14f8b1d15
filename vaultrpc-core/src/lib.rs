//! vaultrpc core library
//!
//! Validates vault operation requests, dispatches JSON-RPC 2.0 calls to a
//! ledger full node, and classifies every response into a closed
//! [`Outcome`](rpc::Outcome).
//!
//! # Features
//!
//! - **Validated requests**: [`OperationRequest`] values can only exist in a valid state
//! - **Bounded dispatch**: one deadline per call, retries included, over a shared connection pool
//! - **Safe retries**: only transport failures, only for read-only or idempotency-keyed calls
//! - **Closed outcomes**: success, protocol error, transport error, timeout, cancellation
//! - **Metrics**: dispatch and transaction counters with latency histograms, in Prometheus format
//!
//! # Example
//!
//! ```rust,no_run
//! use vaultrpc_core::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let request = OperationRequest::builder(OperationKind::Withdraw)
//!     .target("0x1234567890abcdef1234567890abcdef12345678")
//!     .argument("0xabcdef1234567890abcdef1234567890abcdef12")
//!     .argument(500_000_u64)
//!     .build()?;
//!
//! let dispatcher = Dispatcher::new(RpcConfig::from_env()?)?;
//! let outcome = dispatcher
//!     .request("sui_getObject", vec![request.arguments()[0].to_json()])
//!     .await;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_truncation)]

pub use serde;
pub use serde_json;

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pool;
pub mod retry_strategy;
pub mod rpc;
pub mod signer;
pub mod transport;
pub mod types;

pub use config::RpcConfig;
pub use dispatcher::{DispatchOptions, Dispatcher};
pub use error::{ContextExt, Error, Result, TransportError, TransportErrorKind, ValidationError};
pub use metrics::{Metrics, TransactionStatus};
pub use rpc::{Outcome, RawResponse, RequestId, RpcCall};
pub use signer::{Signature, SignatureScheme, Signer};
pub use types::{
    Address, Amount, Argument, OperationKind, OperationRequest, OperationRequestBuilder,
    TransactionDigest,
};
pub use tokio_util::sync::CancellationToken;

/// Prelude module for convenient imports
///
/// ```rust
/// use vaultrpc_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::RpcConfig;
    pub use crate::dispatcher::{DispatchOptions, Dispatcher};
    pub use crate::error::{
        ConfigValidationError, ContextExt, Error, Result, TransportError, TransportErrorKind,
        ValidationError,
    };
    pub use crate::logging::{LogConfig, LogFormat, LogLevel, init_logging, try_init_logging};
    pub use crate::metrics::{Metrics, TransactionStatus};
    pub use crate::pool::ConnectionPool;
    pub use crate::retry_strategy::{RetryConfig, RetryStrategy, RetryStrategyType};
    pub use crate::rpc::{
        CallSemantics, Outcome, RawResponse, RequestId, RpcCall, classify, classify_correlated,
    };
    pub use crate::signer::{Signature, SignatureScheme, Signer};
    pub use crate::transport::{HttpTransport, Transport};
    pub use crate::types::{
        Address, Amount, Argument, OperationKind, OperationRequest, TransactionDigest,
    };
    pub use serde::{Deserialize, Serialize};
    pub use tokio_util::sync::CancellationToken;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
