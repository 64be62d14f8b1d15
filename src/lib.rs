//! # vaultrpc
//!
//! Validated vault operation requests and JSON-RPC dispatch for Sui
//! liquidity vaults.
//!
//! ## Features
//!
//! - **Validated requests**: malformed addresses, amounts and arities never reach the network
//! - **Bounded dispatch**: one deadline per call covering every retry
//! - **Closed outcomes**: each call ends in exactly one [`Outcome`]
//! - **Vault client**: checkpoint, gas price, vault lookup, deposit, withdraw, strategy execution
//! - **Offline signing**: sign prepared bytes without a node, submit them later
//! - **Metrics**: Prometheus counters and latency histograms for dispatches and transactions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vaultrpc::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = SuiClient::from_env()?;
//!     if client.is_connected().await {
//!         let price = client.reference_gas_price().await?;
//!         println!("reference gas price: {price} MIST");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// Re-export core types and traits
pub use vaultrpc_core::{
    config::RpcConfig,
    dispatcher::{DispatchOptions, Dispatcher},
    error::{Error, Result},
    rpc::{Outcome, RequestId, RpcCall},
    types::*,
};

// Re-export the ledger client
pub use vaultrpc_sui::{SignedTransaction, SuiClient, SuiConfig, TransactionResponse, VaultInfo};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use vaultrpc_core::prelude::*;
    pub use vaultrpc_sui::{
        ExecutionStatus, SignedTransaction, SuiClient, SuiConfig, TransactionBytes,
        TransactionResponse, VaultInfo,
    };
}
