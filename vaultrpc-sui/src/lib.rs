//! Sui ledger client for liquidity vaults
//!
//! Builds on `vaultrpc-core`: vault operation requests are validated there,
//! turned into Move calls here, signed by a caller-supplied
//! [`Signer`](vaultrpc_core::signer::Signer), and executed through the
//! shared [`Dispatcher`](vaultrpc_core::dispatcher::Dispatcher).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vaultrpc_core::prelude::*;
//! use vaultrpc_sui::{SuiClient, SuiConfig};
//!
//! # async fn example(signer: Arc<dyn Signer>) -> Result<()> {
//! let package = Address::parse("0x1234567890abcdef1234567890abcdef12345678")?;
//! let client = SuiClient::connect(RpcConfig::default(), SuiConfig::new(package))?
//!     .with_signer(signer);
//!
//! let vault = "0xabcdef1234567890abcdef1234567890abcdef12";
//! let coin = "0x00000000000000000000000000000000000000c0";
//! let response = client
//!     .deposit(vault, coin, 1_000_000_000, Some("deposit-2026-10-19-1"))
//!     .await?;
//! println!("executed {}", response.digest);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::return_self_not_must_use)]

pub mod client;
pub mod config;
pub mod methods;
pub mod parser;
pub mod types;

pub use client::SuiClient;
pub use config::{DEFAULT_COIN_TYPE, DEFAULT_GAS_BUDGET, SuiConfig};
pub use types::{
    ExecutionStatus, SignedTransaction, TransactionBytes, TransactionResponse, VaultInfo,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
