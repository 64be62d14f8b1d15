//! Sui vault client.
//!
//! Composes request validation, dispatch and classification into typed
//! ledger operations. Transactions go through three steps: the node builds
//! unsigned bytes from a validated [`OperationRequest`], the configured
//! [`Signer`] signs them, and the signed block is submitted for execution.
//! Signing needs no node, so bytes can be signed offline with
//! [`SuiClient::sign_prepared`] and submitted later with [`SuiClient::submit`].
//! [`SuiClient::execute`] runs all three and records the transaction in the
//! dispatcher's [`Metrics`](vaultrpc_core::metrics::Metrics).
//!
//! # Example
//!
//! ```rust,no_run
//! use vaultrpc_sui::SuiClient;
//!
//! # async fn example() -> vaultrpc_core::Result<()> {
//! let client = SuiClient::from_env()?;
//! let checkpoint = client.latest_checkpoint_sequence_number().await?;
//! let gas_price = client.reference_gas_price().await?;
//! println!("checkpoint {checkpoint}, gas price {gas_price}");
//! # Ok(())
//! # }
//! ```

use crate::config::SuiConfig;
use crate::methods;
use crate::parser;
use crate::types::{
    ExecutionStatus, SignedTransaction, TransactionBytes, TransactionResponse, VaultInfo,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use vaultrpc_core::config::{EnvVars, RpcConfig};
use vaultrpc_core::dispatcher::Dispatcher;
use vaultrpc_core::error::{ContextExt, Error, Result};
use vaultrpc_core::metrics::TransactionStatus;
use vaultrpc_core::signer::Signer;
use vaultrpc_core::types::{Address, OperationKind, OperationRequest};

/// Client for the vault package on a Sui full node.
///
/// Cheap to clone; clones share the dispatcher and its connection pool.
#[derive(Debug, Clone)]
pub struct SuiClient {
    dispatcher: Arc<Dispatcher>,
    config: SuiConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl SuiClient {
    /// Creates a client over an existing dispatcher.
    pub fn new(dispatcher: Arc<Dispatcher>, config: SuiConfig) -> Self {
        Self {
            dispatcher,
            config,
            signer: None,
        }
    }

    /// Creates a client with its own HTTP dispatcher.
    pub fn connect(rpc: RpcConfig, config: SuiConfig) -> Result<Self> {
        config.validate()?;
        let dispatcher = Dispatcher::new(rpc)?;
        Ok(Self::new(Arc::new(dispatcher), config))
    }

    /// Creates a client from `VAULTRPC_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let env = EnvVars::from_env();
        let rpc = RpcConfig::from_env_vars(&env)?;
        let config = SuiConfig::from_env_vars(&env)?;
        Self::connect(rpc, config)
    }

    /// Attaches the signer used for transactions. Its address is the sender.
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// The shared dispatcher.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// The client configuration.
    pub fn config(&self) -> &SuiConfig {
        &self.config
    }

    /// Sender address, if a signer is attached.
    pub fn sender(&self) -> Option<&Address> {
        self.signer.as_ref().map(|signer| signer.address())
    }

    async fn query(&self, method: &'static str, params: Vec<Value>) -> Result<Value> {
        self.dispatcher
            .request(method, params)
            .await
            .into_result()
            .with_context(|| format!("{method} failed"))
    }

    fn package_id(&self) -> Result<&Address> {
        self.config
            .package_id
            .as_ref()
            .ok_or_else(|| {
                Error::not_configured("vault package id (VAULTRPC_PACKAGE_ID) is not set")
            })
    }

    fn signer(&self) -> Result<&Arc<dyn Signer>> {
        self.signer
            .as_ref()
            .ok_or_else(|| Error::not_configured("no signer attached; sender address is unknown"))
    }

    // ============================================================================
    // Read-only Queries
    // ============================================================================

    /// Sequence number of the latest checkpoint.
    #[instrument(skip(self))]
    pub async fn latest_checkpoint_sequence_number(&self) -> Result<u64> {
        let value = self
            .query(methods::GET_LATEST_CHECKPOINT_SEQUENCE_NUMBER, vec![])
            .await?;
        parser::parse_u64(&value, "checkpoint")
    }

    /// Reference gas price of the current epoch, in MIST.
    #[instrument(skip(self))]
    pub async fn reference_gas_price(&self) -> Result<u64> {
        let value = self.query(methods::GET_REFERENCE_GAS_PRICE, vec![]).await?;
        parser::parse_u64(&value, "gas_price")
    }

    /// Returns `true` if the node answers a checkpoint query.
    pub async fn is_connected(&self) -> bool {
        match self.latest_checkpoint_sequence_number().await {
            Ok(_) => true,
            Err(e) => {
                warn!(endpoint = %self.dispatcher.endpoint(), error = %e, "Node is unreachable");
                false
            }
        }
    }

    /// Reads a vault object.
    #[instrument(skip(self), fields(vault = %vault_id))]
    pub async fn get_vault(&self, vault_id: &Address) -> Result<VaultInfo> {
        let options = json!({"showContent": true, "showType": true});
        let value = self
            .query(methods::GET_OBJECT, vec![json!(vault_id), options])
            .await?;
        parser::parse_vault(vault_id, &value)
    }

    /// Total value locked in a vault, in MIST.
    pub async fn get_vault_balance(&self, vault_id: &Address) -> Result<u64> {
        let vault = self.get_vault(vault_id).await?;
        Ok(vault.total_value)
    }

    // ============================================================================
    // Transactions
    // ============================================================================

    /// Asks the node to build unsigned transaction bytes for `request`.
    #[instrument(skip(self, request), fields(operation = %request.kind()))]
    pub async fn prepare(&self, request: &OperationRequest) -> Result<TransactionBytes> {
        let sender = self.signer()?.address();
        let params = vec![
            json!(sender),
            json!(request.target()),
            json!(request.kind().module()),
            json!(request.kind().function()),
            json!(request.type_arguments()),
            Value::Array(request.arguments_json()),
            Value::Null,
            json!(self.config.gas_budget.to_string()),
        ];
        let value = self.query(methods::MOVE_CALL, params).await?;
        let bytes = parser::parse_transaction_bytes(&value)?;
        debug!(len = bytes.tx_bytes.len(), "Transaction bytes built");
        Ok(bytes)
    }

    /// Signs prepared bytes with the attached signer. Makes no network call.
    pub async fn sign_prepared(&self, bytes: &TransactionBytes) -> Result<SignedTransaction> {
        let signature = self
            .signer()?
            .sign(&bytes.tx_bytes)
            .await
            .context("Failed to sign transaction")?;
        Ok(SignedTransaction {
            tx_bytes: bytes.tx_bytes.clone(),
            signatures: vec![signature.signature],
        })
    }

    /// Submits a signed transaction and waits for local execution.
    ///
    /// Without an idempotency key the submission is attempted once; with
    /// one it may be retried on transport failures. An aborted transaction
    /// is reported as [`Error::ExecutionFailed`].
    #[instrument(skip(self, signed, idempotency_key))]
    pub async fn submit(
        &self,
        signed: &SignedTransaction,
        idempotency_key: Option<&str>,
    ) -> Result<TransactionResponse> {
        let params = vec![
            json!(signed.tx_bytes),
            json!(signed.signatures),
            json!({"showEffects": true, "showEvents": true}),
            json!(methods::WAIT_FOR_LOCAL_EXECUTION),
        ];
        let mut call = self
            .dispatcher
            .call(methods::EXECUTE_TRANSACTION_BLOCK, params);
        if let Some(key) = idempotency_key {
            call = call.with_idempotency_key(key);
        }

        let value = self
            .dispatcher
            .dispatch(call, self.dispatcher.default_options())
            .await
            .into_result()
            .context("sui_executeTransactionBlock failed")?;
        let response = parser::parse_transaction_response(&value)?;

        if let ExecutionStatus::Failure { error } = &response.status {
            warn!(digest = %response.digest, error = %error, "Transaction aborted");
            return Err(Error::execution_failed(format!(
                "transaction {} aborted: {error}",
                response.digest
            )));
        }

        info!(digest = %response.digest, "Transaction executed");
        Ok(response)
    }

    /// Builds, signs and executes `request`, recording the result in
    /// `vaultrpc_transactions_total`.
    #[instrument(skip(self, request, idempotency_key), fields(operation = %request.kind()))]
    pub async fn execute(
        &self,
        request: &OperationRequest,
        idempotency_key: Option<&str>,
    ) -> Result<TransactionResponse> {
        let started = Instant::now();
        let result = self.prepare_sign_submit(request, idempotency_key).await;

        let status = match &result {
            Ok(_) => TransactionStatus::Executed,
            Err(e) if matches!(e.root_cause(), Error::ExecutionFailed(_)) => {
                TransactionStatus::Aborted
            }
            Err(_) => TransactionStatus::Failed,
        };
        self.dispatcher
            .metrics()
            .record_transaction(request.kind(), status, started.elapsed());
        result
    }

    async fn prepare_sign_submit(
        &self,
        request: &OperationRequest,
        idempotency_key: Option<&str>,
    ) -> Result<TransactionResponse> {
        let bytes = self.prepare(request).await?;
        let signed = self.sign_prepared(&bytes).await?;
        self.submit(&signed, idempotency_key).await
    }

    // ============================================================================
    // Vault Operations
    // ============================================================================

    /// Validated `vault::deposit` request against the configured package.
    pub fn deposit_request(
        &self,
        vault_id: &str,
        coin_id: &str,
        amount: u64,
    ) -> Result<OperationRequest> {
        let request = OperationRequest::builder(OperationKind::Deposit)
            .target(self.package_id()?.as_str())
            .argument(vault_id)
            .argument(coin_id)
            .argument(amount)
            .type_argument(self.config.coin_type.as_str())
            .build()?;
        Ok(request)
    }

    /// Validated `vault::withdraw` request against the configured package.
    pub fn withdraw_request(&self, vault_id: &str, shares: u64) -> Result<OperationRequest> {
        let request = OperationRequest::builder(OperationKind::Withdraw)
            .target(self.package_id()?.as_str())
            .argument(vault_id)
            .argument(shares)
            .type_argument(self.config.coin_type.as_str())
            .build()?;
        Ok(request)
    }

    /// Validated `strategy::execute` request against the configured package.
    pub fn strategy_request(&self, strategy_id: &str, vault_id: &str) -> Result<OperationRequest> {
        let request = OperationRequest::builder(OperationKind::StrategyExecute)
            .target(self.package_id()?.as_str())
            .argument(strategy_id)
            .argument(vault_id)
            .build()?;
        Ok(request)
    }

    /// Deposits `amount` from `coin_id` into a vault.
    pub async fn deposit(
        &self,
        vault_id: &str,
        coin_id: &str,
        amount: u64,
        idempotency_key: Option<&str>,
    ) -> Result<TransactionResponse> {
        let request = self.deposit_request(vault_id, coin_id, amount)?;
        self.execute(&request, idempotency_key).await
    }

    /// Redeems `shares` from a vault.
    pub async fn withdraw(
        &self,
        vault_id: &str,
        shares: u64,
        idempotency_key: Option<&str>,
    ) -> Result<TransactionResponse> {
        let request = self.withdraw_request(vault_id, shares)?;
        self.execute(&request, idempotency_key).await
    }

    /// Runs a strategy against a vault.
    pub async fn execute_strategy(
        &self,
        strategy_id: &str,
        vault_id: &str,
        idempotency_key: Option<&str>,
    ) -> Result<TransactionResponse> {
        let request = self.strategy_request(strategy_id, vault_id)?;
        self.execute(&request, idempotency_key).await
    }
}
