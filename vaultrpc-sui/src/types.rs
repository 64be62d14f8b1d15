//! Typed views of node responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vaultrpc_core::types::{Address, TransactionDigest};

/// State of a liquidity vault object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultInfo {
    /// Vault object id
    pub id: Address,
    /// Total value locked, in MIST
    pub total_value: u64,
    /// Outstanding vault shares
    pub total_shares: u64,
    /// Name of the strategy the vault runs
    pub strategy: String,
}

impl VaultInfo {
    /// Value of one share in MIST, or `None` for an empty vault.
    pub fn share_price(&self) -> Option<f64> {
        if self.total_shares == 0 {
            return None;
        }
        Some(self.total_value as f64 / self.total_shares as f64)
    }
}

/// Unsigned transaction bytes returned by `unsafe_moveCall`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBytes {
    /// Base64 BCS-encoded transaction data.
    pub tx_bytes: String,
    /// Gas coins the node selected.
    #[serde(default)]
    pub gas: Vec<Value>,
    /// Objects the transaction reads or writes.
    #[serde(default)]
    pub input_objects: Vec<Value>,
}

/// Transaction bytes together with the sender's signatures, ready to submit.
///
/// Serializable so bytes signed on an offline machine can be carried to a
/// connected one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    /// Base64 BCS-encoded transaction data, unchanged from [`TransactionBytes`].
    pub tx_bytes: String,
    /// Serialized signatures, in the order the node expects them.
    pub signatures: Vec<String>,
}

/// Effects status of an executed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// The transaction was applied.
    Success,
    /// The transaction aborted; gas was still charged.
    Failure {
        /// Abort reason reported by the node
        error: String,
    },
}

impl ExecutionStatus {
    /// Returns `true` for [`ExecutionStatus::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Success)
    }
}

/// Result of `sui_executeTransactionBlock`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Transaction digest
    pub digest: TransactionDigest,
    /// Effects status
    pub status: ExecutionStatus,
    /// Whether the node applied the effects before answering
    pub confirmed_local_execution: Option<bool>,
    /// Events emitted by the transaction
    pub events: Vec<Value>,
}

impl TransactionResponse {
    /// Returns `true` if the transaction was applied.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execution_status_serde() {
        let ok: ExecutionStatus = serde_json::from_value(json!({"status": "success"})).unwrap();
        assert!(ok.is_success());

        let failed: ExecutionStatus =
            serde_json::from_value(json!({"status": "failure", "error": "MoveAbort(1)"})).unwrap();
        assert_eq!(
            failed,
            ExecutionStatus::Failure {
                error: "MoveAbort(1)".to_string()
            }
        );
    }

    #[test]
    fn test_transaction_bytes_defaults() {
        let bytes: TransactionBytes = serde_json::from_value(json!({"txBytes": "AAAB"})).unwrap();
        assert_eq!(bytes.tx_bytes, "AAAB");
        assert!(bytes.gas.is_empty());
    }

    #[test]
    fn test_share_price() {
        let vault = VaultInfo {
            id: Address::parse("0xabcdef1234567890abcdef1234567890abcdef12").unwrap(),
            total_value: 3_000,
            total_shares: 1_000,
            strategy: "stable-lp".to_string(),
        };
        assert_eq!(vault.share_price(), Some(3.0));

        let empty = VaultInfo {
            total_shares: 0,
            ..vault
        };
        assert_eq!(empty.share_price(), None);
    }
}
