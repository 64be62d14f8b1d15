//! Response parsers.
//!
//! Turn node JSON into the typed views of [`crate::types`].

use crate::types::{ExecutionStatus, TransactionBytes, TransactionResponse, VaultInfo};
use serde_json::Value;
use vaultrpc_core::error::{ContextExt, Error, Result};
use vaultrpc_core::types::{Address, TransactionDigest};

// ============================================================================
// Helper Functions
// ============================================================================

/// Parses a `u64` the node may send as a decimal string or a JSON number.
pub fn parse_u64(value: &Value, field: &'static str) -> Result<u64> {
    match value {
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| Error::parse_value(field, format!("{s:?}: {e}"))),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| Error::parse_value(field, format!("{n} is not a u64"))),
        Value::Null => Err(Error::missing_field(field)),
        other => Err(Error::parse_value(field, format!("unexpected {other}"))),
    }
}

fn field<'a>(data: &'a Value, key: &'static str) -> Result<&'a Value> {
    data.get(key).filter(|v| !v.is_null()).context(key)
}

// ============================================================================
// Object Parser
// ============================================================================

/// Parses a `sui_getObject` result into [`VaultInfo`].
///
/// An `error` member (`notExists`, `deleted`) becomes `ObjectNotFound`.
pub fn parse_vault(object_id: &Address, data: &Value) -> Result<VaultInfo> {
    if let Some(error) = data.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_str).unwrap_or("unknown");
        return Err(Error::object_not_found(format!("{object_id} ({code})")));
    }

    let object = field(data, "data")?;
    let fields = field(object, "content")
        .and_then(|content| field(content, "fields"))
        .map_err(|e| e.context(format!("vault {object_id} has no Move content")))?;

    let id = match object.get("objectId").and_then(Value::as_str) {
        Some(raw) => Address::parse(raw)?,
        None => object_id.clone(),
    };

    Ok(VaultInfo {
        id,
        total_value: parse_u64(field(fields, "total_value")?, "total_value")?,
        total_shares: parse_u64(field(fields, "total_shares")?, "total_shares")?,
        strategy: field(fields, "strategy")?
            .as_str()
            .ok_or_else(|| Error::parse_value("strategy", "expected a string"))?
            .to_string(),
    })
}

// ============================================================================
// Transaction Parsers
// ============================================================================

/// Parses an `unsafe_moveCall` result.
pub fn parse_transaction_bytes(data: &Value) -> Result<TransactionBytes> {
    let bytes: TransactionBytes = serde_json::from_value(data.clone())
        .map_err(|e| Error::parse_value("txBytes", e.to_string()))?;
    if bytes.tx_bytes.is_empty() {
        return Err(Error::missing_field("txBytes"));
    }
    Ok(bytes)
}

/// Parses a `sui_executeTransactionBlock` result.
///
/// The effects status is decoded but not judged; callers decide what a
/// failure means.
pub fn parse_transaction_response(data: &Value) -> Result<TransactionResponse> {
    let digest = field(data, "digest")?
        .as_str()
        .ok_or_else(|| Error::parse_value("digest", "expected a string"))?;
    let digest = TransactionDigest::parse(digest)?;

    let status = field(data, "effects")
        .and_then(|effects| field(effects, "status"))
        .and_then(|status| {
            serde_json::from_value::<ExecutionStatus>(status.clone())
                .map_err(|e| Error::parse_value("effects.status", e.to_string()))
        })?;

    let events = data
        .get("events")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    Ok(TransactionResponse {
        digest,
        status,
        confirmed_local_execution: data.get("confirmedLocalExecution").and_then(Value::as_bool),
        events,
    })
}
