//! JSON-RPC call descriptions.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// JSON-RPC protocol version sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Method-name prefixes that never change ledger state.
///
/// Anything not listed is treated as mutating.
pub const READ_ONLY_PREFIXES: &[&str] = &[
    "sui_get",
    "suix_get",
    "sui_multiGet",
    "sui_tryGet",
    "suix_query",
    "sui_dryRun",
    "sui_devInspect",
    "unsafe_",
];

/// Returns `true` if `method` is known to be free of side effects.
pub fn is_read_only_method(method: &str) -> bool {
    READ_ONLY_PREFIXES
        .iter()
        .any(|prefix| method.starts_with(prefix))
}

/// JSON-RPC correlation id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric id.
    Number(u64),
    /// String id.
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::String(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        RequestId::Number(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId::String(value.to_string())
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        RequestId::String(value)
    }
}

/// Side-effect class of a call, which decides whether it may be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallSemantics {
    /// Repeating the call cannot change ledger state.
    ReadOnly,
    /// The call may change ledger state.
    ///
    /// It is only retried when the caller supplied an idempotency key,
    /// an opaque string the caller guarantees is unique per intent.
    Mutating {
        /// Caller-supplied idempotency key
        idempotency_key: Option<String>,
    },
}

impl CallSemantics {
    /// Infers semantics from the method name.
    pub fn for_method(method: &str) -> Self {
        if is_read_only_method(method) {
            CallSemantics::ReadOnly
        } else {
            CallSemantics::Mutating {
                idempotency_key: None,
            }
        }
    }
}

/// A single JSON-RPC invocation.
///
/// Calls are consumed by dispatch, so one value maps to exactly one outcome.
///
/// ```rust
/// use vaultrpc_core::rpc::{CallSemantics, RpcCall};
///
/// let call = RpcCall::new(1, "suix_getReferenceGasPrice", vec![]);
/// assert_eq!(call.semantics(), &CallSemantics::ReadOnly);
/// assert!(call.is_retry_safe());
///
/// let call = RpcCall::new(2, "sui_executeTransactionBlock", vec![]);
/// assert!(!call.is_retry_safe());
/// assert!(call.with_idempotency_key("intent-42").is_retry_safe());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    id: RequestId,
    method: String,
    params: Vec<Value>,
    semantics: CallSemantics,
}

impl RpcCall {
    /// Creates a call, inferring its semantics from the method name.
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Vec<Value>) -> Self {
        let method = method.into();
        let semantics = CallSemantics::for_method(&method);
        Self {
            id: id.into(),
            method,
            params,
            semantics,
        }
    }

    /// Overrides the inferred semantics.
    #[must_use]
    pub fn with_semantics(mut self, semantics: CallSemantics) -> Self {
        self.semantics = semantics;
        self
    }

    /// Marks the call as mutating with the given idempotency key.
    #[must_use]
    pub fn with_idempotency_key(self, key: impl Into<String>) -> Self {
        self.with_semantics(CallSemantics::Mutating {
            idempotency_key: Some(key.into()),
        })
    }

    /// Correlation id.
    pub fn id(&self) -> &RequestId {
        &self.id
    }

    /// Method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Positional parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Side-effect class.
    pub fn semantics(&self) -> &CallSemantics {
        &self.semantics
    }

    /// The idempotency key, if one was supplied.
    pub fn idempotency_key(&self) -> Option<&str> {
        match &self.semantics {
            CallSemantics::Mutating {
                idempotency_key: Some(key),
            } => Some(key),
            _ => None,
        }
    }

    /// Returns `true` if sending the call twice has the same effect as once.
    pub fn is_retry_safe(&self) -> bool {
        match &self.semantics {
            CallSemantics::ReadOnly => true,
            CallSemantics::Mutating { idempotency_key } => idempotency_key.is_some(),
        }
    }

    /// The JSON-RPC 2.0 request envelope.
    pub fn envelope(&self) -> Value {
        json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": self.id,
            "method": self.method,
            "params": self.params,
        })
    }
}
