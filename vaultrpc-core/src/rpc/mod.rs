//! JSON-RPC call model, outcomes and response classification.

mod call;
mod classifier;
mod outcome;

pub use call::{
    CallSemantics, JSONRPC_VERSION, READ_ONLY_PREFIXES, RequestId, RpcCall, is_read_only_method,
};
pub use classifier::{RawResponse, classify, classify_correlated};
pub use outcome::Outcome;
