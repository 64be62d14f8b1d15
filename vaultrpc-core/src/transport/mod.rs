//! Transport seam between the dispatcher and the network.
//!
//! A [`Transport`] performs exactly one attempt and reports what happened
//! as a [`RawResponse`]. It never retries and never interprets the body;
//! both are the dispatcher's job. Tests substitute scripted transports.
//!
//! The dispatcher passes the time left until its deadline with every
//! attempt. `None` means the dispatch has no deadline.

mod http;

pub use http::{HttpTransport, IDEMPOTENCY_KEY_HEADER};

use crate::rpc::{RawResponse, RpcCall};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Sends one JSON-RPC call and returns the raw result.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Performs a single attempt for `call`, giving up after `timeout`.
    async fn send(&self, call: &RpcCall, timeout: Option<Duration>) -> RawResponse;

    /// Endpoint description, used in log fields.
    fn endpoint(&self) -> &str;
}
