//! Maps raw transport results onto [`Outcome`].
//!
//! Classification is total: every [`RawResponse`] yields exactly one
//! outcome and nothing here panics on hostile input.
//!
//! | input                                          | outcome                          |
//! |------------------------------------------------|----------------------------------|
//! | 2xx, well-formed `error` object                | `ProtocolError` (wins over `result`) |
//! | 2xx, `result` member (may be `null`)           | `Success`                        |
//! | non-2xx, well-formed `error` object            | `ProtocolError`                  |
//! | non-2xx, anything else                         | `TransportError(Status(code))`   |
//! | 2xx, unparseable or partial body               | `TransportError(MalformedBody)`  |
//! | transport failure                              | `TransportError(kind)`           |
//! | transport deadline                             | `Timeout`                        |

use crate::error::{TransportError, TransportErrorKind};
use crate::rpc::{Outcome, RequestId};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

const BODY_PREVIEW_SIZE: usize = 200;

/// What a transport produced for one attempt, before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// An HTTP response was received in full.
    Http {
        /// HTTP status code
        status: u16,
        /// Raw body bytes
        body: Vec<u8>,
    },
    /// No response could be obtained.
    Failed(TransportError),
    /// The transport gave up waiting.
    TimedOut,
}

impl RawResponse {
    /// Builds an HTTP response from a JSON body.
    pub fn json(status: u16, body: &Value) -> Self {
        RawResponse::Http {
            status,
            body: body.to_string().into_bytes(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Classifies a raw response without checking its correlation id.
pub fn classify(raw: RawResponse) -> Outcome {
    classify_inner(raw, None)
}

/// Classifies a raw response, rejecting bodies whose `id` does not match.
///
/// A `null` or absent id is accepted: nodes send `null` when they could not
/// read the request id.
///
/// ```rust
/// use serde_json::json;
/// use vaultrpc_core::rpc::{Outcome, RawResponse, RequestId, classify_correlated};
///
/// let raw = RawResponse::json(200, &json!({"jsonrpc": "2.0", "id": 1, "result": "42"}));
/// assert!(classify_correlated(raw, &RequestId::Number(1)).is_success());
///
/// let raw = RawResponse::json(200, &json!({"jsonrpc": "2.0", "id": 2, "result": "42"}));
/// assert!(matches!(
///     classify_correlated(raw, &RequestId::Number(1)),
///     Outcome::TransportError(_)
/// ));
/// ```
pub fn classify_correlated(raw: RawResponse, expected: &RequestId) -> Outcome {
    classify_inner(raw, Some(expected))
}

fn classify_inner(raw: RawResponse, expected: Option<&RequestId>) -> Outcome {
    match raw {
        RawResponse::Http { status, body } => classify_http(status, &body, expected),
        RawResponse::Failed(err) => Outcome::TransportError(err),
        RawResponse::TimedOut => Outcome::Timeout,
    }
}

fn classify_http(status: u16, body: &[u8], expected: Option<&RequestId>) -> Outcome {
    let success = (200..300).contains(&status);

    let Some(object) = parse_object(body) else {
        return if success {
            malformed(status, body, "body is not a JSON object")
        } else {
            status_error(status, body)
        };
    };

    if let Some(expected) = expected
        && let Some(id) = object.get("id")
        && !id.is_null()
        && !id_matches(id, expected)
    {
        warn!(expected = %expected, received = %id, "Response id does not match request");
        return Outcome::TransportError(TransportError::malformed(format!(
            "response id {id} does not match request id {expected}"
        )));
    }

    match object.get("error") {
        Some(Value::Null) | None => {}
        Some(error) => {
            return match ErrorObject::deserialize(error) {
                Ok(error) => {
                    debug!(
                        status,
                        code = error.code,
                        message = %error.message,
                        "JSON-RPC error response"
                    );
                    Outcome::ProtocolError {
                        code: error.code,
                        message: error.message,
                        data: error.data,
                    }
                }
                Err(e) if success => malformed(status, body, &format!("invalid error object: {e}")),
                Err(_) => status_error(status, body),
            };
        }
    }

    if !success {
        return status_error(status, body);
    }

    match object.get("result") {
        Some(result) => Outcome::Success(result.clone()),
        None => malformed(status, body, "neither result nor error present"),
    }
}

fn parse_object(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn id_matches(received: &Value, expected: &RequestId) -> bool {
    match (received, expected) {
        (Value::Number(n), RequestId::Number(expected)) => n.as_u64() == Some(*expected),
        (Value::String(s), RequestId::String(expected)) => s == expected,
        _ => false,
    }
}

fn preview(body: &[u8]) -> String {
    String::from_utf8_lossy(&body[..body.len().min(BODY_PREVIEW_SIZE)]).into_owned()
}

fn malformed(status: u16, body: &[u8], reason: &str) -> Outcome {
    let body_preview = preview(body);
    warn!(status, reason, body_preview = %body_preview, "Malformed JSON-RPC response");
    Outcome::TransportError(TransportError::malformed(format!(
        "{reason} (HTTP {status}): {body_preview}"
    )))
}

fn status_error(status: u16, body: &[u8]) -> Outcome {
    let body_preview = preview(body);
    warn!(status, body_preview = %body_preview, "HTTP error response");
    Outcome::TransportError(TransportError::new(
        TransportErrorKind::Status(status),
        body_preview,
    ))
}
