use crate::config::RpcConfig;
use crate::error::{Error, Result, TransportError, TransportErrorKind};
use crate::rpc::{RawResponse, RpcCall};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::error::Error as StdError;
use std::io;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use super::Transport;

/// Header carrying the caller's idempotency key on mutating calls.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// JSON-RPC over HTTP(S) POST, backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    max_response_size: usize,
}

impl HttpTransport {
    /// Creates a transport for the configured endpoint.
    ///
    /// The client carries no overall timeout. Each attempt is bounded by the
    /// time the dispatcher has left, passed to [`Transport::send`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &RpcConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_size)
            .pool_idle_timeout(config.pool_idle_timeout)
            .gzip(true)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                Error::transport(
                    TransportErrorKind::Other,
                    format!("Failed to build HTTP client: {e}"),
                )
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            max_response_size: config.max_response_size,
        })
    }

    async fn read_body_with_limit(
        &self,
        response: Response,
    ) -> std::result::Result<Vec<u8>, RawResponse> {
        use futures_util::StreamExt;

        let max_size = self.max_response_size;

        if let Some(content_length) = response.content_length()
            && content_length > max_size as u64
        {
            warn!(
                content_length = content_length,
                max_size = max_size,
                "Response exceeds size limit (Content-Length check)"
            );
            return Err(too_large(content_length, max_size));
        }

        #[allow(clippy::cast_possible_truncation)]
        let initial_capacity = response
            .content_length()
            .map_or(8 * 1024, |len| std::cmp::min(len as usize, max_size));

        let mut stream = response.bytes_stream();
        let mut body = Vec::with_capacity(initial_capacity);

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                error!(error = %e, "Failed to read response chunk");
                map_reqwest_error(&e)
            })?;

            if body.len().saturating_add(chunk.len()) > max_size {
                warn!(max_size = max_size, "Response exceeds size limit during streaming");
                return Err(too_large((body.len() + chunk.len()) as u64, max_size));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(
        name = "http_send",
        skip(self, call),
        fields(method = %call.method(), id = %call.id(), ?timeout, status)
    )]
    async fn send(&self, call: &RpcCall, timeout: Option<Duration>) -> RawResponse {
        let mut request = self.client.post(&self.endpoint).json(&call.envelope());
        if let Some(key) = call.idempotency_key() {
            request = request.header(IDEMPOTENCY_KEY_HEADER, key);
        }
        if let Some(timeout) = timeout {
            if timeout.is_zero() {
                return RawResponse::TimedOut;
            }
            request = request.timeout(timeout);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "HTTP request send failed");
                return map_reqwest_error(&e);
            }
        };

        let status = response.status().as_u16();
        tracing::Span::current().record("status", status);

        match self.read_body_with_limit(response).await {
            Ok(body) => {
                debug!(status, body_length = body.len(), "HTTP response received");
                RawResponse::Http { status, body }
            }
            Err(raw) => raw,
        }
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn too_large(size: u64, max_size: usize) -> RawResponse {
    RawResponse::Failed(TransportError::new(
        TransportErrorKind::ResponseTooLarge,
        format!("Response size {size} bytes exceeds limit {max_size} bytes"),
    ))
}

/// Maps a `reqwest` failure onto a transport outcome.
fn map_reqwest_error(err: &reqwest::Error) -> RawResponse {
    if err.is_timeout() {
        return RawResponse::TimedOut;
    }

    let kind = if is_dns_failure(err) {
        TransportErrorKind::Dns
    } else if is_connection_reset(err) {
        TransportErrorKind::ConnectionReset
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    };

    RawResponse::Failed(TransportError::new(kind, error_chain(err)))
}

fn sources<'a>(err: &'a reqwest::Error) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    let mut next = err.source();
    std::iter::from_fn(move || {
        let current = next?;
        next = current.source();
        Some(current)
    })
}

fn is_dns_failure(err: &reqwest::Error) -> bool {
    sources(err).any(|e| {
        let msg = e.to_string().to_ascii_lowercase();
        msg.contains("dns error") || msg.contains("failed to lookup address")
    })
}

fn is_connection_reset(err: &reqwest::Error) -> bool {
    sources(err).any(|e| {
        if let Some(io) = e.downcast_ref::<io::Error>() {
            return matches!(
                io.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            );
        }
        e.to_string()
            .to_ascii_lowercase()
            .contains("connection closed before message completed")
    })
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    for source in sources(err) {
        message.push_str(": ");
        message.push_str(&source.to_string());
    }
    message
}
