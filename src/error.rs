//! Error definitions.

use std::error::Error as _;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the upstream proxy client.
///
/// None of these produce a partial response: the caller either gets a complete
/// `OutgoingResponse` or one of these.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No complete response within the deadline. The connection was dropped.
    #[error("Upstream request timed out after {}ms", timeout.as_millis())]
    RequestTimeout { timeout: Duration },

    /// Connection or protocol failure reported by the transport.
    #[error("Upstream error ({code}): {message}")]
    Upstream { code: String, message: String },

    /// Request body could not be decoded with its declared encoding.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Method token is not a valid HTTP method.
    #[error("Invalid request method: {0}")]
    InvalidMethod(String),

    /// Target URL cannot be requested (no host, unsupported scheme).
    #[error("Invalid upstream target: {0}")]
    InvalidTarget(String),
}

impl ProxyError {
    /// Classify a transport error into an `Upstream` error.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connect"
        } else if err.is_redirect() {
            "redirect"
        } else if err.is_body() {
            "body"
        } else if err.is_decode() {
            "decode"
        } else if err.is_request() {
            "request"
        } else if err.is_builder() {
            "builder"
        } else {
            "unknown"
        };

        // reqwest's Display stops at the outermost layer; the cause chain carries the detail.
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        ProxyError::Upstream {
            code: code.to_string(),
            message,
        }
    }
}

/// Errors reading a CDN event.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Malformed edge event: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Edge event carries no records")]
    NoRecords,
}
