//! Upstream Proxy Client.
//!
//! Issues one HTTPS request mirroring the client's method, headers and body,
//! buffers the full upstream response, and translates it into an
//! `OutgoingResponse`.

use reqwest::{Method, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::edge::{IncomingRequest, OutgoingResponse};
use crate::error::ProxyError;
use crate::proxy::body::serialize_body;
use crate::proxy::headers::{response_headers, upstream_headers, HeaderPolicy};

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    timeout: Duration,
    policy: Arc<HeaderPolicy>,
}

impl UpstreamClient {
    pub fn new(timeout: Duration, policy: HeaderPolicy) -> Result<Self, ProxyError> {
        let http = reqwest::Client::builder()
            .http1_only()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()
            .map_err(|e| ProxyError::from_transport(&e))?;

        Ok(Self {
            http,
            timeout,
            policy: Arc::new(policy),
        })
    }

    /// Fetch `target` on behalf of `request`.
    ///
    /// Connect, send and full body buffering share one deadline. On expiry the
    /// in-flight exchange is dropped, which closes the connection.
    pub async fn proxy(
        &self,
        target: &Url,
        method: &str,
        request: &IncomingRequest,
    ) -> Result<OutgoingResponse, ProxyError> {
        let host = target
            .host_str()
            .ok_or_else(|| ProxyError::InvalidTarget(target.to_string()))?;
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| ProxyError::InvalidMethod(method.to_string()))?;

        let headers = upstream_headers(request, host);
        let body = serialize_body(request.body.as_ref())?;

        let mut builder = self
            .http
            .request(method.clone(), target.clone())
            .headers(headers);
        if !body.is_empty() {
            builder = builder.body(body);
        }

        tracing::info!(
            url = %target,
            method = %method,
            port = ?target.port_or_known_default(),
            "Making upstream request"
        );

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, headers, body))
        };

        let (status, upstream, body) = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(parts)) => parts,
            Ok(Err(e)) => {
                let err = ProxyError::from_transport(&e);
                tracing::error!(url = %target, error = %err, "Upstream request failed");
                return Err(err);
            }
            Err(_) => {
                tracing::warn!(
                    url = %target,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Upstream request timed out"
                );
                return Err(ProxyError::RequestTimeout {
                    timeout: self.timeout,
                });
            }
        };

        tracing::info!(
            url = %target,
            status = status.as_u16(),
            body_len = body.len(),
            "Received upstream response"
        );

        Ok(OutgoingResponse {
            status: status.as_u16(),
            status_description: status_description(status),
            headers: response_headers(&upstream, body.len(), &self.policy),
            body,
        })
    }
}

/// Reason phrase for `status`; codes without one fall back to the numeric code.
fn status_description(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}
