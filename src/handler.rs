//! Edge handler: the entry point the platform invokes per request.
//!
//! Two modes:
//! - `rewrite`: origin-request mode. The platform fetches the origin itself;
//!   the handler only rewrites the path or short-circuits.
//! - `respond`: manual proxy mode. The handler performs the upstream fetch.

use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::config::validation::{parse_base_url, ValidationError};
use crate::config::{validate_config, ConfigError, CorsConfig, EdgeConfig};
use crate::edge::{HandlerOutput, IncomingRequest, OutgoingResponse};
use crate::error::ProxyError;
use crate::proxy::{HeaderPolicy, UpstreamClient};
use crate::routing::{Rewriter, RoutingDecision, Upstream};

#[derive(Debug)]
struct Inner {
    rewriter: Rewriter,
    client: UpstreamClient,
    sdk_base: Url,
    api_base: Url,
    cors: CorsConfig,
}

/// Compiled, immutable handler. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EdgeHandler {
    inner: Arc<Inner>,
}

impl EdgeHandler {
    /// Validate `config` and compile it into a handler.
    pub fn new(config: &EdgeConfig) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let sdk_base = parse_base_url("sdk_base_url", &config.upstream.sdk_base_url)
            .map_err(|e| ConfigError::Validation(vec![e]))?;
        let api_base = parse_base_url("api_base_url", &config.upstream.api_base_url)
            .map_err(|e| ConfigError::Validation(vec![e]))?;

        let rewriter = Rewriter::from_config(&config.routing).map_err(|e| {
            ConfigError::Validation(vec![ValidationError::InvalidPattern {
                label: "routing.rules".to_string(),
                reason: e.to_string(),
            }])
        })?;

        let client = UpstreamClient::new(
            Duration::from_millis(config.upstream.timeout_ms),
            HeaderPolicy::from_config(&config.headers),
        )
        .map_err(|e| ConfigError::Client(e.to_string()))?;

        tracing::debug!(
            sdk_base = %sdk_base,
            api_base = %api_base,
            prefix = %config.routing.prefix,
            rules = config.routing.rules.len(),
            "Edge handler compiled"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                rewriter,
                client,
                sdk_base,
                api_base,
                cors: config.headers.cors.clone(),
            }),
        })
    }

    pub fn decide(&self, request: &IncomingRequest) -> RoutingDecision {
        self.inner.rewriter.decide(&request.method, &request.uri)
    }

    /// Origin-request mode: rewrite the URI in place or short-circuit.
    ///
    /// Method, headers, query string and body are left untouched.
    pub fn rewrite(&self, mut request: IncomingRequest) -> HandlerOutput {
        let span = request_span(&request);
        let _guard = span.enter();

        match self.decide(&request) {
            RoutingDecision::Preflight => {
                tracing::debug!("Answering preflight");
                HandlerOutput::Respond(OutgoingResponse::preflight(&self.inner.cors))
            }
            RoutingDecision::NotFound => {
                tracing::info!(uri = %request.uri, "Path outside supported prefix");
                HandlerOutput::Respond(OutgoingResponse::not_found())
            }
            RoutingDecision::Rewritten { path, upstream } => {
                tracing::info!(
                    from = %request.uri,
                    to = %path,
                    upstream = upstream.as_str(),
                    "Rewrote request path"
                );
                request.uri = path;
                HandlerOutput::Forward(request)
            }
        }
    }

    /// Manual proxy mode: answer the request completely, fetching the upstream if needed.
    pub async fn respond(&self, request: &IncomingRequest) -> Result<OutgoingResponse, ProxyError> {
        let span = request_span(request);
        async {
            match self.decide(request) {
                RoutingDecision::Preflight => {
                    tracing::debug!("Answering preflight");
                    Ok(OutgoingResponse::preflight(&self.inner.cors))
                }
                RoutingDecision::NotFound => {
                    tracing::info!(uri = %request.uri, "Path outside supported prefix");
                    Ok(OutgoingResponse::not_found())
                }
                RoutingDecision::Rewritten { path, upstream } => {
                    let target = self.target_url(upstream, &path, request.query());
                    self.inner
                        .client
                        .proxy(&target, &request.method, request)
                        .await
                }
            }
        }
        .instrument(span)
        .await
    }

    pub fn base_url(&self, upstream: Upstream) -> &Url {
        match upstream {
            Upstream::Sdk => &self.inner.sdk_base,
            Upstream::Api => &self.inner.api_base,
        }
    }

    /// Base URL of `upstream` extended with `path` and `query`.
    pub fn target_url(&self, upstream: Upstream, path: &str, query: Option<&str>) -> Url {
        let mut url = self.base_url(upstream).clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base_path}{path}"));
        url.set_query(query);
        url
    }
}

fn request_span(request: &IncomingRequest) -> tracing::Span {
    tracing::info_span!(
        "edge_request",
        request_id = %Uuid::new_v4(),
        method = %request.method,
        uri = %request.uri,
    )
}
