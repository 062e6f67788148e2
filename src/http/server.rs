//! Local HTTP server playing the edge platform.
//!
//! # Responsibilities
//! - Convert each HTTP request into an `IncomingRequest`
//! - Answer it through `EdgeHandler::respond` (manual proxy mode)
//! - Map proxy failures to the platform's generic error responses
//! - Graceful shutdown on the caller's signal

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, EdgeConfig};
use crate::edge::{IncomingRequest, OutgoingResponse, RequestBody};
use crate::error::ProxyError;
use crate::handler::EdgeHandler;

#[derive(Clone)]
struct AppState {
    handler: EdgeHandler,
    max_body_bytes: usize,
}

/// HTTP front for the edge handler.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new server; fails if the configuration does not compile.
    pub fn new(config: EdgeConfig) -> Result<Self, ConfigError> {
        let handler = EdgeHandler::new(&config)?;
        let state = AppState {
            handler,
            max_body_bytes: config.listener.max_body_bytes,
        };
        let router = Self::build_router(state);
        Ok(Self { router })
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(edge_handler))
            .route("/", any(edge_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving or for driving requests directly.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn edge_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let incoming = match to_incoming(request, state.max_body_bytes).await {
        Ok(incoming) => incoming,
        Err(response) => return response,
    };

    match state.handler.respond(&incoming).await {
        Ok(response) => to_http_response(response),
        Err(err) => {
            tracing::error!(uri = %incoming.uri, error = %err, "Edge request failed");
            error_response(&err)
        }
    }
}

/// Build the platform's view of an HTTP request.
pub async fn to_incoming(request: Request<Body>, max_body_bytes: usize) -> Result<IncomingRequest, Response> {
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    let (parts, body) = request.into_parts();

    let mut incoming = IncomingRequest::new(parts.method.as_str(), parts.uri.path());
    incoming.querystring = parts.uri.query().map(String::from);
    incoming.client_ip = client_ip;
    for (name, value) in parts.headers.iter() {
        incoming
            .headers
            .append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
    }

    let bytes = axum::body::to_bytes(body, max_body_bytes).await.map_err(|e| {
        tracing::warn!(error = %e, "Rejecting request body");
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response()
    })?;
    if !bytes.is_empty() {
        incoming.body = Some(RequestBody::Encoded {
            data: STANDARD.encode(&bytes),
            encoding: Some("base64".to_string()),
        });
    }

    Ok(incoming)
}

/// Turn an `OutgoingResponse` into an HTTP response.
pub fn to_http_response(response: OutgoingResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = Response::builder().status(status);
    for (_, entries) in response.headers.iter() {
        for entry in entries {
            builder = builder.header(entry.key.as_str(), entry.value.as_str());
        }
    }
    builder.body(Body::from(response.body)).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Upstream response could not be re-encoded");
        StatusCode::BAD_GATEWAY.into_response()
    })
}

fn error_response(err: &ProxyError) -> Response {
    let status = match err {
        ProxyError::RequestTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        ProxyError::InvalidBody(_) | ProxyError::InvalidMethod(_) => StatusCode::BAD_REQUEST,
        ProxyError::Upstream { .. } | ProxyError::InvalidTarget(_) => StatusCode::BAD_GATEWAY,
    };
    (status, status.canonical_reason().unwrap_or_default()).into_response()
}
