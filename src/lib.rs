//! Edge routing shim for a consent-management SDK and its API.

pub mod config;
pub mod cors;
pub mod edge;
pub mod error;
pub mod handler;
pub mod http;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use config::EdgeConfig;
pub use edge::{HandlerOutput, IncomingRequest, OutgoingResponse};
pub use error::ProxyError;
pub use handler::EdgeHandler;
pub use http::HttpServer;
pub use routing::RoutingDecision;
