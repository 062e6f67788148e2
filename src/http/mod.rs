//! HTTP front subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request → IncomingRequest)
//!     → EdgeHandler::respond
//!     → server.rs (OutgoingResponse → HTTP response)
//!     → Send to client
//! ```
//!
//! Stands in for the CDN during local runs and integration tests.

pub mod server;

pub use server::HttpServer;
