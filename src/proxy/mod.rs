//! Upstream proxying subsystem.
//!
//! # Data Flow
//! ```text
//! IncomingRequest + target URL
//!     → headers.rs (outbound header set)
//!     → body.rs (decode / serialize body)
//!     → client.rs (single timed exchange, body fully buffered)
//!     → headers.rs (allowlist + CORS + content-length)
//!     → OutgoingResponse
//! ```
//!
//! # Design Decisions
//! - No retries: timeout and transport errors are terminal
//! - No streaming: headers depend on the complete body
//! - Used only when the platform cannot fetch the origin itself

pub mod body;
pub mod client;
pub mod headers;

pub use client::UpstreamClient;
pub use headers::HeaderPolicy;
