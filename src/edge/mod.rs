//! Edge platform message model.
//!
//! # Data Flow
//! ```text
//! CDN event JSON
//!     → event.rs (envelope, first record)
//!     → request.rs (IncomingRequest: method, uri, headers, clientIp, body)
//!     → [rewriter / proxy client]
//!     → response.rs (OutgoingResponse) or the mutated request
//!     → HandlerOutput serialized back to the CDN
//! ```
//!
//! # Design Decisions
//! - Values live for one request/response cycle only
//! - Header maps are keyed by lower-cased name, each record keeps the original-case key
//! - Unknown event fields survive a rewrite round trip

pub mod event;
pub mod headers;
pub mod request;
pub mod response;

pub use event::{EdgeEvent, HandlerOutput};
pub use headers::{EdgeHeaders, HeaderEntry};
pub use request::{IncomingRequest, RequestBody};
pub use response::OutgoingResponse;
