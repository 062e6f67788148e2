//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (preflight / prefix check / rewrite)
//!     → matcher.rs (ordered rule table gate)
//!     → Return: RoutingDecision
//!
//! Rule Compilation (at startup):
//!     RuleConfig[]
//!     → Compile patterns, keep order
//!     → Freeze as immutable Rewriter
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Deterministic: same method and path always yield the same decision
//! - First match wins (table order)

pub mod matcher;
pub mod router;

pub use matcher::{Rule, RuleTable};
pub use router::{Rewriter, RoutingDecision, Upstream};
