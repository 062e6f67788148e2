//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EdgeConfig (validated, immutable)
//!     → compiled once into the EdgeHandler
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at process start and never mutated
//! - All fields have defaults; the defaults are the production values
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    CorsConfig, EdgeConfig, HeaderConfig, ListenerConfig, RoutingConfig, RuleConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
