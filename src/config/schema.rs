//! Configuration schema definitions.
//!
//! Every default reproduces the production values, so an absent config file
//! means production behavior.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge shim.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Local listener used by `serve`.
    pub listener: ListenerConfig,

    /// Upstream hosts and client deadline.
    pub upstream: UpstreamConfig,

    /// Path prefixes and the rule table.
    pub routing: RoutingConfig,

    /// Response header allowlist and CORS values.
    pub headers: HeaderConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest request body accepted from clients, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// The two upstream hosts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL for SDK assets.
    pub sdk_base_url: String,

    /// Base URL for API calls.
    pub api_base_url: String,

    /// Deadline for a complete upstream exchange, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            sdk_base_url: "https://sdk.privacy-center.org".to_string(),
            api_base_url: "https://api.privacy-center.org".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Prefix every supported path starts with.
    pub prefix: String,

    /// Sub-prefix (after `prefix`) that selects the API upstream.
    pub api_prefix: String,

    /// Ordered rule table evaluated against the path after `prefix`.
    pub rules: Vec<RuleConfig>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            prefix: "/consent/".to_string(),
            api_prefix: "api/".to_string(),
            // Accept all SDK paths to tolerate upstream structure changes.
            rules: vec![
                RuleConfig::new("sdk-any", "^.*$"),
                RuleConfig::new("api", "^api/.*$"),
            ],
        }
    }
}

/// A single `(pattern, label)` routing rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Name logged when the rule is evaluated.
    pub label: String,

    /// Regular expression matched against the path remainder.
    pub pattern: String,
}

impl RuleConfig {
    pub fn new(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: pattern.into(),
        }
    }
}

/// Response header policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Upstream response headers passed through (compared lower-cased).
    pub allowed_response_headers: Vec<String>,

    /// Values of the always-injected CORS headers.
    pub cors: CorsConfig,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            allowed_response_headers: [
                "cache-control",
                "content-language",
                "content-type",
                "content-length",
                "expires",
                "last-modified",
                "pragma",
                "set-cookie",
                "vary",
                "access-control-allow-origin",
                "access-control-allow-methods",
                "access-control-allow-headers",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            cors: CorsConfig::default(),
        }
    }
}

/// CORS header values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: "GET, POST, PUT, DELETE, OPTIONS".to_string(),
            allow_headers: "Content-Type, Authorization, X-Requested-With".to_string(),
        }
    }
}
