//! Request Rewriter.
//!
//! # Responsibilities
//! - Short-circuit CORS preflights
//! - Reject paths outside the supported prefix
//! - Rewrite supported paths to the SDK or API form
//!
//! # Design Decisions
//! - Decision depends on method and path only, never headers or body
//! - Total: every input yields a decision, there is no error path
//! - Immutable after construction (shared without locks)

use crate::config::RoutingConfig;
use crate::routing::matcher::RuleTable;

/// Which upstream host a rewritten path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Sdk,
    Api,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Sdk => "sdk",
            Upstream::Api => "api",
        }
    }
}

/// Outcome of routing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Path outside the supported prefix.
    NotFound,
    /// CORS preflight to synthesize.
    Preflight,
    /// Path rewritten for the given upstream.
    Rewritten { path: String, upstream: Upstream },
}

#[derive(Debug, Clone)]
pub struct Rewriter {
    prefix: String,
    api_prefix: String,
    rules: RuleTable,
}

impl Rewriter {
    pub fn new(prefix: impl Into<String>, api_prefix: impl Into<String>, rules: RuleTable) -> Self {
        Self {
            prefix: prefix.into(),
            api_prefix: api_prefix.into(),
            rules,
        }
    }

    pub fn from_config(config: &RoutingConfig) -> Result<Self, regex::Error> {
        let rules = RuleTable::compile(&config.rules)?;
        Ok(Self::new(config.prefix.clone(), config.api_prefix.clone(), rules))
    }

    pub fn decide(&self, method: &str, path: &str) -> RoutingDecision {
        if method == "OPTIONS" {
            return RoutingDecision::Preflight;
        }

        let Some(remainder) = path.strip_prefix(self.prefix.as_str()) else {
            return RoutingDecision::NotFound;
        };

        if !self.rules.matches_any(remainder) {
            tracing::debug!(path = %path, "No routing rule accepted path");
            return RoutingDecision::NotFound;
        }

        match remainder.strip_prefix(self.api_prefix.as_str()) {
            Some(rest) => RoutingDecision::Rewritten {
                path: format!("/{rest}"),
                upstream: Upstream::Api,
            },
            None => RoutingDecision::Rewritten {
                path: format!("/{remainder}"),
                upstream: Upstream::Sdk,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;

    fn rewriter() -> Rewriter {
        Rewriter::from_config(&RoutingConfig::default()).unwrap()
    }

    fn rewritten(path: &str, upstream: Upstream) -> RoutingDecision {
        RoutingDecision::Rewritten {
            path: path.to_string(),
            upstream,
        }
    }

    #[test]
    fn test_options_is_preflight_on_any_path() {
        let r = rewriter();
        for path in ["/consent/sdk/loader.js", "/consent/api/v1", "/elsewhere", "/", ""] {
            assert_eq!(r.decide("OPTIONS", path), RoutingDecision::Preflight, "{path}");
        }
    }

    #[test]
    fn test_outside_prefix_is_not_found() {
        let r = rewriter();
        for path in ["/", "/consent", "/consentx/loader.js", "/api/consent/x", "/CONSENT/x"] {
            for method in ["GET", "POST", "HEAD"] {
                assert_eq!(r.decide(method, path), RoutingDecision::NotFound, "{method} {path}");
            }
        }
    }

    #[test]
    fn test_api_paths_strip_sub_prefix() {
        let r = rewriter();
        assert_eq!(
            r.decide("GET", "/consent/api/foo/bar"),
            rewritten("/foo/bar", Upstream::Api)
        );
        assert_eq!(r.decide("POST", "/consent/api/"), rewritten("/", Upstream::Api));
    }

    #[test]
    fn test_sdk_paths_keep_remainder() {
        let r = rewriter();
        assert_eq!(
            r.decide("GET", "/consent/sdk/loader.js"),
            rewritten("/sdk/loader.js", Upstream::Sdk)
        );
        assert_eq!(r.decide("GET", "/consent/"), rewritten("/", Upstream::Sdk));
        // `api` without the trailing slash is an SDK path.
        assert_eq!(r.decide("GET", "/consent/api"), rewritten("/api", Upstream::Sdk));
    }

    #[test]
    fn test_narrowed_rule_table_gates_paths() {
        let config = RoutingConfig {
            rules: vec![RuleConfig::new("scripts", r"\.js$")],
            ..RoutingConfig::default()
        };
        let r = Rewriter::from_config(&config).unwrap();
        assert_eq!(
            r.decide("GET", "/consent/loader.js"),
            rewritten("/loader.js", Upstream::Sdk)
        );
        assert_eq!(r.decide("GET", "/consent/style.css"), RoutingDecision::NotFound);
        assert_eq!(r.decide("OPTIONS", "/consent/style.css"), RoutingDecision::Preflight);
    }
}
