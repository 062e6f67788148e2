//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Base URLs parse and carry a host
//! - Prefix shapes and a non-zero timeout
//! - Every rule pattern compiles
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::EdgeConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.{field}: invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl {
        field: &'static str,
        url: String,
        reason: String,
    },

    #[error("upstream.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("routing.prefix must start and end with '/', got `{0}`")]
    InvalidPrefix(String),

    #[error("routing.api_prefix must be non-empty and end with '/', got `{0}`")]
    InvalidApiPrefix(String),

    #[error("routing.rules must contain at least one rule")]
    NoRules,

    #[error("routing rule `{label}` has an invalid pattern: {reason}")]
    InvalidPattern { label: String, reason: String },
}

/// Parse an upstream base URL, requiring an http(s) scheme and a host.
pub fn parse_base_url(field: &'static str, raw: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidBaseUrl {
        field,
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = parse_base_url("sdk_base_url", &config.upstream.sdk_base_url) {
        errors.push(e);
    }
    if let Err(e) = parse_base_url("api_base_url", &config.upstream.api_base_url) {
        errors.push(e);
    }
    if config.upstream.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let prefix = &config.routing.prefix;
    if !prefix.starts_with('/') || !prefix.ends_with('/') {
        errors.push(ValidationError::InvalidPrefix(prefix.clone()));
    }
    let api_prefix = &config.routing.api_prefix;
    if api_prefix.is_empty() || !api_prefix.ends_with('/') {
        errors.push(ValidationError::InvalidApiPrefix(api_prefix.clone()));
    }

    if config.routing.rules.is_empty() {
        errors.push(ValidationError::NoRules);
    }
    for rule in &config.routing.rules {
        if let Err(e) = regex::Regex::new(&rule.pattern) {
            errors.push(ValidationError::InvalidPattern {
                label: rule.label.clone(),
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
