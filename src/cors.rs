//! CORS headers injected into every synthesized response.

use crate::config::CorsConfig;
use crate::edge::EdgeHeaders;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";

/// Lower-cased names of the three injected headers.
pub const CORS_HEADER_NAMES: [&str; 3] = [
    "access-control-allow-origin",
    "access-control-allow-methods",
    "access-control-allow-headers",
];

/// Overwrite the three CORS headers, whatever the upstream sent.
pub fn apply_cors(headers: &mut EdgeHeaders, cors: &CorsConfig) {
    headers.insert(ALLOW_ORIGIN, cors.allow_origin.as_str());
    headers.insert(ALLOW_METHODS, cors.allow_methods.as_str());
    headers.insert(ALLOW_HEADERS, cors.allow_headers.as_str());
}
