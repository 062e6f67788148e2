//! Header shaping in both directions.
//!
//! # Responsibilities
//! - Outbound: copy client headers (first value, no cookies), add forwarding,
//!   host, encoding and geo headers
//! - Inbound: keep allowlisted upstream headers, force CORS, fill in
//!   `content-length` from the buffered body
//!
//! # Design Decisions
//! - Cookies never reach the upstream
//! - Framing headers are recomputed by the client, never copied
//! - Upstream names come back lower-cased; records get a canonical-case key

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_ENCODING, HOST};

use crate::config::{CorsConfig, HeaderConfig};
use crate::cors;
use crate::edge::{EdgeHeaders, IncomingRequest};

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Client headers never copied upstream.
const STRIPPED_REQUEST_HEADERS: [&str; 4] =
    ["cookie", "content-length", "transfer-encoding", "connection"];

/// CDN geo headers and the upstream names they are forwarded under.
const GEO_HEADERS: [(&str, &str); 2] = [
    ("cloudfront-viewer-country", "x-cloudfront-country"),
    ("cloudfront-viewer-region", "x-cloudfront-region"),
];

/// Which upstream response headers survive, and the CORS values forced on top.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    allowed: Vec<String>,
    cors: CorsConfig,
}

impl HeaderPolicy {
    pub fn new(allowed: impl IntoIterator<Item = impl AsRef<str>>, cors: CorsConfig) -> Self {
        Self {
            allowed: allowed
                .into_iter()
                .map(|name| name.as_ref().to_ascii_lowercase())
                .collect(),
            cors,
        }
    }

    pub fn from_config(config: &HeaderConfig) -> Self {
        Self::new(&config.allowed_response_headers, config.cors.clone())
    }

    pub fn allows(&self, lower_name: &str) -> bool {
        self.allowed.iter().any(|name| name == lower_name)
    }

    pub fn cors(&self) -> &CorsConfig {
        &self.cors
    }
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self::from_config(&HeaderConfig::default())
    }
}

/// `content-type` → `Content-Type`.
pub fn canonical_name(lower: &str) -> String {
    lower
        .split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn insert_str(headers: &mut HeaderMap, name: &'static str, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(HeaderName::from_static(name), value);
        }
        Err(_) => tracing::warn!(header = name, "Dropping header with invalid value"),
    }
}

/// Headers sent to the upstream for `request`.
pub fn upstream_headers(request: &IncomingRequest, upstream_host: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (name, entries) in request.headers.iter() {
        if STRIPPED_REQUEST_HEADERS
            .iter()
            .any(|stripped| name.eq_ignore_ascii_case(stripped))
        {
            continue;
        }
        let Some(first) = entries.first() else {
            continue;
        };
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&first.value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping header that is not valid HTTP"),
        }
    }

    if let Some(ip) = request.client_ip.as_deref() {
        insert_str(&mut headers, X_FORWARDED_FOR, ip);
    }

    match HeaderValue::from_str(upstream_host) {
        Ok(host) => {
            headers.insert(HOST, host);
        }
        Err(_) => tracing::warn!(host = %upstream_host, "Upstream host is not a valid header value"),
    }

    // The client does not decompress.
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    for (cdn_name, forwarded_name) in GEO_HEADERS {
        if let Some(value) = request.headers.first_value(cdn_name) {
            insert_str(&mut headers, forwarded_name, value);
        }
    }

    headers
}

/// Headers returned to the edge platform for an upstream response.
pub fn response_headers(upstream: &HeaderMap, body_len: usize, policy: &HeaderPolicy) -> EdgeHeaders {
    let mut headers = EdgeHeaders::new();

    for name in upstream.keys() {
        if !policy.allows(name.as_str()) {
            continue;
        }
        let key = canonical_name(name.as_str());
        for value in upstream.get_all(name) {
            headers.append(key.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
    }

    cors::apply_cors(&mut headers, policy.cors());

    if !headers.contains("content-length") && body_len > 0 {
        headers.insert("Content-Length", body_len.to_string());
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::HeaderEntry;

    fn request() -> IncomingRequest {
        IncomingRequest::new("GET", "/sdk/loader.js")
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("content-type"), "Content-Type");
        assert_eq!(canonical_name("x-cloudfront-country"), "X-Cloudfront-Country");
        assert_eq!(canonical_name("vary"), "Vary");
    }

    #[test]
    fn test_cookie_excluded_in_any_case() {
        // Platform JSON keeps whatever case the client sent as the map key.
        let req: IncomingRequest = serde_json::from_value(serde_json::json!({
            "method": "GET",
            "uri": "/sdk/loader.js",
            "headers": {
                "Cookie": [{"key": "Cookie", "value": "a=1"}],
                "COOKIE": [{"key": "COOKIE", "value": "b=2"}],
                "cookie": [{"key": "cookie", "value": "c=3"}],
                "Accept": [{"key": "Accept", "value": "*/*"}]
            }
        }))
        .unwrap();
        assert_eq!(req.headers.len(), 4);

        let headers = upstream_headers(&req, "sdk.privacy-center.org");
        assert!(headers.get("cookie").is_none());
        assert!(!headers
            .values()
            .any(|v| ["a=1", "b=2", "c=3"].contains(&v.to_str().unwrap_or_default())));
        assert_eq!(headers.get("accept").unwrap(), "*/*");
    }

    #[test]
    fn test_first_value_only() {
        let req = request()
            .with_header("Accept-Language", "fr")
            .with_header("accept-language", "en");
        let headers = upstream_headers(&req, "sdk.privacy-center.org");
        let values: Vec<_> = headers.get_all("accept-language").iter().collect();
        assert_eq!(values, vec!["fr"]);
    }

    #[test]
    fn test_forced_headers_override_copies() {
        let req = request()
            .with_header("Host", "www.example.com")
            .with_header("Accept-Encoding", "gzip, br")
            .with_header("Content-Length", "12")
            .with_client_ip("203.0.113.9");
        let headers = upstream_headers(&req, "sdk.privacy-center.org");
        assert_eq!(headers.get(HOST).unwrap(), "sdk.privacy-center.org");
        assert_eq!(headers.get(ACCEPT_ENCODING).unwrap(), "identity");
        assert_eq!(headers.get("x-forwarded-for").unwrap(), "203.0.113.9");
        assert!(headers.get("content-length").is_none());
    }

    #[test]
    fn test_no_forwarded_for_without_client_ip() {
        let headers = upstream_headers(&request(), "sdk.privacy-center.org");
        assert!(headers.get("x-forwarded-for").is_none());
    }

    #[test]
    fn test_geo_headers_forwarded() {
        let req = request()
            .with_header("CloudFront-Viewer-Country", "FR")
            .with_header("cloudfront-viewer-region", "IDF");
        let headers = upstream_headers(&req, "api.privacy-center.org");
        assert_eq!(headers.get("x-cloudfront-country").unwrap(), "FR");
        assert_eq!(headers.get("x-cloudfront-region").unwrap(), "IDF");
    }

    #[test]
    fn test_invalid_header_skipped() {
        let req = request()
            .with_header("bad header", "x")
            .with_header("x-ok", "1");
        let headers = upstream_headers(&req, "sdk.privacy-center.org");
        assert_eq!(headers.get("x-ok").unwrap(), "1");
        assert!(!headers.keys().any(|k| k.as_str().contains(' ')));
    }

    #[test]
    fn test_only_allowlisted_response_headers() {
        let mut upstream = HeaderMap::new();
        upstream.insert("x-custom", HeaderValue::from_static("v"));
        upstream.insert("content-type", HeaderValue::from_static("text/html"));

        let headers = response_headers(&upstream, 0, &HeaderPolicy::default());

        assert!(!headers.contains("x-custom"));
        assert_eq!(
            headers.get("content-type"),
            Some(&[HeaderEntry::new("Content-Type", "text/html")][..])
        );
        let mut names: Vec<_> = headers.names().collect();
        names.retain(|n| !cors::CORS_HEADER_NAMES.contains(n));
        assert_eq!(names, vec!["content-type"]);
    }

    #[test]
    fn test_content_length_synthesized_from_body() {
        let headers = response_headers(&HeaderMap::new(), "hello".len(), &HeaderPolicy::default());
        assert_eq!(headers.first_value("content-length"), Some("5"));
    }

    #[test]
    fn test_upstream_content_length_kept() {
        let mut upstream = HeaderMap::new();
        upstream.insert("content-length", HeaderValue::from_static("42"));
        let headers = response_headers(&upstream, 5, &HeaderPolicy::default());
        assert_eq!(headers.first_value("content-length"), Some("42"));
    }

    #[test]
    fn test_no_content_length_for_empty_body() {
        let headers = response_headers(&HeaderMap::new(), 0, &HeaderPolicy::default());
        assert!(!headers.contains("content-length"));
    }

    #[test]
    fn test_cors_forced_and_cookies_kept_separately() {
        let mut upstream = HeaderMap::new();
        upstream.insert(
            "access-control-allow-origin",
            HeaderValue::from_static("https://cmp.example"),
        );
        upstream.append("set-cookie", HeaderValue::from_static("a=1"));
        upstream.append("set-cookie", HeaderValue::from_static("b=2"));

        let headers = response_headers(&upstream, 0, &HeaderPolicy::default());

        assert_eq!(headers.first_value("access-control-allow-origin"), Some("*"));
        assert_eq!(
            headers.get("set-cookie"),
            Some(
                &[
                    HeaderEntry::new("Set-Cookie", "a=1"),
                    HeaderEntry::new("Set-Cookie", "b=2")
                ][..]
            )
        );
    }
}
