//! Inbound request as handed over by the edge platform.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::edge::headers::EdgeHeaders;

/// Request body in one of the shapes the edge platform produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBody {
    /// Body already delivered as text.
    Text(String),
    /// Encoded blob. A missing `encoding` means base64.
    Encoded {
        data: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        encoding: Option<String>,
    },
    /// Anything else; forwarded as its JSON serialization.
    Json(Value),
}

/// Per-request view of the client's request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingRequest {
    pub method: String,

    /// Path only; the query string travels separately.
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub querystring: Option<String>,

    #[serde(default)]
    pub headers: EdgeHeaders,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,

    /// Platform fields this crate does not interpret (origin, etc.).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IncomingRequest {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            querystring: None,
            headers: EdgeHeaders::new(),
            client_ip: None,
            body: None,
            extra: Map::new(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(key, value);
        self
    }

    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    pub fn with_querystring(mut self, query: impl Into<String>) -> Self {
        self.querystring = Some(query.into());
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Query string, treating an empty one as absent.
    pub fn query(&self) -> Option<&str> {
        self.querystring.as_deref().filter(|q| !q.is_empty())
    }
}
