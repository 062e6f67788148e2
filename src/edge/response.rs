//! Response synthesized for the edge platform.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::config::CorsConfig;
use crate::cors;
use crate::edge::headers::EdgeHeaders;

/// Complete response returned to the edge platform instead of an origin fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingResponse {
    pub status: u16,
    pub status_description: String,
    pub headers: EdgeHeaders,
    pub body: Bytes,
}

impl OutgoingResponse {
    /// Static 404 for paths outside the supported prefix.
    pub fn not_found() -> Self {
        Self {
            status: 404,
            status_description: "Not Found".to_string(),
            headers: EdgeHeaders::new(),
            body: Bytes::from_static(b"Not Found"),
        }
    }

    /// CORS preflight answer. Never touches the network.
    pub fn preflight(cors_config: &CorsConfig) -> Self {
        let mut headers = EdgeHeaders::new();
        cors::apply_cors(&mut headers, cors_config);
        Self {
            status: 200,
            status_description: "OK".to_string(),
            headers,
            body: Bytes::new(),
        }
    }

    /// Body as text when it is valid UTF-8.
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

// The platform wants `status` as a string and a text body; binary bodies go out base64-encoded.
impl Serialize for OutgoingResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.body_text();
        let fields = if text.is_some() { 4 } else { 5 };
        let mut state = serializer.serialize_struct("OutgoingResponse", fields)?;
        state.serialize_field("status", &self.status.to_string())?;
        state.serialize_field("statusDescription", &self.status_description)?;
        state.serialize_field("headers", &self.headers)?;
        match text {
            Some(text) => state.serialize_field("body", text)?,
            None => {
                state.serialize_field("body", &STANDARD.encode(&self.body))?;
                state.serialize_field("bodyEncoding", "base64")?;
            }
        }
        state.end()
    }
}
