//! Request body serialization for the upstream call.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use bytes::Bytes;

use crate::edge::RequestBody;
use crate::error::ProxyError;

const DEFAULT_ENCODING: &str = "base64";

// Padding is optional on the wire.
const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const BASE64: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Bytes to send upstream. Empty means "send no body".
pub fn serialize_body(body: Option<&RequestBody>) -> Result<Bytes, ProxyError> {
    match body {
        None => Ok(Bytes::new()),
        Some(RequestBody::Text(text)) => Ok(Bytes::copy_from_slice(text.as_bytes())),
        Some(RequestBody::Encoded { data, encoding }) => {
            decode(data, encoding.as_deref().unwrap_or(DEFAULT_ENCODING)).map(Bytes::from)
        }
        Some(RequestBody::Json(value)) => serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| ProxyError::InvalidBody(e.to_string())),
    }
}

fn decode(data: &str, encoding: &str) -> Result<Vec<u8>, ProxyError> {
    match encoding.to_ascii_lowercase().as_str() {
        "base64" => {
            let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            BASE64
                .decode(&compact)
                .map_err(|e| ProxyError::InvalidBody(format!("base64: {e}")))
        }
        "base64url" => BASE64_URL
            .decode(data.trim())
            .map_err(|e| ProxyError::InvalidBody(format!("base64url: {e}"))),
        "text" | "utf8" | "utf-8" => Ok(data.as_bytes().to_vec()),
        "hex" => hex::decode(data.trim()).map_err(|e| ProxyError::InvalidBody(format!("hex: {e}"))),
        // One byte per char, high bits dropped.
        "latin1" | "binary" => Ok(data.chars().map(|c| c as u32 as u8).collect()),
        other => Err(ProxyError::InvalidBody(format!("unsupported encoding `{other}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoded(data: &str, encoding: Option<&str>) -> RequestBody {
        RequestBody::Encoded {
            data: data.to_string(),
            encoding: encoding.map(String::from),
        }
    }

    #[test]
    fn test_absent_body_is_empty() {
        assert!(serialize_body(None).unwrap().is_empty());
    }

    #[test]
    fn test_default_encoding_is_base64() {
        let body = serialize_body(Some(&encoded("eyJhIjoxfQ==", None))).unwrap();
        assert_eq!(&body[..], br#"{"a":1}"#);
        // Unpadded input is accepted as well.
        let body = serialize_body(Some(&encoded("eyJhIjoxfQ", Some("BASE64")))).unwrap();
        assert_eq!(&body[..], br#"{"a":1}"#);
    }

    #[test]
    fn test_text_encodings_pass_through() {
        for encoding in ["text", "utf8", "utf-8"] {
            let body = serialize_body(Some(&encoded("a=1&b=2", Some(encoding)))).unwrap();
            assert_eq!(&body[..], b"a=1&b=2");
        }
        let body = serialize_body(Some(&RequestBody::Text("plain".into()))).unwrap();
        assert_eq!(&body[..], b"plain");
    }

    #[test]
    fn test_hex_and_latin1() {
        let body = serialize_body(Some(&encoded("6869", Some("hex")))).unwrap();
        assert_eq!(&body[..], b"hi");
        let body = serialize_body(Some(&encoded("caf\u{e9}", Some("latin1")))).unwrap();
        assert_eq!(&body[..], &[b'c', b'a', b'f', 0xe9]);
    }

    #[test]
    fn test_json_value_serialized() {
        let body = serialize_body(Some(&RequestBody::Json(json!({"purposes": ["ads"]})))).unwrap();
        assert_eq!(&body[..], br#"{"purposes":["ads"]}"#);
    }

    #[test]
    fn test_bad_data_and_unknown_encoding() {
        assert!(matches!(
            serialize_body(Some(&encoded("!!!", None))),
            Err(ProxyError::InvalidBody(_))
        ));
        assert!(matches!(
            serialize_body(Some(&encoded("abc", Some("rot13")))),
            Err(ProxyError::InvalidBody(_))
        ));
    }
}
