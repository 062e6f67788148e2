//! Header records in the edge platform's shape.
//!
//! ```json
//! { "content-type": [{ "key": "Content-Type", "value": "text/html" }] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single header value together with its original-case name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    #[serde(default)]
    pub key: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Header map keyed by lower-cased header name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeHeaders(BTreeMap<String, Vec<HeaderEntry>>);

impl EdgeHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for `name`, looked up case-insensitively.
    pub fn get(&self, name: &str) -> Option<&[HeaderEntry]> {
        let lower = name.to_ascii_lowercase();
        self.0
            .get(&lower)
            .or_else(|| {
                // Maps deserialized from the wire are not guaranteed to use lower-case keys.
                self.0
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(Vec::as_slice)
    }

    /// First value recorded for `name`, if any.
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|entries| entries.first())
            .map(|entry| entry.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some_and(|entries| !entries.is_empty())
    }

    /// Replace every record for `key` with a single record.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let lower = key.to_ascii_lowercase();
        self.0.insert(lower, vec![HeaderEntry::new(key, value)]);
    }

    /// Add a record for `key`, keeping existing ones.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let lower = key.to_ascii_lowercase();
        self.0
            .entry(lower)
            .or_default()
            .push(HeaderEntry::new(key, value));
    }

    /// Iterate `(map key, records)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[HeaderEntry])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Lower-cased names present in the map.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EdgeHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = EdgeHeaders::new();
        for (k, v) in iter {
            headers.append(k, v);
        }
        headers
    }
}
