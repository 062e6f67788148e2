//! CDN event envelope and handler output.

use serde::{Deserialize, Serialize};

use crate::edge::request::IncomingRequest;
use crate::edge::response::OutgoingResponse;
use crate::error::EventError;

/// Event as delivered by the CDN: `{"Records":[{"cf":{"request":{...}}}]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub cf: CfPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CfPayload {
    pub request: IncomingRequest,
}

impl EdgeEvent {
    pub fn from_json(raw: &str) -> Result<Self, EventError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The request of the first record. Later records are ignored.
    pub fn into_request(self) -> Result<IncomingRequest, EventError> {
        self.records
            .into_iter()
            .next()
            .map(|record| record.cf.request)
            .ok_or(EventError::NoRecords)
    }
}

/// What the handler gives back to the platform.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum HandlerOutput {
    /// Mutated request; the platform performs the origin fetch.
    Forward(IncomingRequest),
    /// Short-circuit response.
    Respond(OutgoingResponse),
}

impl HandlerOutput {
    pub fn as_request(&self) -> Option<&IncomingRequest> {
        match self {
            HandlerOutput::Forward(request) => Some(request),
            HandlerOutput::Respond(_) => None,
        }
    }

    pub fn as_response(&self) -> Option<&OutgoingResponse> {
        match self {
            HandlerOutput::Respond(response) => Some(response),
            HandlerOutput::Forward(_) => None,
        }
    }
}
