use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::ForwardError;

/// Raw form submission as received from the browser.
///
/// Kept untyped: fields may be absent, null or of the wrong type.
pub type LeadSubmission = Value;

/// Payload sent to the Wizzio PushLead endpoint.
pub type MappedLead = Map<String, Value>;

/// Wizzio API credential pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    /// Builds a credential pair, rejecting missing or blank values.
    pub fn new(api_key: Option<&str>, api_secret: Option<&str>) -> Result<Self, ForwardError> {
        match (non_blank(api_key), non_blank(api_secret)) {
            (Some(api_key), Some(api_secret)) => Ok(Self {
                api_key: api_key.to_string(),
                api_secret: api_secret.to_string(),
            }),
            _ => Err(ForwardError::Configuration(
                "Missing Wizzio API credentials".to_string(),
            )),
        }
    }

    /// First characters of the API key, safe for logs.
    pub fn masked_key(&self) -> String {
        let prefix: String = self.api_key.chars().take(4).collect();
        format!("{}***", prefix)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.masked_key())
            .field("api_secret", &"***")
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A lead ready to dispatch, with the headers computed for one instant.
#[derive(Debug, Clone, Serialize)]
pub struct SignedRequest {
    /// Api-Key header value.
    pub api_key: String,
    /// DateTime header value, `YYYY-MM-DD HH:MM:SS.ffffff`.
    pub timestamp: String,
    /// Base64 of the raw HMAC-SHA1 digest.
    pub signature: String,
    /// `WAP:<apiKey>:<signature>`.
    pub authorization_header: String,
    /// JSON body.
    pub body: MappedLead,
}

/// Decoded Wizzio response, relayed to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ServiceResponse(pub Value);

impl ServiceResponse {
    /// The `state` field, when it is an integer.
    pub fn state(&self) -> Option<i64> {
        self.0.get("state").and_then(Value::as_i64)
    }

    /// Wizzio signals success with `state == 1`.
    pub fn is_success(&self) -> bool {
        self.state() == Some(1)
    }

    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}
