use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::fmt;

/// Generic failure sentinel used in every envelope the forwarder produces itself.
pub const FAILURE_STATE: i64 = 9;

/// Failures of a single forwarding attempt.
///
/// Every variant is recovered at the handler boundary and rendered as a
/// `{state: 9, message, ...context}` JSON envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardError {
    /// API key or secret is missing or blank.
    Configuration(String),
    /// Mandatory submission fields are missing (source key names).
    Validation { missing: Vec<String> },
    /// The Service answered with a non-success status or an undecodable body.
    Upstream {
        /// Upstream HTTP status code.
        status: u16,
        /// Raw upstream body, kept even when it is not JSON.
        raw: String,
    },
    /// The Service could not be reached.
    Transport(String),
    /// Any other fault while mapping or signing.
    Internal(String),
}

impl ForwardError {
    /// Builds the JSON envelope returned to the caller.
    pub fn envelope(&self) -> Value {
        match self {
            ForwardError::Configuration(msg) => json!({
                "state": FAILURE_STATE,
                "message": msg,
            }),
            ForwardError::Validation { missing } => json!({
                "state": FAILURE_STATE,
                "message": "Missing required fields",
                "missing": missing,
            }),
            ForwardError::Upstream { status, raw } => json!({
                "state": FAILURE_STATE,
                "message": "Importation Lead Error",
                "status": status,
                "raw": raw,
            }),
            ForwardError::Transport(err) | ForwardError::Internal(err) => json!({
                "state": FAILURE_STATE,
                "message": "Server error",
                "error": err,
            }),
        }
    }
}

impl fmt::Display for ForwardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            ForwardError::Validation { missing } => {
                write!(f, "Missing required fields: {}", missing.join(", "))
            }
            ForwardError::Upstream { status, raw } => {
                write!(f, "Wizzio returned {}: {}", status, raw)
            }
            ForwardError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ForwardError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ForwardError {}

impl IntoResponse for ForwardError {
    /// Converts the error into an HTTP response.
    ///
    /// Failures are carried by the `state` field, so the status is always 200.
    /// Logs according to severity.
    fn into_response(self) -> Response {
        match &self {
            ForwardError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
            }
            ForwardError::Validation { missing } => {
                tracing::warn!("Rejected lead, missing fields: {:?}", missing);
            }
            ForwardError::Upstream { status, raw } => {
                tracing::error!("Wizzio import failed ({}): {}", status, raw);
            }
            ForwardError::Transport(msg) => {
                tracing::error!("Wizzio unreachable: {}", msg);
            }
            ForwardError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
            }
        }

        (StatusCode::OK, Json(self.envelope())).into_response()
    }
}

impl From<reqwest::Error> for ForwardError {
    /// Converts a `reqwest::Error` into a `ForwardError`.
    fn from(err: reqwest::Error) -> Self {
        ForwardError::Transport(err.to_string())
    }
}
