use crate::config::Config;
use crate::errors::{ForwardError, FAILURE_STATE};
use crate::field_mapping::FieldMap;
use crate::forwarder::LeadForwarder;
use crate::models::{LeadSubmission, ServiceResponse};
use crate::wizzio_client::WizzioClient;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, including the Wizzio credentials.
    pub config: Config,
    /// Lead forwarder built from the configured schema and client.
    pub forwarder: LeadForwarder,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ForwardError> {
        let client = WizzioClient::from_config(&config)?;
        let forwarder = LeadForwarder::new(client, FieldMap::for_schema(config.field_schema));
        Ok(Self { config, forwarder })
    }
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-wizzio-lead",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/wizzio-lead
///
/// Forwards the submitted form to Wizzio and relays its answer. Failures are
/// returned as `{state: 9, ...}` with HTTP 200 so the front end only has to
/// look at `state`.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `body` - Raw request body; anything that is not a JSON object is treated
///   as an empty submission.
///
/// # Returns
///
/// * `Result<Json<ServiceResponse>, ForwardError>` - The Wizzio response or an error envelope.
pub async fn wizzio_lead(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ServiceResponse>, ForwardError> {
    tracing::info!("📨 Received lead submission ({} bytes)", body.len());

    let credentials = state.config.credentials()?;
    let submission = parse_submission(&body);
    let response = state.forwarder.forward(&submission, &credentials).await?;

    Ok(Json(response))
}

/// OPTIONS /api/wizzio-lead
///
/// CORS headers are added by the router's CORS layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on the lead endpoint.
pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "state": FAILURE_STATE,
            "message": "Method not allowed"
        })),
    )
}

/// Converts a panic raised while handling a request into the server error envelope.
pub fn panic_envelope(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ForwardError::Internal(detail).into_response()
}

fn parse_submission(body: &[u8]) -> LeadSubmission {
    if body.is_empty() {
        return Value::Null;
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("❌ Lead body is not valid JSON: {}", e);
            Value::Null
        }
    }
}
