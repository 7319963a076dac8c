use crate::config::Config;
use crate::errors::ForwardError;
use crate::models::{ServiceResponse, SignedRequest};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Client for the Wizzio PushLead API.
#[derive(Clone)]
pub struct WizzioClient {
    client: reqwest::Client,
    push_url: String,
}

impl WizzioClient {
    /// Creates a new `WizzioClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Wizzio API root, without the `/v1/...` path.
    /// * `timeout` - Client-wide request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ForwardError::Internal(format!("Failed to create Wizzio client: {}", e))
            })?;

        Ok(Self {
            client,
            push_url: format!("{}/v1/PushLead/push", base_url.trim_end_matches('/')),
        })
    }

    /// Builds the client from the configured base URL and timeout.
    pub fn from_config(config: &Config) -> Result<Self, ForwardError> {
        Self::new(
            &config.wizzio_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Full PushLead endpoint URL.
    pub fn push_url(&self) -> &str {
        &self.push_url
    }

    /// Sends one signed lead.
    ///
    /// The body is read once as text. A success status with a decodable,
    /// non-null JSON body is returned as is; anything else becomes
    /// `ForwardError::Upstream` carrying the status and the raw text.
    ///
    /// # Returns
    ///
    /// * `Result<ServiceResponse, ForwardError>` - The decoded Wizzio response.
    pub async fn push_lead(&self, signed: &SignedRequest) -> Result<ServiceResponse, ForwardError> {
        tracing::info!("Pushing lead to Wizzio: {}", self.push_url);

        let response = self
            .client
            .post(&self.push_url)
            .header(CONTENT_TYPE, "application/json")
            .header("Api-Key", &signed.api_key)
            .header("DateTime", &signed.timestamp)
            .header("Authorization", &signed.authorization_header)
            .json(&signed.body)
            .send()
            .await
            .map_err(|e| ForwardError::Transport(format!("Wizzio request failed: {}", e)))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| ForwardError::Transport(format!("Failed to read Wizzio response: {}", e)))?;

        let decoded = serde_json::from_str::<serde_json::Value>(&raw)
            .ok()
            .filter(|v| !v.is_null());

        match decoded {
            Some(body) if status.is_success() => {
                tracing::debug!("Wizzio answered {}", status);
                Ok(ServiceResponse(body))
            }
            _ => Err(ForwardError::Upstream {
                status: status.as_u16(),
                raw,
            }),
        }
    }
}
