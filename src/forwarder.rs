//! Lead forwarding: validate, map, sign, dispatch, relay.

use crate::errors::ForwardError;
use crate::field_mapping::FieldMap;
use crate::models::{Credentials, LeadSubmission, ServiceResponse, SignedRequest};
use crate::signing;
use crate::wizzio_client::WizzioClient;

#[derive(Clone)]
pub struct LeadForwarder {
    client: WizzioClient,
    field_map: FieldMap,
}

impl LeadForwarder {
    /// Creates a forwarder sending leads shaped by `field_map` through `client`.
    pub fn new(client: WizzioClient, field_map: FieldMap) -> Self {
        Self { client, field_map }
    }

    /// Mapping table in use.
    pub fn field_map(&self) -> &FieldMap {
        &self.field_map
    }

    /// Validates and maps `submission`, then signs it at the current instant.
    /// No network call is made.
    pub fn prepare(
        &self,
        submission: &LeadSubmission,
        credentials: &Credentials,
    ) -> Result<SignedRequest, ForwardError> {
        self.field_map.validate(submission)?;
        let body = self.field_map.map(submission);
        signing::sign_now(credentials, body)
    }

    /// Forwards one lead to Wizzio.
    ///
    /// Flow:
    /// 1. Reject if mandatory fields are missing.
    /// 2. Map the submission onto the Wizzio schema.
    /// 3. Sign with a fresh `DateTime`.
    /// 4. POST once, no retry.
    /// 5. Relay the decoded response, whatever its `state`.
    pub async fn forward(
        &self,
        submission: &LeadSubmission,
        credentials: &Credentials,
    ) -> Result<ServiceResponse, ForwardError> {
        let signed = self.prepare(submission, credentials)?;

        tracing::info!(
            "Forwarding lead with key {} at {}",
            credentials.masked_key(),
            signed.timestamp
        );

        let start = std::time::Instant::now();
        let response = self.client.push_lead(&signed).await?;
        let latency_ms = start.elapsed().as_millis();

        if response.is_success() {
            tracing::info!("✅ Lead accepted by Wizzio ({}ms)", latency_ms);
        } else {
            tracing::warn!(
                "⚠️  Wizzio answered state={:?} message={:?} ({}ms)",
                response.state(),
                response.message(),
                latency_ms
            );
        }

        Ok(response)
    }
}
