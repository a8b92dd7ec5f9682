//! # Message Client
//!
//! Performs the playground's live test call: POSTs a compiled request body
//! to the selected backend and captures whatever comes back. Upstream error
//! statuses are part of the report, not a failure of the client; the whole
//! point of the playground is showing the user the raw response.

use crate::{config, playground::compile::ApiTarget};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Outcome of one test call
#[derive(Debug, Serialize)]
pub struct DispatchReport {
    /// Identifier for correlating logs with responses
    pub attempt_id: Uuid,
    /// HTTP status returned by the backend
    pub status: u16,
    /// Response body, verbatim
    pub body: serde_json::Value,
    pub sent_at: DateTime<Utc>,
}

/// HTTP client for the two send-message backends
#[derive(Clone)]
pub struct MessageClient {
    client: reqwest::Client,
}

impl MessageClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint the compiled body is POSTed to
    pub fn endpoint_url(target: ApiTarget, phone_number_id: &str) -> String {
        match target {
            ApiTarget::Facebook => config::APP_CONFIG.graph_messages_endpoint(phone_number_id),
            ApiTarget::SendZen => config::APP_CONFIG.gateway_messages_endpoint(),
        }
    }

    /// Sends `body` with a bearer token and reports the response
    pub async fn send<T: Serialize + Sync>(
        &self,
        target: ApiTarget,
        phone_number_id: &str,
        token: &str,
        body: &T,
    ) -> Result<DispatchReport> {
        let url = Self::endpoint_url(target, phone_number_id);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to reach the messaging endpoint at {url}"))?;

        let status = response.status().as_u16();
        let body = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or_else(|_| serde_json::json!({"error": "unparseable response body"}));

        Ok(DispatchReport {
            attempt_id: Uuid::new_v4(),
            status,
            body,
            sent_at: Utc::now(),
        })
    }
}

impl Default for MessageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_per_target() {
        assert_eq!(
            MessageClient::endpoint_url(ApiTarget::Facebook, "1234"),
            "https://graph.facebook.com/v21.0/1234/messages"
        );
        assert_eq!(
            MessageClient::endpoint_url(ApiTarget::SendZen, "1234"),
            "https://api.sendzen.io/v1/messages"
        );
    }
}
