//! Reqwest-backed implementations of the upstream service traits.
//!
//! Both handlers call the account-lookup/template backend configured via
//! `UPSTREAM_BASE_URL`, forwarding the caller's access token as a bearer
//! header.

use super::{AccountService, TemplateService};
use crate::{
    config,
    models::{
        account::{Business, Waba},
        template::MessageTemplate,
    },
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize)]
struct ApiKeyResponse {
    api_key: String,
}

async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: String,
    access_token: &str,
) -> Result<T> {
    let response = client
        .get(&url)
        .header("accept", "application/json")
        .bearer_auth(access_token)
        .send()
        .await
        .with_context(|| format!("failed to reach upstream service at {url}"))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());

        anyhow::bail!("upstream service returned error status {}: {}", status, body);
    }

    response
        .json::<T>()
        .await
        .context("failed to parse upstream service response")
}

/// Account-lookup client
#[derive(Clone)]
pub struct AccountApiHandler {
    pub client: reqwest::Client,
}

#[async_trait]
impl AccountService for AccountApiHandler {
    async fn list_businesses(&self, access_token: &str) -> Result<Vec<Business>> {
        fetch_json(
            &self.client,
            config::APP_CONFIG.upstream_endpoint("/businesses"),
            access_token,
        )
        .await
    }

    async fn list_wabas_for_business(
        &self,
        business_id: &str,
        access_token: &str,
    ) -> Result<Vec<Waba>> {
        fetch_json(
            &self.client,
            config::APP_CONFIG.upstream_endpoint(&format!("/businesses/{business_id}/wabas")),
            access_token,
        )
        .await
    }

    async fn get_waba_details(&self, access_token: &str) -> Result<Vec<Waba>> {
        fetch_json(
            &self.client,
            config::APP_CONFIG.upstream_endpoint("/wabas"),
            access_token,
        )
        .await
    }

    async fn get_api_key(&self, project_id: &str) -> Result<String> {
        let response: ApiKeyResponse = fetch_json(
            &self.client,
            config::APP_CONFIG.upstream_endpoint(&format!("/projects/{project_id}/api-key")),
            "",
        )
        .await?;

        Ok(response.api_key)
    }
}

/// Template-service client
#[derive(Clone)]
pub struct TemplateApiHandler {
    pub client: reqwest::Client,
}

#[async_trait]
impl TemplateService for TemplateApiHandler {
    async fn list_message_templates(
        &self,
        waba_id: &str,
        access_token: &str,
    ) -> Result<Vec<MessageTemplate>> {
        fetch_json(
            &self.client,
            config::APP_CONFIG.upstream_endpoint(&format!("/wabas/{waba_id}/templates")),
            access_token,
        )
        .await
    }
}
