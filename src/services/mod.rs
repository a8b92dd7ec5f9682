pub mod api_keys;
pub mod client;
pub mod upstream;

use crate::models::{
    account::{Business, Waba},
    template::MessageTemplate,
};
use async_trait::async_trait;

/// Account-lookup service: businesses, WhatsApp Business Accounts and
/// per-project API keys. The actual service lives outside this repo.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService {
    async fn list_businesses(&self, access_token: &str) -> anyhow::Result<Vec<Business>>;

    async fn list_wabas_for_business(
        &self,
        business_id: &str,
        access_token: &str,
    ) -> anyhow::Result<Vec<Waba>>;

    async fn get_waba_details(&self, access_token: &str) -> anyhow::Result<Vec<Waba>>;

    async fn get_api_key(&self, project_id: &str) -> anyhow::Result<String>;
}

/// Template service: lists the pre-approved message templates of an account
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateService {
    async fn list_message_templates(
        &self,
        waba_id: &str,
        access_token: &str,
    ) -> anyhow::Result<Vec<MessageTemplate>>;
}

pub type ImplAccountService = Box<dyn AccountService>;
pub type ImplTemplateService = Box<dyn TemplateService>;
