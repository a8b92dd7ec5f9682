//! Playground form-state lifecycle.
//!
//! [`PlaygroundSession`] holds the whole form state and enforces the
//! parent-to-child invalidation chain: changing the business clears the
//! account selection, changing the account clears the template, changing
//! the template rebuilds the placeholder map.
//!
//! Every selection bumps a generation counter and fetch results are applied
//! only while their generation is still current, so a slow in-flight fetch
//! can never overwrite the state of a newer selection.

use super::{
    compile::{self, ApiTarget, RequestBody},
    extract,
    render::{self, TemplatePreview},
    snippets::{self, CodeLanguage},
    validate::{self, AggregateValidation},
};
use crate::{
    models::{
        account::{AccountOption, Business, Waba},
        playground::PlaygroundConfig,
        template::MessageTemplate,
    },
    services::{ImplAccountService, ImplTemplateService},
};
use anyhow::Context;
use log::warn;

pub struct PlaygroundSession {
    pub config: PlaygroundConfig,
    businesses: Vec<Business>,
    wabas: Vec<Waba>,
    templates: Vec<MessageTemplate>,
    account_options: Vec<AccountOption>,
    waba_generation: u64,
    template_generation: u64,
    auto_select_template: bool,
    account_service: ImplAccountService,
    template_service: ImplTemplateService,
}

impl PlaygroundSession {
    pub fn new(
        account_service: ImplAccountService,
        template_service: ImplTemplateService,
    ) -> Self {
        Self {
            config: PlaygroundConfig::default(),
            businesses: Vec::new(),
            wabas: Vec::new(),
            templates: Vec::new(),
            account_options: Vec::new(),
            waba_generation: 0,
            template_generation: 0,
            auto_select_template: true,
            account_service,
            template_service,
        }
    }

    pub fn businesses(&self) -> &[Business] {
        &self.businesses
    }

    pub fn wabas(&self) -> &[Waba] {
        &self.wabas
    }

    pub fn templates(&self) -> &[MessageTemplate] {
        &self.templates
    }

    pub fn account_options(&self) -> &[AccountOption] {
        &self.account_options
    }

    pub fn selected_template(&self) -> Option<&MessageTemplate> {
        self.templates
            .iter()
            .find(|template| template.id == self.config.selected_template)
    }

    /// Sets the access token. An empty token clears every list loaded with
    /// the previous one.
    pub fn set_access_token(&mut self, access_token: &str) {
        self.config.access_token = access_token.to_string();

        if access_token.is_empty() {
            self.businesses.clear();
            self.wabas.clear();
            self.templates.clear();
            self.account_options.clear();
            self.auto_select_template = true;
        }
    }

    pub fn set_recipient_phone(&mut self, phone: &str) {
        self.config.recipient_phone = phone.to_string();
    }

    pub fn set_session_message(&mut self, enabled: bool) {
        self.config.is_session_message = enabled;
    }

    pub fn set_session_text(&mut self, text: &str) {
        self.config.session_message_text = text.to_string();
    }

    pub fn set_session_preview_url(&mut self, enabled: bool) {
        self.config.session_message_preview_url = enabled;
    }

    /// Mutates one placeholder value in place
    pub fn set_placeholder(&mut self, key: &str, value: &str) {
        self.config
            .template_placeholders
            .insert(key.to_string(), value.to_string());
    }

    /// Reloads the business list for the current access token
    pub async fn refresh_businesses(&mut self) -> anyhow::Result<()> {
        match self
            .account_service
            .list_businesses(&self.config.access_token)
            .await
        {
            Ok(businesses) => {
                self.businesses = businesses;
                Ok(())
            }
            Err(err) => {
                self.businesses.clear();
                Err(err).context("failed to fetch businesses")
            }
        }
    }

    fn rebuild_account_options(&mut self) {
        self.account_options = self.wabas.iter().map(AccountOption::from).collect();
    }

    fn apply_wabas(&mut self, generation: u64, wabas: Vec<Waba>) -> bool {
        if generation != self.waba_generation {
            warn!("dropping stale account list (generation {generation})");
            return false;
        }

        self.wabas = wabas;
        self.rebuild_account_options();
        true
    }

    fn apply_templates(&mut self, generation: u64, templates: Vec<MessageTemplate>) -> bool {
        if generation != self.template_generation {
            warn!("dropping stale template list (generation {generation})");
            return false;
        }

        self.templates = templates;
        true
    }

    /// Selects a business and reloads its accounts. Clears every child
    /// selection first.
    pub async fn select_business(&mut self, business_id: &str) -> anyhow::Result<()> {
        self.config.selected_business = business_id.to_string();
        self.config.selected_waba.clear();
        self.config.selected_template.clear();
        self.config.waba_id.clear();
        self.config.phone_number_id.clear();
        self.config.template_placeholders.clear();
        self.templates.clear();
        self.auto_select_template = true;

        self.waba_generation += 1;
        let generation = self.waba_generation;

        match self
            .account_service
            .list_wabas_for_business(business_id, &self.config.access_token)
            .await
        {
            Ok(wabas) => {
                self.apply_wabas(generation, wabas);
                Ok(())
            }
            Err(err) => {
                self.wabas.clear();
                self.account_options.clear();
                Err(err).context("failed to fetch accounts for business")
            }
        }
    }

    /// Selects an account and reloads its templates. Clears the template
    /// selection and placeholders first; auto-selects the first template
    /// of the fresh list.
    pub async fn select_waba(
        &mut self,
        waba_id: &str,
        phone_number_id: &str,
    ) -> anyhow::Result<()> {
        self.config.selected_waba = waba_id.to_string();
        self.config.waba_id = waba_id.to_string();
        self.config.phone_number_id = phone_number_id.to_string();
        self.config.selected_template.clear();
        self.config.template_placeholders.clear();
        self.auto_select_template = true;

        self.template_generation += 1;
        let generation = self.template_generation;

        match self
            .template_service
            .list_message_templates(waba_id, &self.config.access_token)
            .await
        {
            Ok(templates) => {
                if self.apply_templates(generation, templates)
                    && self.auto_select_template
                    && self.config.selected_template.is_empty()
                {
                    if let Some(first_id) = self.templates.first().map(|t| t.id.clone()) {
                        self.auto_select_template = false;
                        self.select_template(&first_id);
                    }
                }
                Ok(())
            }
            Err(err) => {
                self.templates.clear();
                Err(err).context("failed to fetch message templates")
            }
        }
    }

    /// Selects a template and rebuilds the placeholder map from it
    pub fn select_template(&mut self, template_id: &str) {
        self.config.selected_template = template_id.to_string();
        self.config.template_placeholders = self
            .selected_template()
            .map(extract::extract_placeholders)
            .unwrap_or_default();
    }

    /// Rendered preview of the selected template
    pub fn preview(&self) -> Option<TemplatePreview> {
        self.selected_template()
            .map(|template| render::render_preview(template, &self.config.template_placeholders))
    }

    /// Compiled request body for the current form state
    pub fn request_body(&self, target: ApiTarget) -> RequestBody {
        compile::compile_request_body(&self.config, &self.templates, &self.account_options, target)
    }

    /// Generated client code for the current form state
    pub fn snippet(&self, language: CodeLanguage, target: ApiTarget) -> anyhow::Result<String> {
        let url = crate::services::client::MessageClient::endpoint_url(
            target,
            &self.config.phone_number_id,
        );
        let body = serde_json::to_value(self.request_body(target))
            .context("failed to serialize the compiled request body")?;

        Ok(snippets::generate_snippet(
            language,
            &url,
            &body,
            &self.config.access_token,
            target,
        ))
    }

    /// Aggregate validation of the current form state
    pub fn validate(&self) -> AggregateValidation {
        validate::validate_api_call(&self.config, &self.templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::{
        BodyComponent, Component, HeaderComponent, HeaderFormat, TemplateCategory,
    };
    use crate::models::account::PhoneNumber;
    use crate::services::{MockAccountService, MockTemplateService};
    use mockall::predicate::eq;

    fn sample_waba() -> Waba {
        Waba {
            waba_id: "waba-1".to_string(),
            business_name: "Acme".to_string(),
            phone_numbers: vec![PhoneNumber {
                phone_number_id: "pn-1".to_string(),
                phone_number: "5215550001111".to_string(),
                status: Some("CONNECTED".to_string()),
            }],
        }
    }

    fn sample_template(id: &str, category: TemplateCategory) -> MessageTemplate {
        MessageTemplate {
            id: id.to_string(),
            name: format!("template_{id}"),
            language: "en_US".to_string(),
            category,
            components: vec![Component::Body(BodyComponent {
                text: Some("Hi {{1}}".to_string()),
            })],
            ..MessageTemplate::default()
        }
    }

    fn session_with(
        account_service: MockAccountService,
        template_service: MockTemplateService,
    ) -> PlaygroundSession {
        PlaygroundSession::new(Box::new(account_service), Box::new(template_service))
    }

    #[ntex::test]
    async fn test_select_business_invalidates_children() {
        let mut account_service = MockAccountService::new();
        account_service
            .expect_list_wabas_for_business()
            .with(eq("biz-1"), eq("token"))
            .returning(|_, _| Ok(vec![sample_waba()]));

        let mut session = session_with(account_service, MockTemplateService::new());
        session.set_access_token("token");
        session.config.selected_waba = "stale".to_string();
        session.config.selected_template = "stale".to_string();
        session
            .config
            .template_placeholders
            .insert("body_param_1".to_string(), "stale".to_string());

        session.select_business("biz-1").await.unwrap();

        assert_eq!(session.config.selected_business, "biz-1");
        assert!(session.config.selected_waba.is_empty());
        assert!(session.config.selected_template.is_empty());
        assert!(session.config.template_placeholders.is_empty());
        assert_eq!(session.wabas().len(), 1);
        assert_eq!(session.account_options()[0].phone, "5215550001111");
    }

    #[ntex::test]
    async fn test_select_waba_loads_and_auto_selects_template() {
        let mut template_service = MockTemplateService::new();
        template_service
            .expect_list_message_templates()
            .with(eq("waba-1"), eq("token"))
            .returning(|_, _| {
                Ok(vec![
                    sample_template("10", TemplateCategory::Utility),
                    sample_template("11", TemplateCategory::Utility),
                ])
            });

        let mut session = session_with(MockAccountService::new(), template_service);
        session.set_access_token("token");

        session.select_waba("waba-1", "pn-1").await.unwrap();

        assert_eq!(session.config.selected_template, "10");
        assert_eq!(session.config.phone_number_id, "pn-1");
        assert_eq!(
            session.config.template_placeholders.get("body_param_1"),
            Some(&String::new())
        );
    }

    #[ntex::test]
    async fn test_authentication_template_default_fill_on_selection() {
        let mut template_service = MockTemplateService::new();
        template_service
            .expect_list_message_templates()
            .returning(|_, _| Ok(vec![sample_template("10", TemplateCategory::Authentication)]));

        let mut session = session_with(MockAccountService::new(), template_service);
        session.set_access_token("token");
        session.select_waba("waba-1", "pn-1").await.unwrap();

        assert_eq!(
            session.config.template_placeholders.get("body_param_1"),
            Some(&"1234".to_string())
        );
    }

    #[ntex::test]
    async fn test_fetch_failure_resets_dependent_state() {
        let mut account_service = MockAccountService::new();
        account_service
            .expect_list_wabas_for_business()
            .returning(|_, _| anyhow::bail!("upstream down"));

        let mut session = session_with(account_service, MockTemplateService::new());
        session.set_access_token("token");

        assert!(session.select_business("biz-1").await.is_err());
        assert!(session.wabas().is_empty());
        assert!(session.account_options().is_empty());
    }

    #[ntex::test]
    async fn test_stale_fetch_results_are_dropped() {
        let mut session = session_with(MockAccountService::new(), MockTemplateService::new());

        let stale_generation = session.waba_generation;
        session.waba_generation += 1;

        assert!(!session.apply_wabas(stale_generation, vec![sample_waba()]));
        assert!(session.wabas().is_empty());

        let stale_generation = session.template_generation;
        session.template_generation += 1;
        assert!(!session.apply_templates(
            stale_generation,
            vec![sample_template("10", TemplateCategory::Utility)]
        ));
        assert!(session.templates().is_empty());
    }

    #[ntex::test]
    async fn test_media_template_preview_and_body() {
        let mut template_service = MockTemplateService::new();
        template_service
            .expect_list_message_templates()
            .returning(|_, _| {
                let mut template = sample_template("10", TemplateCategory::Utility);
                template.components.insert(
                    0,
                    Component::Header(HeaderComponent {
                        format: Some(HeaderFormat::Image),
                        text: None,
                        example: None,
                    }),
                );
                Ok(vec![template])
            });

        let mut session = session_with(MockAccountService::new(), template_service);
        session.set_access_token("token");
        session.select_waba("waba-1", "pn-1").await.unwrap();
        session.set_placeholder("body_param_1", "Ana");

        let preview = session.preview().unwrap();
        assert_eq!(preview.body.unwrap().text, "Hi Ana");

        let body = serde_json::to_value(session.request_body(ApiTarget::Facebook)).unwrap();
        assert_eq!(body["template"]["name"], "template_10");
    }

    #[ntex::test]
    async fn test_empty_access_token_clears_lists() {
        let mut account_service = MockAccountService::new();
        account_service
            .expect_list_businesses()
            .returning(|_| {
                Ok(vec![Business {
                    id: "biz-1".to_string(),
                    name: "Acme".to_string(),
                }])
            });

        let mut session = session_with(account_service, MockTemplateService::new());
        session.set_access_token("token");
        session.refresh_businesses().await.unwrap();
        assert_eq!(session.businesses().len(), 1);

        session.set_access_token("");
        assert!(session.businesses().is_empty());
    }

    #[ntex::test]
    async fn test_snippet_uses_session_state() {
        let mut session = session_with(MockAccountService::new(), MockTemplateService::new());
        session.set_access_token("tok-xyz");
        session.config.phone_number_id = "pn-77".to_string();
        session.config.is_session_message = true;
        session.config.session_message_text = "hello".to_string();

        let snippet = session
            .snippet(CodeLanguage::Curl, ApiTarget::Facebook)
            .unwrap();
        assert!(snippet.contains("https://graph.facebook.com/v21.0/pn-77/messages"));
        assert!(snippet.contains("Bearer tok-xyz"));
    }
}
