//! Playground endpoint handlers.
//!
//! Stateless JSON endpoints over the playground core: the caller posts the
//! form state (and the template/account lists it already holds) and gets
//! back extraction, preview, compilation, validation or snippet results.
//! The selection lists themselves are proxied from the upstream services.

use super::{AppState, errors};
use crate::{
    models::{
        account::AccountOption, playground::PlaygroundConfig, template::MessageTemplate,
    },
    playground::{
        compile::{self, ApiTarget},
        extract,
        render,
        snippets::{self, CodeLanguage},
        validate,
    },
    services::client::MessageClient,
};
use ntex::web;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct AccessTokenQuery {
    pub access_token: String,
}

/// Lists the businesses visible to an access token
#[web::get("/businesses")]
pub async fn list_businesses(
    query: web::types::Query<AccessTokenQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let businesses = app_state
        .account_service
        .list_businesses(&query.access_token)
        .await
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("failed to fetch businesses: {e}"))
        })?;

    Ok(web::HttpResponse::Ok().json(&businesses))
}

#[derive(Debug, Deserialize)]
pub struct BusinessPath {
    pub business_id: String,
}

/// Lists the WhatsApp Business Accounts of a business
#[web::get("/businesses/{business_id}/wabas")]
pub async fn list_wabas(
    path: web::types::Path<BusinessPath>,
    query: web::types::Query<AccessTokenQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let wabas = app_state
        .account_service
        .list_wabas_for_business(&path.business_id, &query.access_token)
        .await
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("failed to fetch accounts: {e}"))
        })?;

    Ok(web::HttpResponse::Ok().json(&wabas))
}

/// Lists every account visible to an access token (single-step flow)
#[web::get("/wabas")]
pub async fn list_all_wabas(
    query: web::types::Query<AccessTokenQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let wabas = app_state
        .account_service
        .get_waba_details(&query.access_token)
        .await
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("failed to fetch accounts: {e}"))
        })?;

    Ok(web::HttpResponse::Ok().json(&wabas))
}

#[derive(Debug, Deserialize)]
pub struct WabaPath {
    pub waba_id: String,
}

/// Lists the message templates of an account
#[web::get("/wabas/{waba_id}/templates")]
pub async fn list_templates(
    path: web::types::Path<WabaPath>,
    query: web::types::Query<AccessTokenQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let templates = app_state
        .template_service
        .list_message_templates(&path.waba_id, &query.access_token)
        .await
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("failed to fetch templates: {e}"))
        })?;

    Ok(web::HttpResponse::Ok().json(&templates))
}

#[derive(Debug, Deserialize)]
pub struct ProjectPath {
    pub project_id: String,
}

/// Returns the project's API key, memoized for the process lifetime
#[web::get("/projects/{project_id}/api-key")]
pub async fn get_project_api_key(
    path: web::types::Path<ProjectPath>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let api_key = app_state
        .api_keys
        .get_or_fetch(&path.project_id, &app_state.account_service)
        .await
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("failed to fetch api key: {e}"))
        })?;

    Ok(web::HttpResponse::Ok().json(&serde_json::json!({ "api_key": api_key })))
}

/// Extracts the placeholder map of a posted template
#[web::post("/placeholders")]
pub async fn extract_placeholders(
    template: web::types::Json<MessageTemplate>,
) -> Result<impl web::Responder, web::Error> {
    Ok(web::HttpResponse::Ok().json(&extract::extract_placeholders(&template)))
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub template: MessageTemplate,
    #[serde(default)]
    pub placeholders: BTreeMap<String, String>,
}

/// Renders the preview of a template with the supplied placeholder values
#[web::post("/preview")]
pub async fn preview_template(
    request: web::types::Json<PreviewRequest>,
) -> Result<impl web::Responder, web::Error> {
    let preview = render::render_preview(&request.template, &request.placeholders);
    Ok(web::HttpResponse::Ok().json(&preview))
}

#[derive(Debug, Deserialize)]
pub struct CompileRequest {
    pub config: PlaygroundConfig,
    #[serde(default)]
    pub templates: Vec<MessageTemplate>,
    #[serde(default)]
    pub accounts: Vec<AccountOption>,
    pub target: ApiTarget,
}

/// Compiles the request body for the posted form state
#[web::post("/request-body")]
pub async fn compile_request_body(
    request: web::types::Json<CompileRequest>,
) -> Result<impl web::Responder, web::Error> {
    let body = compile::compile_request_body(
        &request.config,
        &request.templates,
        &request.accounts,
        request.target,
    );

    Ok(web::HttpResponse::Ok().json(&body))
}

#[derive(Debug, Deserialize)]
pub struct SnippetRequest {
    pub language: CodeLanguage,
    pub config: PlaygroundConfig,
    #[serde(default)]
    pub templates: Vec<MessageTemplate>,
    #[serde(default)]
    pub accounts: Vec<AccountOption>,
    pub target: ApiTarget,
}

#[derive(Debug, Serialize)]
pub struct SnippetResponse {
    pub language: String,
    pub syntax: String,
    pub code: String,
}

/// Generates a client code snippet for the posted form state
#[web::post("/snippet")]
pub async fn generate_snippet(
    request: web::types::Json<SnippetRequest>,
) -> Result<impl web::Responder, web::Error> {
    let body = compile::compile_request_body(
        &request.config,
        &request.templates,
        &request.accounts,
        request.target,
    );
    let body = serde_json::to_value(body).map_err(|e| {
        errors::ServerError::InternalServerError(format!("failed to serialize request body: {e}"))
    })?;

    let url = MessageClient::endpoint_url(request.target, &request.config.phone_number_id);
    let code = snippets::generate_snippet(
        request.language,
        &url,
        &body,
        &request.config.access_token,
        request.target,
    );

    Ok(web::HttpResponse::Ok().json(&SnippetResponse {
        language: request.language.to_string(),
        syntax: request.language.syntax_language().to_string(),
        code,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub config: PlaygroundConfig,
    #[serde(default)]
    pub templates: Vec<MessageTemplate>,
}

/// Validates the posted form state without sending anything
#[web::post("/validate")]
pub async fn validate_api_call(
    request: web::types::Json<ValidateRequest>,
) -> Result<impl web::Responder, web::Error> {
    let outcome = validate::validate_api_call(&request.config, &request.templates);
    Ok(web::HttpResponse::Ok().json(&outcome))
}

#[derive(Debug, Deserialize)]
pub struct MediaUrlRequest {
    pub template: MessageTemplate,
    pub url: String,
}

/// Validates a media URL against the template's header media kind.
/// Templates without a media header accept any value here.
#[web::post("/validate-media-url")]
pub async fn validate_media_url(
    request: web::types::Json<MediaUrlRequest>,
) -> Result<impl web::Responder, web::Error> {
    let outcome = match request.template.media_type() {
        Some(format) if format.is_media() => validate::validate_media_url(&request.url, format),
        _ => validate::FieldValidation::ok(),
    };

    Ok(web::HttpResponse::Ok().json(&outcome))
}

/// Validates, compiles and performs the live test call.
///
/// Field validation failures block the call and come back as a keyed error
/// map with 400; the upstream response itself is always reported verbatim,
/// success or not.
#[web::post("/send")]
pub async fn send_test_message(
    request: web::types::Json<CompileRequest>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let outcome = validate::validate_api_call(&request.config, &request.templates);
    if !outcome.is_valid {
        return Ok(web::HttpResponse::BadRequest().json(&outcome));
    }

    let body = compile::compile_request_body(
        &request.config,
        &request.templates,
        &request.accounts,
        request.target,
    );

    let report = app_state
        .message_client
        .send(
            request.target,
            &request.config.phone_number_id,
            &request.config.access_token,
            &body,
        )
        .await
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("failed to send test message: {e}"))
        })?;

    Ok(web::HttpResponse::Ok().json(&report))
}
