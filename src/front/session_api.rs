//! Stateful playground session endpoints.
//!
//! Holds the widget's form lifecycle server-side: a session walks the
//! business -> account -> template -> placeholders selection chain, each
//! selection invalidating everything downstream of it. The stateless
//! endpoints in [`super::playground`] remain available for callers that
//! keep the form state themselves.

use super::{AppState, errors};
use crate::{
    playground::{
        compile::ApiTarget,
        session::PlaygroundSession,
        snippets::CodeLanguage,
    },
    services::upstream::{AccountApiHandler, TemplateApiHandler},
};
use ntex::web;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SessionPath {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TargetQuery {
    pub target: ApiTarget,
}

#[derive(Debug, Deserialize)]
pub struct SnippetQuery {
    pub language: CodeLanguage,
    pub target: ApiTarget,
}

/// Opens a fresh session with default form state
#[web::post("")]
pub async fn create_session(
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let session = PlaygroundSession::new(
        Box::new(AccountApiHandler {
            client: crate::utils::REQUEST_CLIENT.clone(),
        }),
        Box::new(TemplateApiHandler {
            client: crate::utils::REQUEST_CLIENT.clone(),
        }),
    );

    let session_id = Uuid::new_v4();
    app_state.sessions.write().await.insert(session_id, session);

    Ok(web::HttpResponse::Ok().json(&json!({ "session_id": session_id })))
}

#[derive(Debug, Deserialize)]
pub struct AccessTokenForm {
    pub access_token: String,
}

/// Sets the access token and reloads the business list for it
#[web::post("/{session_id}/access-token")]
pub async fn set_access_token(
    path: web::types::Path<SessionPath>,
    form: web::types::Json<AccessTokenForm>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let mut sessions = app_state.sessions.write().await;
    let session = sessions
        .get_mut(&path.session_id)
        .ok_or(errors::UserError::SessionNotFound)?;

    session.set_access_token(&form.access_token);

    if !form.access_token.is_empty() {
        session.refresh_businesses().await.map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("failed to fetch businesses: {e}"))
        })?;
    }

    Ok(web::HttpResponse::Ok().json(&session.businesses()))
}

#[derive(Debug, Deserialize)]
pub struct BusinessForm {
    pub business_id: String,
}

/// Selects a business; child selections are cleared and its accounts loaded
#[web::post("/{session_id}/business")]
pub async fn select_business(
    path: web::types::Path<SessionPath>,
    form: web::types::Json<BusinessForm>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let mut sessions = app_state.sessions.write().await;
    let session = sessions
        .get_mut(&path.session_id)
        .ok_or(errors::UserError::SessionNotFound)?;

    session.select_business(&form.business_id).await.map_err(|e| {
        errors::ServerError::ExternalServiceError(format!("failed to fetch accounts: {e}"))
    })?;

    Ok(web::HttpResponse::Ok().json(&session.wabas()))
}

#[derive(Debug, Deserialize)]
pub struct WabaForm {
    pub waba_id: String,
    pub phone_number_id: String,
}

/// Selects an account; the template list is reloaded and its first entry
/// auto-selected
#[web::post("/{session_id}/waba")]
pub async fn select_waba(
    path: web::types::Path<SessionPath>,
    form: web::types::Json<WabaForm>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let mut sessions = app_state.sessions.write().await;
    let session = sessions
        .get_mut(&path.session_id)
        .ok_or(errors::UserError::SessionNotFound)?;

    session
        .select_waba(&form.waba_id, &form.phone_number_id)
        .await
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("failed to fetch templates: {e}"))
        })?;

    Ok(web::HttpResponse::Ok().json(&json!({
        "templates": session.templates(),
        "config": session.config,
    })))
}

#[derive(Debug, Deserialize)]
pub struct TemplateForm {
    pub template_id: String,
}

/// Selects a template and rebuilds the placeholder map
#[web::post("/{session_id}/template")]
pub async fn select_template(
    path: web::types::Path<SessionPath>,
    form: web::types::Json<TemplateForm>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let mut sessions = app_state.sessions.write().await;
    let session = sessions
        .get_mut(&path.session_id)
        .ok_or(errors::UserError::SessionNotFound)?;

    session.select_template(&form.template_id);

    Ok(web::HttpResponse::Ok().json(&session.config.template_placeholders))
}

#[derive(Debug, Deserialize)]
pub struct PlaceholderForm {
    pub key: String,
    pub value: String,
}

/// Mutates one placeholder value in place
#[web::post("/{session_id}/placeholder")]
pub async fn set_placeholder(
    path: web::types::Path<SessionPath>,
    form: web::types::Json<PlaceholderForm>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let mut sessions = app_state.sessions.write().await;
    let session = sessions
        .get_mut(&path.session_id)
        .ok_or(errors::UserError::SessionNotFound)?;

    session.set_placeholder(&form.key, &form.value);

    Ok(web::HttpResponse::Ok().json(&session.config.template_placeholders))
}

#[derive(Debug, Deserialize)]
pub struct RecipientForm {
    pub recipient_phone: String,
}

/// Sets the free-text recipient phone
#[web::post("/{session_id}/recipient")]
pub async fn set_recipient(
    path: web::types::Path<SessionPath>,
    form: web::types::Json<RecipientForm>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let mut sessions = app_state.sessions.write().await;
    let session = sessions
        .get_mut(&path.session_id)
        .ok_or(errors::UserError::SessionNotFound)?;

    session.set_recipient_phone(&form.recipient_phone);

    Ok(web::HttpResponse::Ok().finish())
}

#[derive(Debug, Deserialize)]
pub struct SessionMessageForm {
    pub is_session_message: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub preview_url: bool,
}

/// Switches between template and free-text session mode
#[web::post("/{session_id}/session-message")]
pub async fn set_session_message(
    path: web::types::Path<SessionPath>,
    form: web::types::Json<SessionMessageForm>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let mut sessions = app_state.sessions.write().await;
    let session = sessions
        .get_mut(&path.session_id)
        .ok_or(errors::UserError::SessionNotFound)?;

    session.set_session_message(form.is_session_message);
    session.set_session_text(&form.text);
    session.set_session_preview_url(form.preview_url);

    Ok(web::HttpResponse::Ok().finish())
}

/// Rendered preview of the selected template
#[web::get("/{session_id}/preview")]
pub async fn get_preview(
    path: web::types::Path<SessionPath>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let sessions = app_state.sessions.read().await;
    let session = sessions
        .get(&path.session_id)
        .ok_or(errors::UserError::SessionNotFound)?;

    Ok(web::HttpResponse::Ok().json(&session.preview()))
}

/// Compiled request body for the session's form state
#[web::get("/{session_id}/request-body")]
pub async fn get_request_body(
    path: web::types::Path<SessionPath>,
    query: web::types::Query<TargetQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let sessions = app_state.sessions.read().await;
    let session = sessions
        .get(&path.session_id)
        .ok_or(errors::UserError::SessionNotFound)?;

    Ok(web::HttpResponse::Ok().json(&session.request_body(query.target)))
}

/// Generated client code for the session's form state
#[web::get("/{session_id}/snippet")]
pub async fn get_snippet(
    path: web::types::Path<SessionPath>,
    query: web::types::Query<SnippetQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let sessions = app_state.sessions.read().await;
    let session = sessions
        .get(&path.session_id)
        .ok_or(errors::UserError::SessionNotFound)?;

    let code = session.snippet(query.language, query.target).map_err(|e| {
        errors::ServerError::InternalServerError(format!("failed to generate snippet: {e}"))
    })?;

    Ok(web::HttpResponse::Ok().json(&json!({
        "language": query.language.to_string(),
        "syntax": query.language.syntax_language(),
        "code": code,
    })))
}

/// Aggregate validation of the session's form state
#[web::get("/{session_id}/validate")]
pub async fn get_validation(
    path: web::types::Path<SessionPath>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let sessions = app_state.sessions.read().await;
    let session = sessions
        .get(&path.session_id)
        .ok_or(errors::UserError::SessionNotFound)?;

    Ok(web::HttpResponse::Ok().json(&session.validate()))
}

/// Validates, compiles and performs the live test call for the session
#[web::post("/{session_id}/send")]
pub async fn send_test_message(
    path: web::types::Path<SessionPath>,
    query: web::types::Query<TargetQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let sessions = app_state.sessions.read().await;
    let session = sessions
        .get(&path.session_id)
        .ok_or(errors::UserError::SessionNotFound)?;

    let outcome = session.validate();
    if !outcome.is_valid {
        return Ok(web::HttpResponse::BadRequest().json(&outcome));
    }

    let body = session.request_body(query.target);
    let report = app_state
        .message_client
        .send(
            query.target,
            &session.config.phone_number_id,
            &session.config.access_token,
            &body,
        )
        .await
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("failed to send test message: {e}"))
        })?;

    Ok(web::HttpResponse::Ok().json(&report))
}

/// Closes a session and drops its state
#[web::delete("/{session_id}")]
pub async fn delete_session(
    path: web::types::Path<SessionPath>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let removed = app_state.sessions.write().await.remove(&path.session_id);

    if removed.is_none() {
        return Err(errors::UserError::SessionNotFound.into());
    }

    Ok(web::HttpResponse::Ok().finish())
}
