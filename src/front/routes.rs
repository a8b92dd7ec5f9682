//! Route configuration module.
//!
//! Groups the playground endpoints under a single scope: the stateless
//! compute endpoints plus a nested scope for the stateful session API.

use super::{playground, session_api};
use ntex::web;

/// Configures the playground API routes.
///
/// # Stateless Routes
/// - `GET /playground/businesses` - List businesses for an access token
/// - `GET /playground/businesses/{business_id}/wabas` - List accounts of a business
/// - `GET /playground/wabas` - List every visible account (single-step flow)
/// - `GET /playground/wabas/{waba_id}/templates` - List message templates
/// - `GET /playground/projects/{project_id}/api-key` - Memoized project API key
/// - `POST /playground/placeholders` - Extract a template's placeholder map
/// - `POST /playground/preview` - Render a template preview
/// - `POST /playground/request-body` - Compile the wire-format payload
/// - `POST /playground/snippet` - Generate a client code snippet
/// - `POST /playground/validate` - Validate a posted form state
/// - `POST /playground/validate-media-url` - Validate a media URL for a template
/// - `POST /playground/send` - Perform the live test call
///
/// # Session Sub-routes (/playground/sessions)
/// - `POST   /playground/sessions` - Open a session
/// - `DELETE /playground/sessions/{session_id}` - Close a session
/// - `POST   /playground/sessions/{session_id}/access-token` - Set token, load businesses
/// - `POST   /playground/sessions/{session_id}/business` - Select business, load accounts
/// - `POST   /playground/sessions/{session_id}/waba` - Select account, load templates
/// - `POST   /playground/sessions/{session_id}/template` - Select template
/// - `POST   /playground/sessions/{session_id}/placeholder` - Set a placeholder value
/// - `POST   /playground/sessions/{session_id}/recipient` - Set the recipient phone
/// - `POST   /playground/sessions/{session_id}/session-message` - Toggle session mode
/// - `GET    /playground/sessions/{session_id}/preview` - Rendered preview
/// - `GET    /playground/sessions/{session_id}/request-body` - Compiled payload
/// - `GET    /playground/sessions/{session_id}/snippet` - Generated code
/// - `GET    /playground/sessions/{session_id}/validate` - Aggregate validation
/// - `POST   /playground/sessions/{session_id}/send` - Live test call
pub fn playground(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/playground").service((
        web::scope("/sessions").service((
            session_api::create_session,
            session_api::delete_session,
            session_api::set_access_token,
            session_api::select_business,
            session_api::select_waba,
            session_api::select_template,
            session_api::set_placeholder,
            session_api::set_recipient,
            session_api::set_session_message,
            session_api::get_preview,
            session_api::get_request_body,
            session_api::get_snippet,
            session_api::get_validation,
            session_api::send_test_message,
        )),
        playground::list_businesses,
        playground::list_wabas,
        playground::list_all_wabas,
        playground::list_templates,
        playground::get_project_api_key,
        playground::extract_placeholders,
        playground::preview_template,
        playground::compile_request_body,
        playground::generate_snippet,
        playground::validate_api_call,
        playground::validate_media_url,
        playground::send_test_message,
    )));
}
