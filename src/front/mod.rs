pub mod errors;
pub mod playground;
pub mod routes;
pub mod session_api;

use crate::{playground::session::PlaygroundSession, services};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct AppState {
    pub account_service: services::ImplAccountService,
    pub template_service: services::ImplTemplateService,
    pub api_keys: services::api_keys::ApiKeyCache,
    pub message_client: services::client::MessageClient,
    pub sessions: RwLock<HashMap<Uuid, PlaygroundSession>>,
}
