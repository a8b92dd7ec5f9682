use derive_more::{Display, Error};
use log::error;
use ntex::{http, web};
use serde_json::json;

#[derive(Debug, Display, Error)]
pub enum UserError {
    SessionNotFound,
    InvalidRequest(#[error(not(source))] String),
}

impl web::error::WebResponseError for UserError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{:#?}", self);

        let message = match self {
            UserError::SessionNotFound => "unknown playground session",
            UserError::InvalidRequest(message) => message.as_str(),
        };

        web::HttpResponse::build(self.status_code()).json(&json!({
            "error": message,
            "retryable": false,
        }))
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            UserError::SessionNotFound => http::StatusCode::NOT_FOUND,
            UserError::InvalidRequest(_) => http::StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum ServerError {
    /// Upstream fetch failed; the caller may retry
    ExternalServiceError(#[error(not(source))] String),
    InternalServerError(#[error(not(source))] String),
}

impl ServerError {
    fn get_error_message(&self) -> String {
        match self {
            ServerError::ExternalServiceError(msg) => format!("[ExternalServiceError] {:#?}", msg),
            ServerError::InternalServerError(msg) => format!("[InternalServerError] {:#?}", msg),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, ServerError::ExternalServiceError(_))
    }
}

impl web::error::WebResponseError for ServerError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{}", self.get_error_message());

        let message = match self {
            ServerError::ExternalServiceError(msg) | ServerError::InternalServerError(msg) => msg,
        };

        web::HttpResponse::build(self.status_code()).json(&json!({
            "error": message,
            "retryable": self.is_retryable(),
        }))
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            ServerError::ExternalServiceError(_) => http::StatusCode::BAD_GATEWAY,
            ServerError::InternalServerError(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
