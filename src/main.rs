//! # WhatsApp Template Playground
//!
//! Main entry point for the template playground service. Configures SSL,
//! middleware and route handling around the playground core: placeholder
//! extraction, preview rendering, request-body compilation, validation,
//! code-snippet generation and the live test call.
#![recursion_limit = "256"]

pub mod config;
pub mod consts;
pub mod front;
pub mod logger;
pub mod models;
pub mod playground;
pub mod services;
pub mod utils;

use ntex::web;
use ntex_cors::Cors;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    logger::setup_simple_logger()?;

    configure_and_run_server().await
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor() -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&config::APP_CONFIG.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                config::APP_CONFIG.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&config::APP_CONFIG.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                config::APP_CONFIG.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Creates application state from the provided service clients
fn create_app_state() -> front::AppState {
    front::AppState {
        account_service: Box::new(services::upstream::AccountApiHandler {
            client: utils::REQUEST_CLIENT.clone(),
        }),
        template_service: Box::new(services::upstream::TemplateApiHandler {
            client: utils::REQUEST_CLIENT.clone(),
        }),
        api_keys: services::api_keys::ApiKeyCache::default(),
        message_client: services::client::MessageClient::new(),
        sessions: tokio::sync::RwLock::new(std::collections::HashMap::new()),
    }
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server() -> anyhow::Result<()> {
    let server_addr = (
        "0.0.0.0",
        u16::try_from(config::APP_CONFIG.web_server_port).unwrap_or(8080),
    );

    let server = web::server(move || {
        web::App::new()
            .wrap(
                Cors::new()
                    .allowed_methods(vec!["GET", "HEAD", "POST", "OPTIONS"])
                    .allowed_origin(&config::APP_CONFIG.cors_allowed_origin)
                    .finish(),
            )
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(create_app_state())
            .configure(front::routes::playground)
    });

    let bound_server = if config::APP_CONFIG.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor()?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
