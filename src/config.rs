//! Application configuration management.
//!
//! This module handles all configuration values required for the playground
//! service. Sensitive fields are clearly marked; production environments
//! should provide them through a secret management system.

use envconfig::Envconfig;
use std::sync::LazyLock;

/// Application configuration loaded from environment variables.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Host address for web server binding (NON-SENSITIVE)
    /// Example: "0.0.0.0", "localhost"
    #[envconfig(default = "0.0.0.0")]
    pub web_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "8080")]
    pub web_server_port: u64,

    /// Path to SSL private key file (SENSITIVE PATH)
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file (NON-SENSITIVE)
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// Origin allowed to call the playground API from a browser (NON-SENSITIVE)
    #[envconfig(default = "http://localhost:3000")]
    pub cors_allowed_origin: String,

    /// Graph API version segment used when building message endpoints (NON-SENSITIVE)
    #[envconfig(default = "v21.0")]
    pub graph_api_version: String,

    /// Base URL of the generic messaging gateway (NON-SENSITIVE)
    #[envconfig(default = "https://api.sendzen.io")]
    pub gateway_base_url: String,

    /// Base URL of the account-lookup and template services (NON-SENSITIVE)
    #[envconfig(default = "http://localhost:9090")]
    pub upstream_base_url: String,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Graph API endpoint for sending messages through a phone number
    pub fn graph_messages_endpoint(&self, phone_number_id: &str) -> String {
        format!(
            "https://graph.facebook.com/{version}/{phone_number_id}/messages",
            version = self.graph_api_version
        )
    }

    /// Generic gateway endpoint for sending messages
    pub fn gateway_messages_endpoint(&self) -> String {
        format!(
            "{base}/v1/messages",
            base = self.gateway_base_url.trim_end_matches('/')
        )
    }

    /// Upstream service endpoint for the given path
    pub fn upstream_endpoint(&self, path: &str) -> String {
        format!(
            "{base}/v1{path}",
            base = self.upstream_base_url.trim_end_matches('/')
        )
    }
}

/// Global application configuration instance.
///
/// The configuration is loaded on first access. If loading fails, the
/// application panics with a descriptive error message.
pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(|| {
    AppConfig::init_from_env()
        .expect("Failed to load application configuration. Check environment variables.")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_messages_endpoint() {
        assert_eq!(
            APP_CONFIG.graph_messages_endpoint("12345"),
            "https://graph.facebook.com/v21.0/12345/messages"
        );
    }

    #[test]
    fn test_gateway_messages_endpoint() {
        assert_eq!(
            APP_CONFIG.gateway_messages_endpoint(),
            "https://api.sendzen.io/v1/messages"
        );
    }
}
