use reqwest::Client;

use crate::config::AuditSettings;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy)]
pub enum ClientType {
    /// Page and link requests, follows redirects
    Standard,
    /// Third-party API calls; no custom user agent
    Api,
}

/// Factory for the HTTP clients shared by the collaborators.
pub fn create_client(client_type: ClientType, settings: &AuditSettings) -> Result<Client> {
    let builder = Client::builder().timeout(settings.request_timeout());

    let builder = match client_type {
        ClientType::Standard => builder.user_agent(settings.user_agent.as_str()),
        ClientType::Api => builder,
    };

    builder
        .build()
        .map_err(|e| AppError::network(format!("Failed to build {:?} HTTP client: {}", client_type, e)))
}
