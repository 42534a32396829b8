//! Estate Intel AI
//!
//! Text generation over Gemini, DeepSeek and OpenAI with ordered fallback:
//! - Credentials read from the environment on every request
//! - Plain, streamed and schema-validated structured generation
//! - HTTP API and operator CLI

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{DomainError, ProviderRegistry};
use infrastructure::{
    credentials::EnvCredentialSource,
    llm::{HttpClient, HttpTextGenerator},
    services::AiService,
};
use tracing::info;

/// Build the generation service from configuration, reading credentials from
/// the process environment
pub fn create_ai_service(config: &AppConfig) -> Result<AiService, DomainError> {
    let client = HttpClient::with_timeout(config.ai.request_timeout())?;
    let generator = HttpTextGenerator::with_endpoints(client, &config.ai.endpoints());
    let registry = config
        .ai
        .apply_models(ProviderRegistry::new(Arc::new(EnvCredentialSource::new())));

    let service =
        AiService::new(registry, Arc::new(generator)).with_stream_buffer(config.ai.stream_buffer);

    info!(
        providers = ?service.configured_providers(),
        timeout_secs = config.ai.request_timeout().as_secs(),
        "AI service initialized"
    );

    Ok(service)
}

/// Create the application state with all services initialized
pub fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    Ok(AppState::new(Arc::new(create_ai_service(config)?)))
}
