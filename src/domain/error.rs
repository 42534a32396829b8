use thiserror::Error;

use super::ai::AiProvider;

/// Core domain errors
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error(
        "No AI API keys configured. Please add OPENAI_API_KEY, DEEPSEEK_API_KEY, or GEMINI_API_KEY to environment variables."
    )]
    NoProviderConfigured,

    #[error("{provider} request failed: {message}")]
    Provider {
        provider: AiProvider,
        message: String,
    },

    #[error("Invalid response{}: {message}", provider_suffix(.provider))]
    InvalidResponse {
        provider: Option<AiProvider>,
        message: String,
    },

    #[error("All AI providers failed. Last error: {last_error}")]
    AllProvidersFailed { attempts: usize, last_error: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

fn provider_suffix(provider: &Option<AiProvider>) -> String {
    provider
        .map(|p| format!(" from {}", p))
        .unwrap_or_default()
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: AiProvider, message: impl Into<String>) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
        }
    }

    pub fn invalid_response(provider: AiProvider, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: Some(provider),
            message: message.into(),
        }
    }

    /// Invalid output that could not be attributed to a provider (schema decoding)
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: None,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
