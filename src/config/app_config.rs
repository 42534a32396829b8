use std::time::Duration;

use serde::Deserialize;

use crate::domain::{AiProvider, ProviderRegistry};
use crate::infrastructure::llm::{
    ProviderEndpoints, DEFAULT_DEEPSEEK_BASE_URL, DEFAULT_GEMINI_BASE_URL, DEFAULT_OPENAI_BASE_URL,
};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub ai: AiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Provider call settings. API keys are not configured here; they are read
/// from `GEMINI_API_KEY`, `DEEPSEEK_API_KEY` and `OPENAI_API_KEY`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Upper bound on a single provider call, in seconds
    pub request_timeout_secs: u64,
    /// Chunks buffered between a streaming provider and its consumer
    pub stream_buffer: usize,
    pub models: ModelOverrides,
    pub base_urls: BaseUrls,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelOverrides {
    pub gemini: Option<String>,
    pub deepseek: Option<String>,
    pub openai: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BaseUrls {
    pub gemini: String,
    pub deepseek: String,
    pub openai: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            stream_buffer: 32,
            models: ModelOverrides::default(),
            base_urls: BaseUrls::default(),
        }
    }
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self {
            gemini: DEFAULT_GEMINI_BASE_URL.to_string(),
            deepseek: DEFAULT_DEEPSEEK_BASE_URL.to_string(),
            openai: DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }
}

impl AiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn endpoints(&self) -> ProviderEndpoints {
        ProviderEndpoints {
            gemini: self.base_urls.gemini.clone(),
            deepseek: self.base_urls.deepseek.clone(),
            openai: self.base_urls.openai.clone(),
        }
    }

    /// Apply configured model overrides to `registry`
    pub fn apply_models(&self, registry: ProviderRegistry) -> ProviderRegistry {
        [
            (AiProvider::Gemini, &self.models.gemini),
            (AiProvider::DeepSeek, &self.models.deepseek),
            (AiProvider::OpenAi, &self.models.openai),
        ]
        .into_iter()
        .fold(registry, |registry, (provider, model)| match model {
            Some(model) => registry.with_model_override(provider, model.clone()),
            None => registry,
        })
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProviderCredentials, StaticCredentialSource};
    use std::sync::Arc;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.ai.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.ai.stream_buffer, 32);
        assert_eq!(config.ai.endpoints().openai, "https://api.openai.com");
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("server.port", 9090)
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .set_override("ai.models.openai", "gpt-4o")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.ai.models.openai.as_deref(), Some("gpt-4o"));
        assert_eq!(config.ai.request_timeout_secs, 60);
    }

    #[test]
    fn test_apply_models() {
        let settings = AiSettings {
            models: ModelOverrides {
                gemini: Some("gemini-2.0-flash".to_string()),
                ..ModelOverrides::default()
            },
            ..AiSettings::default()
        };
        let registry = settings.apply_models(ProviderRegistry::new(Arc::new(
            StaticCredentialSource::new(ProviderCredentials::new()),
        )));

        assert_eq!(registry.model_for(AiProvider::Gemini), "gemini-2.0-flash");
        assert_eq!(registry.model_for(AiProvider::DeepSeek), "deepseek-chat");
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let settings = AiSettings {
            request_timeout_secs: 0,
            ..AiSettings::default()
        };
        assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    }
}
