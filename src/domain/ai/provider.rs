use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// The closed set of text-generation providers, declared in fallback priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Gemini,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openai")]
    OpenAi,
}

impl AiProvider {
    /// Every provider, highest priority first
    pub const PRIORITY: [AiProvider; 3] = [Self::Gemini, Self::DeepSeek, Self::OpenAi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::DeepSeek => "deepseek",
            Self::OpenAi => "openai",
        }
    }

    /// Environment variable holding the provider's API key
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::DeepSeek => "DEEPSEEK_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::DeepSeek => "deepseek-chat",
            Self::OpenAi => "gpt-4o-mini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::DeepSeek => "DeepSeek",
            Self::OpenAi => "OpenAI",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::PRIORITY
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("Unknown AI provider: {}", s)))
    }
}

/// Label for a provider's position in the configured list
pub fn role_label(position: usize) -> &'static str {
    match position {
        0 => "Primary",
        1 => "Backup",
        _ => "Fallback",
    }
}

/// Everything needed to call one provider. Built per request, never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: AiProvider,
    pub model: String,
    pub api_key: String,
}

impl ProviderConfig {
    pub fn new(provider: AiProvider, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// `provider/model`, the form used when reporting which model served a request
    pub fn model_string(&self) -> String {
        format!("{}/{}", self.provider, self.model)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert_eq!(
            AiProvider::PRIORITY,
            [AiProvider::Gemini, AiProvider::DeepSeek, AiProvider::OpenAi]
        );
        assert!(AiProvider::Gemini < AiProvider::DeepSeek);
        assert!(AiProvider::DeepSeek < AiProvider::OpenAi);
    }

    #[test]
    fn test_serialization_uses_wire_names() {
        let json = serde_json::to_string(&AiProvider::PRIORITY).unwrap();
        assert_eq!(json, r#"["gemini","deepseek","openai"]"#);

        let parsed: AiProvider = serde_json::from_str("\"deepseek\"").unwrap();
        assert_eq!(parsed, AiProvider::DeepSeek);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("OpenAI".parse::<AiProvider>().unwrap(), AiProvider::OpenAi);
        assert_eq!(" gemini ".parse::<AiProvider>().unwrap(), AiProvider::Gemini);
        assert!("anthropic".parse::<AiProvider>().is_err());
    }

    #[test]
    fn test_model_string() {
        let config = ProviderConfig::new(AiProvider::Gemini, "gemini-1.5-flash", "key");
        assert_eq!(config.model_string(), "gemini/gemini-1.5-flash");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ProviderConfig::new(AiProvider::OpenAi, "gpt-4o-mini", "sk-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(role_label(0), "Primary");
        assert_eq!(role_label(1), "Backup");
        assert_eq!(role_label(2), "Fallback");
    }
}
