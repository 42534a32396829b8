//! Provider registry - which providers are usable, in what order

use std::collections::HashMap;
use std::sync::Arc;

use super::{AiProvider, CredentialSource, ProviderConfig};

/// Computes the ordered list of configured providers from a credential source.
///
/// Nothing is cached: every call reloads the source, so the result is a pure
/// function of the credentials present at call time.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    source: Arc<dyn CredentialSource>,
    model_overrides: HashMap<AiProvider, String>,
}

impl ProviderRegistry {
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self {
            source,
            model_overrides: HashMap::new(),
        }
    }

    /// Use `model` instead of the provider's default model
    pub fn with_model_override(mut self, provider: AiProvider, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.model_overrides.insert(provider, model);
        }
        self
    }

    pub fn model_for(&self, provider: AiProvider) -> &str {
        self.model_overrides
            .get(&provider)
            .map(String::as_str)
            .unwrap_or_else(|| provider.default_model())
    }

    /// Configured providers in priority order: Gemini, DeepSeek, OpenAI
    pub fn list_configured(&self) -> Vec<ProviderConfig> {
        let credentials = self.source.load();

        AiProvider::PRIORITY
            .into_iter()
            .filter_map(|provider| {
                credentials
                    .get(provider)
                    .map(|key| ProviderConfig::new(provider, self.model_for(provider), key))
            })
            .collect()
    }

    pub fn primary(&self) -> Option<ProviderConfig> {
        self.list_configured().into_iter().next()
    }

    pub fn configured_names(&self) -> Vec<&'static str> {
        self.list_configured()
            .iter()
            .map(|config| config.provider.as_str())
            .collect()
    }

    pub fn has_any(&self) -> bool {
        !self.source.load().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ai::{ProviderCredentials, StaticCredentialSource};

    fn registry(providers: &[AiProvider]) -> ProviderRegistry {
        let credentials = providers
            .iter()
            .fold(ProviderCredentials::new(), |creds, p| {
                creds.with_key(*p, format!("{}-key", p))
            });
        ProviderRegistry::new(Arc::new(StaticCredentialSource::new(credentials)))
    }

    #[test]
    fn test_empty_registry() {
        let registry = registry(&[]);
        assert!(registry.list_configured().is_empty());
        assert!(registry.primary().is_none());
        assert!(registry.configured_names().is_empty());
        assert!(!registry.has_any());
    }

    #[test]
    fn test_every_subset_is_listed_in_priority_order() {
        use AiProvider::*;
        let all = [Gemini, DeepSeek, OpenAi];

        for mask in 0u8..8 {
            let subset: Vec<AiProvider> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, p)| *p)
                .collect();

            // insertion order must not matter
            let mut reversed = subset.clone();
            reversed.reverse();
            let registry = registry(&reversed);

            let listed: Vec<AiProvider> =
                registry.list_configured().iter().map(|c| c.provider).collect();
            assert_eq!(listed, subset, "mask {:03b}", mask);
        }
    }

    #[test]
    fn test_configs_carry_default_model_and_key() {
        let registry = registry(&[AiProvider::OpenAi, AiProvider::Gemini]);
        let configs = registry.list_configured();

        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].provider, AiProvider::Gemini);
        assert_eq!(configs[0].model, "gemini-1.5-flash");
        assert_eq!(configs[0].api_key, "gemini-key");
        assert_eq!(configs[1].provider, AiProvider::OpenAi);
        assert_eq!(configs[1].model, "gpt-4o-mini");
    }

    #[test]
    fn test_primary_and_names() {
        let registry = registry(&[AiProvider::OpenAi, AiProvider::DeepSeek]);
        assert_eq!(registry.primary().unwrap().provider, AiProvider::DeepSeek);
        assert_eq!(registry.configured_names(), vec!["deepseek", "openai"]);
        assert!(registry.has_any());
    }

    #[test]
    fn test_model_override() {
        let registry = registry(&[AiProvider::DeepSeek])
            .with_model_override(AiProvider::DeepSeek, "deepseek-reasoner")
            .with_model_override(AiProvider::OpenAi, " ");

        assert_eq!(registry.primary().unwrap().model, "deepseek-reasoner");
        assert_eq!(registry.model_for(AiProvider::OpenAi), "gpt-4o-mini");
    }
}
