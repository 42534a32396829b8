use async_trait::async_trait;
use serde_json::Value;

use super::chat_completions::ChatCompletionsClient;
use super::gemini::GeminiClient;
use super::http_client::HttpClientTrait;
use crate::domain::{AiProvider, DomainError, ProviderConfig, TextGenerator, TextStream};

/// Base URLs for each provider's API
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub gemini: String,
    pub deepseek: String,
    pub openai: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            gemini: super::gemini::DEFAULT_GEMINI_BASE_URL.to_string(),
            deepseek: super::chat_completions::DEFAULT_DEEPSEEK_BASE_URL.to_string(),
            openai: super::chat_completions::DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }
}

/// [`TextGenerator`] that routes each call to the client for `config.provider`
#[derive(Debug)]
pub struct HttpTextGenerator<C: HttpClientTrait + Clone> {
    gemini: GeminiClient<C>,
    deepseek: ChatCompletionsClient<C>,
    openai: ChatCompletionsClient<C>,
}

impl<C: HttpClientTrait + Clone> HttpTextGenerator<C> {
    pub fn new(client: C) -> Self {
        Self::with_endpoints(client, &ProviderEndpoints::default())
    }

    pub fn with_endpoints(client: C, endpoints: &ProviderEndpoints) -> Self {
        Self {
            gemini: GeminiClient::with_base_url(client.clone(), &endpoints.gemini),
            deepseek: ChatCompletionsClient::with_base_url(
                client.clone(),
                AiProvider::DeepSeek,
                &endpoints.deepseek,
            ),
            openai: ChatCompletionsClient::with_base_url(
                client,
                AiProvider::OpenAi,
                &endpoints.openai,
            ),
        }
    }

    fn client_for(&self, provider: AiProvider) -> &dyn TextGenerator {
        match provider {
            AiProvider::Gemini => &self.gemini,
            AiProvider::DeepSeek => &self.deepseek,
            AiProvider::OpenAi => &self.openai,
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait + Clone + 'static> TextGenerator for HttpTextGenerator<C> {
    async fn generate_text(
        &self,
        config: &ProviderConfig,
        prompt: &str,
    ) -> Result<String, DomainError> {
        self.client_for(config.provider)
            .generate_text(config, prompt)
            .await
    }

    async fn stream_text(
        &self,
        config: &ProviderConfig,
        prompt: &str,
    ) -> Result<TextStream, DomainError> {
        self.client_for(config.provider)
            .stream_text(config, prompt)
            .await
    }

    async fn generate_json(
        &self,
        config: &ProviderConfig,
        prompt: &str,
        schema: &Value,
    ) -> Result<Value, DomainError> {
        self.client_for(config.provider)
            .generate_json(config, prompt, schema)
            .await
    }
}
