use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value;

use super::http_client::HttpClientTrait;
use super::sse;
use crate::domain::ai::parse_json_payload;
use crate::domain::{AiProvider, DomainError, ProviderConfig, TextGenerator, TextStream};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";

/// Client for OpenAI-style `/v1/chat/completions` APIs (OpenAI and DeepSeek)
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient<C: HttpClientTrait> {
    client: C,
    provider: AiProvider,
    base_url: String,
}

impl<C: HttpClientTrait> ChatCompletionsClient<C> {
    pub fn openai(client: C) -> Self {
        Self::with_base_url(client, AiProvider::OpenAi, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn deepseek(client: C) -> Self {
        Self::with_base_url(client, AiProvider::DeepSeek, DEFAULT_DEEPSEEK_BASE_URL)
    }

    pub fn with_base_url(client: C, provider: AiProvider, base_url: impl Into<String>) -> Self {
        Self {
            client,
            provider,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(
        &self,
        config: &ProviderConfig,
        prompt: &str,
        stream: bool,
        schema: Option<&Value>,
    ) -> Value {
        let mut messages = Vec::new();

        // DeepSeek only supports free-form JSON mode, so the schema goes in the prompt
        if let (Some(schema), AiProvider::DeepSeek) = (schema, self.provider) {
            messages.push(serde_json::json!({
                "role": "system",
                "content": format!(
                    "Respond only with a JSON object that conforms to this JSON Schema:\n{}",
                    schema
                ),
            }));
        }

        messages.push(serde_json::json!({ "role": "user", "content": prompt }));

        let mut body = serde_json::json!({
            "model": config.model,
            "messages": messages,
            "stream": stream,
        });

        if let Some(schema) = schema {
            body["response_format"] = match self.provider {
                AiProvider::DeepSeek => serde_json::json!({ "type": "json_object" }),
                _ => serde_json::json!({
                    "type": "json_schema",
                    "json_schema": {
                        "name": "structured_output",
                        "strict": false,
                        "schema": schema
                    }
                }),
            };
        }

        body
    }

    fn parse_response(&self, json: Value) -> Result<String, DomainError> {
        let response: ChatResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::invalid_response(self.provider, format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::invalid_response(self.provider, "No choices in response"))?;

        choice
            .message
            .content
            .ok_or_else(|| DomainError::invalid_response(self.provider, "No content in response"))
    }
}

#[async_trait]
impl<C: HttpClientTrait> TextGenerator for ChatCompletionsClient<C> {
    async fn generate_text(
        &self,
        config: &ProviderConfig,
        prompt: &str,
    ) -> Result<String, DomainError> {
        let auth_header = format!("Bearer {}", config.api_key);
        let body = self.build_request(config, prompt, false, None);
        let response = self
            .client
            .post_json(
                self.provider,
                &self.chat_completions_url(),
                headers(&auth_header),
                &body,
            )
            .await?;

        self.parse_response(response)
    }

    async fn stream_text(
        &self,
        config: &ProviderConfig,
        prompt: &str,
    ) -> Result<TextStream, DomainError> {
        let auth_header = format!("Bearer {}", config.api_key);
        let body = self.build_request(config, prompt, true, None);
        let byte_stream = self
            .client
            .post_json_stream(
                self.provider,
                &self.chat_completions_url(),
                headers(&auth_header),
                &body,
            )
            .await?;

        let provider = self.provider;
        let stream = sse::data_events(byte_stream)
            .take_while(|event| {
                let done = matches!(event, Ok(data) if data.trim() == "[DONE]");
                async move { !done }
            })
            .filter_map(move |event| async move {
                match event {
                    Ok(data) => parse_stream_chunk(provider, &data).transpose(),
                    Err(e) => Some(Err(e)),
                }
            });

        Ok(Box::pin(stream))
    }

    async fn generate_json(
        &self,
        config: &ProviderConfig,
        prompt: &str,
        schema: &Value,
    ) -> Result<Value, DomainError> {
        let auth_header = format!("Bearer {}", config.api_key);
        let body = self.build_request(config, prompt, false, Some(schema));
        let response = self
            .client
            .post_json(
                self.provider,
                &self.chat_completions_url(),
                headers(&auth_header),
                &body,
            )
            .await?;

        let text = self.parse_response(response)?;
        parse_json_payload(&text).map_err(|e| {
            DomainError::invalid_response(self.provider, format!("Output is not JSON: {}", e))
        })
    }
}

fn headers(auth_header: &str) -> Vec<(&str, &str)> {
    vec![
        ("Authorization", auth_header),
        ("Content-Type", "application/json"),
    ]
}

/// Text delta from one streamed chunk; `None` for role-only or finish chunks
fn parse_stream_chunk(provider: AiProvider, data: &str) -> Result<Option<String>, DomainError> {
    let chunk: ChatStreamChunk = serde_json::from_str(data).map_err(|e| {
        DomainError::invalid_response(provider, format!("Malformed stream chunk: {}", e))
    })?;

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty()))
}

// Chat completions API types

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatStreamChunk {
    #[serde(default)]
    choices: Vec<ChatStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatStreamChoice {
    delta: ChatDelta,
}

#[derive(Debug, Deserialize)]
struct ChatDelta {
    content: Option<String>,
}
