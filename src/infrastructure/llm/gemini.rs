use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value;

use super::http_client::HttpClientTrait;
use super::sse;
use crate::domain::ai::parse_json_payload;
use crate::domain::{AiProvider, DomainError, ProviderConfig, TextGenerator, TextStream};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Keywords Gemini's `responseSchema` (an OpenAPI subset) rejects
const UNSUPPORTED_SCHEMA_KEYS: [&str; 4] = ["$schema", "$id", "additionalProperties", "definitions"];

/// Google Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> GeminiClient<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_GEMINI_BASE_URL)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, model
        )
    }

    fn headers<'a>(&self, config: &'a ProviderConfig) -> Vec<(&'static str, &'a str)> {
        vec![
            ("x-goog-api-key", config.api_key.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, prompt: &str, schema: Option<&Value>) -> Value {
        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        if let Some(schema) = schema {
            body["generationConfig"] = serde_json::json!({
                "responseMimeType": "application/json",
                "responseSchema": to_gemini_schema(schema),
            });
        }

        body
    }
}

#[async_trait]
impl<C: HttpClientTrait> TextGenerator for GeminiClient<C> {
    async fn generate_text(
        &self,
        config: &ProviderConfig,
        prompt: &str,
    ) -> Result<String, DomainError> {
        let body = self.build_request(prompt, None);
        let response = self
            .client
            .post_json(
                AiProvider::Gemini,
                &self.generate_url(&config.model),
                self.headers(config),
                &body,
            )
            .await?;

        parse_response(response)
    }

    async fn stream_text(
        &self,
        config: &ProviderConfig,
        prompt: &str,
    ) -> Result<TextStream, DomainError> {
        let body = self.build_request(prompt, None);
        let byte_stream = self
            .client
            .post_json_stream(
                AiProvider::Gemini,
                &self.stream_url(&config.model),
                self.headers(config),
                &body,
            )
            .await?;

        let stream = sse::data_events(byte_stream).filter_map(|event| async move {
            match event {
                Ok(data) => parse_stream_event(&data).transpose(),
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
        let body = self.build_request(prompt, Some(schema));
        let response = self
            .client
            .post_json(
                AiProvider::Gemini,
                &self.generate_url(&config.model),
                self.headers(config),
                &body,
            )
            .await?;

        let text = parse_response(response)?;
        parse_json_payload(&text).map_err(|e| {
            DomainError::invalid_response(AiProvider::Gemini, format!("Output is not JSON: {}", e))
        })
    }
}

fn parse_response(json: Value) -> Result<String, DomainError> {
    let response: GeminiResponse = serde_json::from_value(json).map_err(|e| {
        DomainError::invalid_response(AiProvider::Gemini, format!("Failed to parse response: {}", e))
    })?;

    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(DomainError::provider(
            AiProvider::Gemini,
            format!("Prompt blocked: {}", reason),
        ));
    }

    response
        .candidates
        .into_iter()
        .next()
        .map(GeminiCandidate::text)
        .ok_or_else(|| DomainError::invalid_response(AiProvider::Gemini, "No candidates in response"))
}

/// Text delta from one streamed event; `None` when the event carries no text
fn parse_stream_event(data: &str) -> Result<Option<String>, DomainError> {
    let chunk: GeminiResponse = serde_json::from_str(data).map_err(|e| {
        DomainError::invalid_response(AiProvider::Gemini, format!("Malformed stream event: {}", e))
    })?;

    let text = chunk
        .candidates
        .into_iter()
        .next()
        .map(GeminiCandidate::text)
        .filter(|text| !text.is_empty());

    Ok(text)
}

/// Strip JSON Schema keywords Gemini does not accept, recursively
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !UNSUPPORTED_SCHEMA_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), to_gemini_schema(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

// Gemini API types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiCandidate {
    fn text(self) -> String {
        self.content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use serde_json::json;

    const GENERATE_URL: &str =
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";
    const STREAM_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:streamGenerateContent?alt=sse";

    fn config() -> ProviderConfig {
        ProviderConfig::new(AiProvider::Gemini, "gemini-1.5-flash", "g-key")
    }

    fn text_response(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 4, "candidatesTokenCount": 9 }
        })
    }

    #[tokio::test]
    async fn test_generate_text() {
        let client =
            MockHttpClient::new().with_response(GENERATE_URL, text_response("Mumbai is vast."));
        let gemini = GeminiClient::new(client.clone());

        let text = gemini
            .generate_text(&config(), "Describe Mumbai")
            .await
            .unwrap();
        assert_eq!(text, "Mumbai is vast.");

        let request = &client.requests()[0];
        assert_eq!(request.body["contents"][0]["parts"][0]["text"], "Describe Mumbai");
        assert!(request
            .headers
            .contains(&("x-goog-api-key".to_string(), "g-key".to_string())));
        assert!(request.body.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_multiple_parts_are_joined() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": "a" }, { "text": "b" }] } }]
        });
        let client = MockHttpClient::new().with_response(GENERATE_URL, response);

        let text = GeminiClient::new(client)
            .generate_text(&config(), "hi")
            .await
            .unwrap();
        assert_eq!(text, "ab");
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_an_error() {
        let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let client = MockHttpClient::new().with_response(GENERATE_URL, response);

        let error = GeminiClient::new(client)
            .generate_text(&config(), "hi")
            .await
            .unwrap_err();
        assert!(error.to_string().contains("Prompt blocked: SAFETY"));
    }

    #[tokio::test]
    async fn test_no_candidates_is_invalid_response() {
        let client = MockHttpClient::new().with_response(GENERATE_URL, json!({ "candidates": [] }));

        let error = GeminiClient::new(client)
            .generate_text(&config(), "hi")
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            DomainError::InvalidResponse {
                provider: Some(AiProvider::Gemini),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_stream_text() {
        let client = MockHttpClient::new().with_stream_response(
            STREAM_URL,
            vec![
                "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hel\"}]}}]}\r\n\r\n",
                "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"lo\"}]}}]}\r\n\r\n",
                "data: {\"candidates\":[{\"finishReason\":\"STOP\"}]}\r\n\r\n",
            ],
        );

        let stream = GeminiClient::new(client)
            .stream_text(&config(), "hi")
            .await
            .unwrap();
        let chunks: Vec<String> = stream.map(Result::unwrap).collect().await;
        assert_eq!(chunks, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_generate_json_sends_schema() {
        let schema = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "additionalProperties": false,
            "properties": { "city": { "type": "string" } }
        });
        let client = MockHttpClient::new()
            .with_response(GENERATE_URL, text_response("{\"city\": \"Pune\"}"));
        let gemini = GeminiClient::new(client.clone());

        let value = gemini
            .generate_json(&config(), "Pick a city", &schema)
            .await
            .unwrap();
        assert_eq!(value, json!({ "city": "Pune" }));

        let sent = &client.requests()[0].body["generationConfig"];
        assert_eq!(sent["responseMimeType"], "application/json");
        assert!(sent["responseSchema"].get("$schema").is_none());
        assert!(sent["responseSchema"].get("additionalProperties").is_none());
        assert_eq!(sent["responseSchema"]["properties"]["city"]["type"], "string");
    }

    #[tokio::test]
    async fn test_generate_json_rejects_prose() {
        let client =
            MockHttpClient::new().with_response(GENERATE_URL, text_response("I cannot do that"));

        let error = GeminiClient::new(client)
            .generate_json(&config(), "hi", &json!({"type": "object"}))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("Output is not JSON"));
    }

    #[tokio::test]
    async fn test_custom_base_url_and_model() {
        let url = "http://localhost:9000/v1beta/models/gemini-2.0-flash:generateContent";
        let client = MockHttpClient::new().with_response(url, text_response("ok"));
        let gemini = GeminiClient::with_base_url(client, "http://localhost:9000/");

        let config = ProviderConfig::new(AiProvider::Gemini, "gemini-2.0-flash", "k");
        assert_eq!(gemini.generate_text(&config, "hi").await.unwrap(), "ok");
    }
}
