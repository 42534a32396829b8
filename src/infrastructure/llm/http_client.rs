use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::domain::{AiProvider, DomainError};

/// Stream type for HTTP responses
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, DomainError>> + Send>>;

/// Trait for HTTP client operations (for mocking)
///
/// `provider` only labels errors; it does not influence the request.
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        provider: AiProvider,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;

    async fn post_json_stream(
        &self,
        provider: AiProvider,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<ByteStream, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: None,
        }
    }

    /// Client bounded by `timeout`.
    ///
    /// A JSON call must complete within `timeout`. A stream may run longer, but
    /// is abandoned once no bytes arrive for `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: Some(timeout),
        })
    }

    async fn send(
        &self,
        provider: AiProvider,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
        total_timeout: Option<Duration>,
    ) -> Result<reqwest::Response, DomainError> {
        let mut request = self.client.post(url);

        if let Some(timeout) = total_timeout {
            request = request.timeout(timeout);
        }

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::provider(provider, format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                provider,
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        Ok(response)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        provider: AiProvider,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        self.send(provider, url, headers, body, self.timeout)
            .await?
            .json()
            .await
            .map_err(|e| {
                DomainError::invalid_response(provider, format!("Failed to parse response: {}", e))
            })
    }

    async fn post_json_stream(
        &self,
        provider: AiProvider,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<ByteStream, DomainError> {
        let response = self.send(provider, url, headers, body, None).await?;

        let stream = response.bytes_stream().map(move |result| {
            result.map_err(|e| DomainError::provider(provider, format!("Stream error: {}", e)))
        });

        Ok(Box::pin(stream))
    }
}
