//! AI service - text, streamed text and structured generation over the fallback executor

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info};

use crate::domain::{
    AiProvider, DomainError, FallbackExecutor, OutputSchema, ProviderRegistry, TextGenerator,
    TextStream,
};

const DEFAULT_STREAM_BUFFER: usize = 32;

/// Caller-facing generation operations
#[derive(Debug, Clone)]
pub struct AiService {
    executor: FallbackExecutor,
    generator: Arc<dyn TextGenerator>,
    stream_buffer: usize,
}

impl AiService {
    pub fn new(registry: ProviderRegistry, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            executor: FallbackExecutor::new(registry),
            generator,
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }

    /// Number of chunks buffered between the provider task and the consumer
    pub fn with_stream_buffer(mut self, stream_buffer: usize) -> Self {
        self.stream_buffer = stream_buffer.max(1);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        self.executor.registry()
    }

    /// Configured provider names in fallback order
    pub fn configured_providers(&self) -> Vec<&'static str> {
        self.registry().configured_names()
    }

    /// Generate text, falling back through every configured provider
    pub async fn generate_text(&self, prompt: &str) -> Result<String, DomainError> {
        let prompt = require_prompt(prompt)?;

        self.executor
            .run(|config| {
                let generator = Arc::clone(&self.generator);
                let prompt = prompt.to_string();
                async move { generator.generate_text(&config, &prompt).await }
            })
            .await
    }

    /// Generate text like [`generate_text`](Self::generate_text), reporting each
    /// provider switch to `on_switch`
    pub async fn generate_text_observed<O>(
        &self,
        prompt: &str,
        on_switch: O,
    ) -> Result<String, DomainError>
    where
        O: FnMut(AiProvider, &DomainError),
    {
        let prompt = require_prompt(prompt)?;

        self.executor
            .run_with_observer(
                |config| {
                    let generator = Arc::clone(&self.generator);
                    let prompt = prompt.to_string();
                    async move { generator.generate_text(&config, &prompt).await }
                },
                on_switch,
            )
            .await
    }

    /// Stream text from the primary provider only.
    ///
    /// Partial output may already have reached the consumer when a provider
    /// fails, so there is no fallback here: the error is delivered as the last
    /// stream item instead.
    pub async fn stream_text(&self, prompt: &str) -> Result<TextStream, DomainError> {
        let prompt = require_prompt(prompt)?.to_string();
        let config = self
            .registry()
            .primary()
            .ok_or(DomainError::NoProviderConfigured)?;

        let (tx, rx) = mpsc::channel(self.stream_buffer);
        let generator = Arc::clone(&self.generator);

        tokio::spawn(async move {
            let provider = config.provider;
            info!(provider = %provider, model = %config.model, "Starting AI text stream");

            let mut stream = match generator.stream_text(&config, &prompt).await {
                Ok(stream) => stream,
                Err(e) => {
                    error!(provider = %provider, error = %e, "Stream AI text error");
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            };

            while let Some(item) = stream.next().await {
                let failed = item.is_err();

                if let Err(ref e) = item {
                    error!(provider = %provider, error = %e, "Stream AI text error");
                }

                if tx.send(item).await.is_err() {
                    debug!(provider = %provider, "Stream consumer dropped");
                    return;
                }

                if failed {
                    return;
                }
            }

            debug!(provider = %provider, "AI text stream finished");
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    /// Generate an object conforming to `schema`, falling back through every
    /// configured provider. Output that fails validation counts as a failed attempt.
    pub async fn generate_object<T, S>(&self, prompt: &str, schema: &S) -> Result<T, DomainError>
    where
        S: OutputSchema<T>,
        T: Send,
    {
        let prompt = require_prompt(prompt)?;

        self.executor
            .run(|config| {
                let generator = Arc::clone(&self.generator);
                let prompt = prompt.to_string();
                async move {
                    let value = generator
                        .generate_json(&config, &prompt, schema.json_schema())
                        .await?;
                    schema.decode(value)
                }
            })
            .await
    }
}

fn require_prompt(prompt: &str) -> Result<&str, DomainError> {
    if prompt.is_empty() {
        return Err(DomainError::validation("Prompt is required"));
    }
    Ok(prompt)
}
