use std::fmt::Debug;
use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;

use super::ProviderConfig;
use crate::domain::DomainError;

/// Incremental text output. Finite, single pass; an `Err` item ends the stream.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, DomainError>> + Send>>;

/// A single call to a single provider.
///
/// Implementations do not retry or fall back; that is the executor's job.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    /// Complete `prompt` and return the generated text
    async fn generate_text(&self, config: &ProviderConfig, prompt: &str)
        -> Result<String, DomainError>;

    /// Complete `prompt`, yielding text deltas as they arrive
    async fn stream_text(&self, config: &ProviderConfig, prompt: &str)
        -> Result<TextStream, DomainError>;

    /// Ask for a JSON value shaped by `schema`. The result is not validated here.
    async fn generate_json(
        &self,
        config: &ProviderConfig,
        prompt: &str,
        schema: &Value,
    ) -> Result<Value, DomainError>;
}
