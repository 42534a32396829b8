//! Fallback executor - tries each configured provider in priority order

use std::future::Future;

use tracing::{error, info, warn};

use super::{AiProvider, ProviderConfig, ProviderRegistry};
use crate::domain::DomainError;

/// Runs a unit of work against configured providers until one succeeds.
///
/// Attempts are strictly sequential and each provider is tried at most once.
/// There is no backoff and no timeout here; a hung provider call is only
/// abandoned if the call itself times out.
#[derive(Debug, Clone)]
pub struct FallbackExecutor {
    registry: ProviderRegistry,
}

impl FallbackExecutor {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Return the first successful result of `work`, trying providers in order
    pub async fn run<T, F, Fut>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnMut(ProviderConfig) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        self.run_with_observer(work, |_, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_switch` each time a failed provider
    /// is about to be replaced by the next one. It is not called for the last
    /// provider since nothing is switched to.
    pub async fn run_with_observer<T, F, Fut, O>(
        &self,
        mut work: F,
        mut on_switch: O,
    ) -> Result<T, DomainError>
    where
        F: FnMut(ProviderConfig) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
        O: FnMut(AiProvider, &DomainError),
    {
        let configs = self.registry.list_configured();

        if configs.is_empty() {
            error!("No AI provider configured");
            return Err(DomainError::NoProviderConfigured);
        }

        let total = configs.len();
        let mut last_error: Option<DomainError> = None;

        for (index, config) in configs.into_iter().enumerate() {
            let provider = config.provider;
            info!(provider = %provider, model = %config.model, attempt = index + 1, "Attempting AI request");

            match work(config).await {
                Ok(result) => {
                    if index > 0 {
                        info!(
                            provider = %provider,
                            failed_attempts = index,
                            "Fell back to provider after failed attempt(s)"
                        );
                    }
                    return Ok(result);
                }
                Err(e) => {
                    warn!(provider = %provider, error = %e, "AI provider failed");

                    if index + 1 < total {
                        on_switch(provider, &e);
                    }

                    last_error = Some(e);
                }
            }
        }

        let last_error = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());

        error!(attempts = total, last_error = %last_error, "All AI providers failed");

        Err(DomainError::AllProvidersFailed {
            attempts: total,
            last_error,
        })
    }
}
