use std::env;
use std::fmt;
use std::sync::Arc;

use crate::domain::{AiProvider, CredentialSource, ProviderCredentials};

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Credential source that reads `GEMINI_API_KEY`, `DEEPSEEK_API_KEY` and
/// `OPENAI_API_KEY` each time it is loaded
#[derive(Clone)]
pub struct EnvCredentialSource {
    lookup: Lookup,
}

impl EnvCredentialSource {
    pub fn new() -> Self {
        Self::with_lookup(|name| env::var(name).ok())
    }

    /// Read variables through `lookup` instead of the process environment
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}

impl Default for EnvCredentialSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvCredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvCredentialSource").finish_non_exhaustive()
    }
}

impl CredentialSource for EnvCredentialSource {
    fn load(&self) -> ProviderCredentials {
        AiProvider::PRIORITY
            .into_iter()
            .fold(ProviderCredentials::new(), |credentials, provider| {
                match (self.lookup)(provider.env_var()) {
                    Some(key) => credentials.with_key(provider, key),
                    None => credentials,
                }
            })
    }
}
