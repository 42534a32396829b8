use std::collections::HashMap;
use std::fmt::Debug;

use super::AiProvider;

/// Snapshot of the API keys available to the registry
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderCredentials {
    keys: HashMap<AiProvider, String>,
}

impl ProviderCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key. Blank keys are ignored so that `KEY=` in an env file means "unset".
    pub fn with_key(mut self, provider: AiProvider, api_key: impl Into<String>) -> Self {
        self.set(provider, api_key);
        self
    }

    pub fn set(&mut self, provider: AiProvider, api_key: impl Into<String>) {
        let api_key = api_key.into();
        if api_key.is_empty() {
            self.keys.remove(&provider);
        } else {
            self.keys.insert(provider, api_key);
        }
    }

    pub fn get(&self, provider: AiProvider) -> Option<&str> {
        self.keys.get(&provider).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut present: Vec<_> = self.keys.keys().collect();
        present.sort();
        f.debug_struct("ProviderCredentials")
            .field("present", &present)
            .finish()
    }
}

/// Where the registry gets its credentials from.
///
/// `load` is called once per registry lookup, so a source backed by mutable
/// state (the process environment) is observed as it is at call time.
pub trait CredentialSource: Send + Sync + Debug {
    fn load(&self) -> ProviderCredentials;
}

/// Fixed credentials, for tests and for embedding the service as a library
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialSource {
    credentials: ProviderCredentials,
}

impl StaticCredentialSource {
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self { credentials }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl CredentialSource for StaticCredentialSource {
    fn load(&self) -> ProviderCredentials {
        self.credentials.clone()
    }
}
