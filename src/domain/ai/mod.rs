//! AI text generation: providers, registry, and ordered fallback

mod credentials;
mod fallback;
mod generator;
mod provider;
mod registry;
mod schema;

pub use credentials::{CredentialSource, ProviderCredentials, StaticCredentialSource};
pub use fallback::FallbackExecutor;
pub use generator::{TextGenerator, TextStream};
pub use provider::{role_label, AiProvider, ProviderConfig};
pub use registry::ProviderRegistry;
pub use schema::{parse_json_payload, JsonSchemaOutput, OutputSchema};

#[cfg(test)]
pub use generator::mock::{Outcome, ScriptedGenerator};
