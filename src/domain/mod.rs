//! Domain layer - Core business logic and entities

pub mod ai;
pub mod error;

pub use ai::{
    AiProvider, CredentialSource, FallbackExecutor, JsonSchemaOutput, OutputSchema,
    ProviderConfig, ProviderCredentials, ProviderRegistry, StaticCredentialSource, TextGenerator,
    TextStream,
};
pub use error::DomainError;
