//! Credential source implementations

mod env_provider;

pub use env_provider::EnvCredentialSource;
