//! Application configuration

mod app_config;

pub use app_config::{AiSettings, AppConfig, BaseUrls, LogFormat, LoggingConfig, ModelOverrides, ServerConfig};
