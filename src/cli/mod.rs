//! CLI module for Estate Intel AI
//!
//! - `serve`: HTTP API server
//! - `providers`: show configured providers and their fallback roles
//! - `ai-test`: run one generation against the configured providers

pub mod ai_test;
pub mod providers;
pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Estate Intel AI - text generation with ordered provider fallback
#[derive(Parser)]
#[command(name = "estate-intel-ai")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// List configured AI providers in fallback order
    Providers,

    /// Send one prompt through the fallback chain
    AiTest(ai_test::AiTestArgs),
}

/// Load `.env`, then layered configuration, then install logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    Ok(config)
}
