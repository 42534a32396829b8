//! AI test command - sends one prompt through the configured providers

use std::io::Write;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Args;
use futures::StreamExt;
use tracing::info;

use crate::api::ai::summary_message;
use crate::infrastructure::services::AiService;

pub const DEFAULT_PROMPT: &str = "Describe Mumbai in one sentence.";

#[derive(Args, Debug, Clone)]
pub struct AiTestArgs {
    /// Prompt to send
    #[arg(long, default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// Stream the answer from the primary provider instead of using fallback
    #[arg(long)]
    pub stream: bool,
}

/// Run one generation and report the providers, output and elapsed time
pub async fn run(args: AiTestArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let service = crate::create_ai_service(&config)?;

    let providers = service.configured_providers();
    println!("{}", summary_message(&providers));
    if providers.is_empty() {
        bail!("no AI provider configured");
    }

    info!(stream = args.stream, "Running AI test");
    let start = Instant::now();

    if args.stream {
        stream(&service, &args.prompt).await?;
    } else {
        let text = service
            .generate_text_observed(&args.prompt, |provider, e| {
                eprintln!("{} failed ({}), trying next provider", provider, e);
            })
            .await
            .context("Text generation failed")?;
        println!("{}", text);
    }

    println!("Completed in {} ms", start.elapsed().as_millis());

    Ok(())
}

async fn stream(service: &AiService, prompt: &str) -> anyhow::Result<()> {
    let mut chunks = service
        .stream_text(prompt)
        .await
        .context("Failed to start text stream")?;
    let mut stdout = std::io::stdout();

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.context("Text stream failed")?;
        stdout.write_all(chunk.as_bytes())?;
        stdout.flush()?;
    }
    writeln!(stdout)?;

    Ok(())
}
