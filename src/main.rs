use clap::Parser;
use estate_intel_ai::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Providers => cli::providers::run(),
        Command::AiTest(args) => cli::ai_test::run(args).await,
    }
}
