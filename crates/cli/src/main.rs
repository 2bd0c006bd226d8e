//! rt entry point.
//!
//! Results go to stdout as JSON; logs and cache status go to stderr.

use anyhow::Result;
use clap::Parser;
use research_cli::cli::Cli;
use research_cli::commands;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    commands::run(cli).await
}
