//! research-mcp: research source tools and cache maintenance over MCP.
//!
//! JSON-RPC runs on stdin/stdout, so structured logs are written to stderr.

use anyhow::Result;
use research_client::Research;
use research_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let research = Research::from_config(&config).await?;
    tracing::info!(
        db_path = %config.db_path.display(),
        serper = config.serper_api_key.is_some(),
        devto_key = config.devto_api_key.is_some(),
        "research-mcp ready, serving on stdio"
    );

    let service = serve_server(handler::ResearchServer::new(research), stdio()).await?;
    service.waiting().await?;
    tracing::info!("research-mcp stopped");

    Ok(())
}
