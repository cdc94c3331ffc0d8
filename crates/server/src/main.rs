//! vin-mcp server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;
use vinlookup_client::ResolutionService;
use vinlookup_core::AppConfig;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let service = ResolutionService::from_config(&config).await?;

    tracing::info!(db_path = %config.db_path.display(), base_url = %config.base_url, "Starting vin-mcp server on stdio transport");

    let service = Arc::new(service);
    let handler = handler::VinLookupServer::new(Arc::clone(&service));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    service.store().clone().close().await?;
    tracing::info!("record store closed");

    Ok(())
}
