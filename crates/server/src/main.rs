//! mcp-dejure server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use dejure_client::{Annotator, DejureClient, DejureConfig};
use dejure_core::{AppConfig, CacheDb};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    let cache = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache at {}", config.db_path.display()))?;
    let purged = cache.purge_expired_annotations().await?;
    tracing::info!(purged, db = %config.db_path.display(), "opened annotation cache");

    let client = DejureClient::new(DejureConfig { endpoint: config.endpoint.clone() })?;
    let annotator = Annotator::new(Arc::new(client), Arc::new(cache.clone()));

    tracing::info!(endpoint = %config.endpoint, "Starting mcp-dejure server on stdio transport");

    let handler = handler::DejureServer::new(annotator, cache, config.annotation);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
