//! `dejure` command-line entry point.
//!
//! Reads a fragment from a file or stdin, annotates it and writes the
//! result to stdout. Logs go to stderr.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dejure_client::{Annotator, DejureClient, DejureConfig};
use dejure_core::cache::fingerprint;
use dejure_core::{AppConfig, CacheDb, CacheStore, MemoryCache};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("loading configuration")?;

    match cli.command {
        Commands::Annotate { file, overrides, no_cache, json } => {
            let text = read_input(file.as_deref()).await?;
            let settings = overrides.apply(config.annotation.clone());
            let annotation = settings.parse()?;

            let cache: Arc<dyn CacheStore> = if no_cache {
                Arc::new(MemoryCache::new())
            } else {
                Arc::new(CacheDb::open(&config.db_path).await?)
            };
            let client = DejureClient::new(DejureConfig { endpoint: config.endpoint.clone() })?;

            let outcome = Annotator::new(Arc::new(client), cache).annotate_with(&text, &annotation).await;
            tracing::info!(path = %outcome.path, from_cache = outcome.from_cache, "annotation finished");

            let rendered = if json { serde_json::to_string(&outcome)? } else { outcome.text };
            write_output(&rendered).await?;
        }
        Commands::Fingerprint { file, overrides } => {
            let text = read_input(file.as_deref()).await?;
            let annotation = overrides.apply(config.annotation.clone()).parse()?;
            write_output(&fingerprint(&text, &annotation)).await?;
        }
        Commands::Purge { all } => {
            let cache = CacheDb::open(&config.db_path).await?;
            let deleted =
                if all { cache.purge_all_annotations().await? } else { cache.purge_expired_annotations().await? };
            write_output(&format!("deleted {deleted} entries")).await?;
        }
    }

    Ok(())
}

async fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await.context("reading stdin")?;
            Ok(text)
        }
    }
}

async fn write_output(text: &str) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}

