//! HTTP server command
//!
//! Runs the waiting list API against MongoDB, or an in-memory store with `--memory`.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use ambulance_core::{Ambulance, DocumentStore, MemoryDocumentStore, MongoDocumentStore, StoreConfig};
use ambulance_server::{run_server, AppState, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on (default: 8080)
    #[arg(long, short = 'p', env = "AMBULANCE_API_PORT")]
    pub port: Option<u16>,

    /// Keep documents in process memory instead of MongoDB
    #[arg(long)]
    pub memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = ServerConfig::from_env();
    if let Some(port) = args.port {
        config.bind_addr.set_port(port);
    }

    let store: Arc<dyn DocumentStore<Ambulance>> = if args.memory {
        tracing::warn!("Using in-memory store, documents are lost on exit");
        Arc::new(MemoryDocumentStore::new())
    } else {
        let store_config = StoreConfig::from_env();
        tracing::info!(uri = %store_config.redacted(), "Using MongoDB document store");
        Arc::new(MongoDocumentStore::new(store_config))
    };

    tracing::info!("Starting ambulance-wl server on {}", config.bind_addr);

    // Blocks until shutdown
    run_server(AppState::new(store), config)
        .await
        .context("Server error")?;

    Ok(())
}
