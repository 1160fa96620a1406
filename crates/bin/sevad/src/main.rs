//! # sevad — seva daemon
//!
//! Composition root that wires the adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`seva.toml` + environment overrides)
//! - Initialize `tracing` from the configured filter
//! - Open the configured document store (filesystem or in-memory)
//! - Construct application services and the axum router
//! - Bind to a TCP port and serve until SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use seva_adapter_http_axum::router;
use seva_adapter_http_axum::state::AppState;
use seva_app::memory_store::InMemoryDocumentStore;
use seva_app::ports::DocumentStore;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match config.storage.backend {
        StorageBackend::Fs => {
            let store = seva_adapter_storage_fs::Config {
                data_dir: config.storage.data_dir.clone(),
            }
            .build()
            .await
            .context("opening data directory")?;
            tracing::info!(data_dir = %store.root().display(), "using filesystem storage");
            serve(&config, Arc::new(store)).await
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, nothing will be persisted");
            serve(&config, Arc::new(InMemoryDocumentStore::new())).await
        }
    }
}

async fn serve<S>(config: &Config, store: Arc<S>) -> anyhow::Result<()>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let app = router::build(AppState::from_store(store));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "sevad listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    tracing::info!("sevad stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown requested");
}
