// src/server/initialization.rs

//! Handles server initialization: resolving the repository and binding the listener.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::AssignmentRepository;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::info;

/// Binds the main listener on the configured host and port.
pub async fn bind(config: &Config) -> Result<TcpListener> {
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    info!("starting up on {} port {}", config.host, config.port);
    Ok(listener)
}

/// Initializes all server components before starting the main loop.
pub fn setup(config: Config, listener: TcpListener) -> Result<ServerContext> {
    let repository = Arc::new(AssignmentRepository::new(config.assignments_root()?));
    info!("Serving assignments from {}", repository.root().display());
    log_startup_info(&config);

    let (shutdown_tx, _) = broadcast::channel(1);

    Ok(ServerContext {
        repository,
        config,
        listener,
        shutdown_tx,
        background_tasks: JoinSet::new(),
    })
}

fn log_startup_info(config: &Config) {
    info!("RAPTOR test server version {}", env!("CARGO_PKG_VERSION"));
    match config.read_timeout() {
        Some(limit) => info!("Client read timeout: {:?}", limit),
        None => info!("Client read timeout disabled; idle clients are kept open."),
    }
}
