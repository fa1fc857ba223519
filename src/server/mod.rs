// src/server/mod.rs

use crate::config::Config;
use anyhow::Result;
use std::future::Future;
use tokio::net::TcpListener;

mod connection_loop;
mod context;
mod initialization;
mod metrics_server;
mod spawner;

/// The main server startup function: binds the configured address and serves
/// until SIGINT or SIGTERM.
pub async fn run(config: Config) -> Result<()> {
    let listener = initialization::bind(&config).await?;
    run_with_listener(config, listener, connection_loop::shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` completes.
pub async fn run_with_listener<F>(config: Config, listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    // 1. Resolve the repository and build the shared context.
    let mut server_context = initialization::setup(config, listener)?;

    // 2. Spawn background tasks.
    spawner::spawn_all(&mut server_context);

    // 3. Accept connections until shutdown.
    connection_loop::run(server_context, shutdown).await;

    Ok(())
}
