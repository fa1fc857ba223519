// src/server/spawner.rs

//! Spawns the server's long-running background tasks.

use super::context::ServerContext;
use super::metrics_server;
use tracing::info;

/// Spawns all background tasks into the context's JoinSet.
pub fn spawn_all(ctx: &mut ServerContext) {
    if ctx.config.metrics.enabled {
        let port = ctx.config.metrics.port;
        let shutdown_rx = ctx.shutdown_tx.subscribe();
        ctx.background_tasks
            .spawn(async move { metrics_server::run_metrics_server(port, shutdown_rx).await });
    } else {
        info!("Prometheus metrics server is disabled in the configuration.");
    }
}
