// src/server/connection_loop.rs

//! Contains the main server loop for accepting connections and handling graceful shutdown.

use super::context::ServerContext;
use crate::connection::ConnectionHandler;
use crate::core::metrics;
use std::future::Future;
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Completes on the first SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to register SIGTERM handler: {}", e);
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for SIGINT: {}", e);
            }
            return;
        }
    };
    tokio::select! {
        res = tokio::signal::ctrl_c() => match res {
            Ok(()) => info!("SIGINT received, initiating graceful shutdown."),
            Err(e) => error!("Failed to listen for SIGINT: {}. Shutting down.", e),
        },
        _ = sigterm.recv() => info!("SIGTERM received, initiating graceful shutdown."),
    }
}

/// The main server loop: one task per accepted connection, until `shutdown` completes.
pub async fn run<F>(mut ctx: ServerContext, shutdown: F)
where
    F: Future<Output = ()>,
{
    let mut session_id_counter: u64 = 0;
    let mut client_tasks = JoinSet::new();
    let read_timeout = ctx.config.read_timeout();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                break;
            }

            Some(res) = ctx.background_tasks.join_next() => {
                match res {
                    Ok(Ok(())) => warn!("A background task finished unexpectedly without an error."),
                    Ok(Err(e)) => { error!("CRITICAL: Background task failed: {}. Shutting down.", e); break; }
                    Err(e) => { error!("CRITICAL: Background task panicked: {e:?}. Shutting down."); break; }
                }
            },

            res = ctx.listener.accept() => {
                match res {
                    Ok((socket, addr)) => {
                        info!("connection from {}", addr);
                        metrics::CONNECTIONS_RECEIVED_TOTAL.inc();

                        session_id_counter = session_id_counter.wrapping_add(1);
                        let session_id = session_id_counter;
                        let repository = ctx.repository.clone();

                        client_tasks.spawn(async move {
                            let handler = ConnectionHandler::new(socket, addr, repository, session_id, read_timeout);
                            match handler.run().await {
                                Ok(_) => {}
                                Err(e) if e.is_disconnect() => debug!("Connection from {} closed by peer: {}", addr, e),
                                Err(e) => warn!("Connection from {} terminated unexpectedly: {}", addr, e),
                            }
                        });
                    }
                    Err(e) => error!("Failed to accept connection: {}", e),
                }
            },

            Some(res) = client_tasks.join_next() => {
                if let Err(e) = res
                    && e.is_panic()
                {
                    error!("A client handler panicked: {e:?}");
                }
            },
        }
    }

    info!("Shutting down. Sending signal to all tasks.");
    // No receivers just means no background task is running.
    let _ = ctx.shutdown_tx.send(());

    client_tasks.shutdown().await;
    info!("All client connections closed.");

    info!("Waiting for background tasks to finish...");
    if tokio::time::timeout(Duration::from_secs(10), async {
        while ctx.background_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for background tasks to finish cleanly.");
    };
    info!("Server shutdown complete.");
}
