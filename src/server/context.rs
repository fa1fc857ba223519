// src/server/context.rs

use crate::config::Config;
use crate::core::AssignmentRepository;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinSet;

/// Holds all the initialized state required to run the server's main loop.
pub struct ServerContext {
    pub config: Config,
    /// Read-only after startup; every session gets a clone of the `Arc`.
    pub repository: Arc<AssignmentRepository>,
    pub listener: TcpListener,
    pub shutdown_tx: broadcast::Sender<()>,
    pub background_tasks: JoinSet<Result<(), anyhow::Error>>,
}
