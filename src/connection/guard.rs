// src/connection/guard.rs

//! Defines `ConnectionGuard`, an RAII guard for connection bookkeeping.

use crate::core::metrics;
use std::net::SocketAddr;
use tracing::debug;

/// An RAII guard that keeps the connected-clients gauge accurate and records
/// sessions that end with an error, whichever way the handler's scope is left.
pub struct ConnectionGuard {
    /// The unique identifier for the client session.
    pub(crate) session_id: u64,
    /// The network address of the client.
    pub(crate) addr: SocketAddr,
    /// Set once the session has finished its protocol cycle without error.
    pub(crate) completed: bool,
}

impl ConnectionGuard {
    pub(crate) fn new(session_id: u64, addr: SocketAddr) -> Self {
        metrics::CONNECTED_CLIENTS.inc();
        Self {
            session_id,
            addr,
            completed: false,
        }
    }

    /// Marks the session as finished normally.
    pub(crate) fn set_completed(&mut self) {
        self.completed = true;
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        metrics::CONNECTED_CLIENTS.dec();
        if !self.completed {
            metrics::FAILED_SESSIONS_TOTAL.inc();
        }
        debug!(
            "Session {} for {} closed (completed: {})",
            self.session_id, self.addr, self.completed
        );
    }
}
