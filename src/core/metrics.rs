// src/core/metrics.rs

//! Defines and registers Prometheus metrics for server monitoring.
//!
//! This module uses `lazy_static` to ensure that metrics are registered only once
//! globally for the entire application lifecycle.

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, TextEncoder, register_counter, register_counter_vec,
    register_gauge,
};

lazy_static! {
    /// The number of clients currently connected to the server.
    pub static ref CONNECTED_CLIENTS: Gauge =
        register_gauge!("raptor_connected_clients", "Number of currently connected clients.").unwrap();

    /// The total number of connections accepted by the server since startup.
    pub static ref CONNECTIONS_RECEIVED_TOTAL: Counter =
        register_counter!("raptor_connections_received_total", "Total number of connections received.").unwrap();
    /// Commands processed, labeled by kind (`directory`, `ping`, `assignment`).
    pub static ref COMMANDS_PROCESSED_TOTAL: CounterVec =
        register_counter_vec!("raptor_commands_processed_total", "Total number of commands processed, labeled by kind.", &["command"]).unwrap();
    /// Verdicts sent to clients, labeled `correct` or `incorrect`.
    pub static ref VERDICTS_TOTAL: CounterVec =
        register_counter_vec!("raptor_verdicts_total", "Total number of test case verdicts, labeled by outcome.", &["verdict"]).unwrap();
    /// Sessions that ended with an error instead of a normal close.
    pub static ref FAILED_SESSIONS_TOTAL: Counter =
        register_counter!("raptor_failed_sessions_total", "Total number of sessions that ended with an error.").unwrap();
}

/// Gathers all registered metrics and encodes them in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_else(|e| format!("# failed to encode metrics: {e}\n"))
}
