//! Metrics collection and exposition.
//!
//! # Metrics
//! - `node_pool_available_nodes` (gauge): size of the available set after a cycle
//! - `node_pool_broken_nodes` (gauge): size of the broken set after a cycle
//! - `node_pool_probe_failures_total` (counter): failed probes, by node
//! - `node_pool_transitions_total` (counter): node moves, by target state
//! - `node_pool_picks_total` (counter): selections, by result
//!
//! Recording goes through the `metrics` facade and is a no-op until a
//! recorder is installed with [`init_metrics`].

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::state::NodeState;

/// Install the Prometheus recorder with an HTTP scrape listener.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_pool_size(available: usize, broken: usize) {
    metrics::gauge!("node_pool_available_nodes").set(available as f64);
    metrics::gauge!("node_pool_broken_nodes").set(broken as f64);
}

pub fn record_probe_failure(node: &str) {
    metrics::counter!("node_pool_probe_failures_total", "node" => node.to_string()).increment(1);
}

pub fn record_transition(to: NodeState) {
    metrics::counter!("node_pool_transitions_total", "to" => to.as_str()).increment(1);
}

pub fn record_pick(success: bool) {
    let result = if success { "ok" } else { "no_available_node" };
    metrics::counter!("node_pool_picks_total", "result" => result).increment(1);
}
