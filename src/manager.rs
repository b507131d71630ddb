//! Node pool manager.
//!
//! Owns the pool, the health monitor task, and its shutdown signal. Built
//! from a static candidate list; after construction the set of configured
//! nodes never changes, only their available/broken classification.
//!
//! Round-robin selection is fair only while the available set is stable.
//! When the health monitor moves nodes between calls, the rotation restarts
//! against the new set size, so fairness under churn is best-effort.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::{HealthCheckConfig, PoolConfig};
use crate::error::{EndpointError, PoolError};
use crate::health::active::HealthMonitor;
use crate::health::probe::TcpProbe;
use crate::lifecycle::Shutdown;
use crate::load_balancer::endpoint::Endpoint;
use crate::load_balancer::pool::{NodePool, PoolStatus};
use crate::log_fields;
use crate::observability::logging::{EventLog, ListDisplay};
use crate::observability::metrics;

/// Tracks which of a fixed set of nodes are reachable and hands them out.
pub struct NodeManager {
    pool: Arc<NodePool>,
    log: Arc<dyn EventLog>,
    shutdown: Shutdown,
    monitor: Mutex<Option<JoinHandle<()>>>,
}

impl NodeManager {
    /// Build a manager probing every `interval_secs` with the default connect timeout.
    pub async fn new<I, S>(interval_secs: u64, log: Arc<dyn EventLog>, nodes: I) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let health = HealthCheckConfig {
            interval_secs,
            ..HealthCheckConfig::default()
        };
        Self::with_health_config(&health, log, nodes).await
    }

    /// Build a manager from a loaded configuration.
    pub async fn from_config(config: &PoolConfig, log: Arc<dyn EventLog>) -> Result<Self, PoolError> {
        Self::with_health_config(&config.health_check, log, &config.nodes).await
    }

    /// Validate the candidates, run one health cycle, then start the
    /// background monitor. Must be called from within a Tokio runtime.
    pub async fn with_health_config<I, S>(
        health: &HealthCheckConfig,
        log: Arc<dyn EventLog>,
        nodes: I,
    ) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if health.interval_secs == 0 {
            return Err(PoolError::invalid("health check interval must be greater than 0"));
        }
        if health.connect_timeout_secs == 0 {
            return Err(PoolError::invalid("connect timeout must be greater than 0"));
        }

        let nodes = parse_candidates(log.as_ref(), nodes)?;
        let pool = Arc::new(NodePool::new(nodes));

        let monitor = HealthMonitor::new(
            pool.clone(),
            TcpProbe::new(Duration::from_secs(health.connect_timeout_secs)),
            Duration::from_secs(health.interval_secs),
            log.clone(),
        );
        monitor.run_cycle().await;

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(monitor.run(shutdown.subscribe()));

        Ok(Self {
            pool,
            log,
            shutdown,
            monitor: Mutex::new(Some(handle)),
        })
    }

    /// Return the next available node in round-robin order.
    pub fn pick_one(&self) -> Result<Endpoint, PoolError> {
        let picked = self.pool.pick();
        metrics::record_pick(picked.is_some());
        picked.ok_or(PoolError::NoAvailableNode)
    }

    /// Every configured node, in configuration order.
    pub fn all_nodes(&self) -> Vec<Endpoint> {
        self.pool.all()
    }

    /// Snapshot of the nodes currently believed reachable.
    pub fn available_nodes(&self) -> Vec<Endpoint> {
        self.pool.available()
    }

    /// Snapshot of the nodes currently believed unreachable.
    pub fn broken_nodes(&self) -> Vec<Endpoint> {
        self.pool.broken()
    }

    /// Both sets, taken together under one lock.
    pub fn status(&self) -> PoolStatus {
        self.pool.status()
    }

    /// Whether the health monitor task is still running.
    pub fn is_running(&self) -> bool {
        self.monitor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the health monitor and wait for it to exit.
    ///
    /// Safe to call more than once; later calls return immediately. Listing
    /// and selection keep working on the last observed state.
    pub async fn shutdown(&self) {
        self.shutdown.trigger();

        let handle = self.monitor.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                log_fields!(self.log,
                    "function" => "shutdown",
                    "action" => "join health monitor",
                    "error" => e);
            }
        }
    }
}

impl Drop for NodeManager {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

impl std::fmt::Debug for NodeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeManager")
            .field("pool", &self.pool)
            .field("shutdown", &self.shutdown.is_triggered())
            .finish()
    }
}

/// Turn raw candidates into endpoints.
///
/// A candidate without exactly one `:` is logged and skipped; a candidate
/// with a bad port fails the whole list. An empty input, or one where every
/// candidate was skipped, is an invalid configuration.
pub(crate) fn parse_candidates<I, S>(log: &dyn EventLog, candidates: I) -> Result<Vec<Endpoint>, PoolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = 0usize;
    let mut nodes = Vec::new();

    for candidate in candidates {
        seen += 1;
        let candidate = candidate.as_ref();
        match candidate.parse::<Endpoint>() {
            Ok(node) => nodes.push(node),
            Err(e @ EndpointError::MissingSeparator(_)) => {
                log_fields!(log,
                    "function" => "parse_candidates",
                    "action" => "check servers",
                    "server" => candidate,
                    "error" => e);
            }
            Err(e @ EndpointError::InvalidPort { .. }) => {
                log_fields!(log,
                    "function" => "parse_candidates",
                    "action" => "check port",
                    "server" => candidate,
                    "error" => e);
                return Err(e.into());
            }
        }
    }

    if seen == 0 {
        log_fields!(log,
            "function" => "parse_candidates",
            "action" => "check servers",
            "error" => "empty candidate list");
        return Err(PoolError::invalid("empty candidate list"));
    }

    if nodes.is_empty() {
        log_fields!(log,
            "function" => "parse_candidates",
            "action" => "check available node",
            "error" => "no valid candidate");
        return Err(PoolError::invalid(format!("none of {} candidates is a valid host:port", seen)));
    }

    log_fields!(log,
        "function" => "parse_candidates",
        "action" => "nodes loaded",
        "nodes" => ListDisplay(&nodes));
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::logging::{render, Field};

    #[derive(Default)]
    struct RecordingLog {
        records: Mutex<Vec<String>>,
    }

    impl EventLog for RecordingLog {
        fn log(&self, fields: &[Field<'_>]) {
            self.records.lock().unwrap().push(render(fields));
        }
    }

    #[test]
    fn test_parse_keeps_order() {
        let log = RecordingLog::default();
        let nodes = parse_candidates(&log, ["10.0.0.2:80", "10.0.0.1:80"]).unwrap();
        assert_eq!(nodes, vec!["10.0.0.2:80", "10.0.0.1:80"]);
    }

    #[test]
    fn test_parse_skips_missing_separator() {
        let log = RecordingLog::default();
        let nodes = parse_candidates(&log, ["no-separator", "10.0.0.1:80"]).unwrap();

        assert_eq!(nodes, vec!["10.0.0.1:80"]);
        let records = log.records.lock().unwrap();
        assert!(records.iter().any(|r| r.contains("server=no-separator") && r.contains("error=")));
    }

    #[test]
    fn test_parse_bad_port_is_fatal() {
        let log = RecordingLog::default();
        let err = parse_candidates(&log, ["127.0.0.1:9", "127.0.0.1:65599"]).unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfiguration { .. }));

        let err = parse_candidates(&log, ["127.0.0.1:abc"]).unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_parse_empty_list() {
        let log = RecordingLog::default();
        let empty: [&str; 0] = [];
        let err = parse_candidates(&log, empty).unwrap_err();
        assert_eq!(err, PoolError::invalid("empty candidate list"));
    }

    #[test]
    fn test_parse_all_invalid() {
        let log = RecordingLog::default();
        let err = parse_candidates(&log, ["a", "b:c:d"]).unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfiguration { .. }));
        assert!(log.records.lock().unwrap().len() >= 3);
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let err = NodeManager::new(0, Arc::new(RecordingLog::default()), ["127.0.0.1:80"])
            .await
            .unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfiguration { .. }));
    }
}
