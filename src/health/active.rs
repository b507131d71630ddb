//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every node
//! - Move failing nodes to the broken set and recovered nodes back
//! - Report a per-cycle summary

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::health::probe::TcpProbe;
use crate::health::state::NodeState;
use crate::load_balancer::{endpoint::Endpoint, pool::NodePool};
use crate::log_fields;
use crate::observability::logging::EventLog;
use crate::observability::metrics;

/// Outcome of one health cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Nodes moved from available to broken.
    pub failed: Vec<Endpoint>,
    /// Nodes moved from broken to available.
    pub recovered: Vec<Endpoint>,
    pub available: usize,
    pub broken: usize,
}

pub struct HealthMonitor {
    pool: Arc<NodePool>,
    probe: TcpProbe,
    interval: Duration,
    log: Arc<dyn EventLog>,
}

impl HealthMonitor {
    pub fn new(pool: Arc<NodePool>, probe: TcpProbe, interval: Duration, log: Arc<dyn EventLog>) -> Self {
        Self {
            pool,
            probe,
            interval,
            log,
        }
    }

    /// Tick every interval until the shutdown signal arrives (or its sender
    /// is dropped). The first tick fires one interval from now.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        log_fields!(self.log,
            "function" => "run",
            "action" => "health monitor starting",
            "interval_secs" => self.interval.as_secs(),
            "connect_timeout_secs" => self.probe.timeout().as_secs());

        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.recv() => break,
            }
            // A cycle in flight is abandoned on shutdown; every move it already
            // applied is complete on its own.
            tokio::select! {
                _ = self.run_cycle() => {}
                _ = shutdown.recv() => break,
            }
        }

        log_fields!(self.log, "function" => "run", "action" => "close");
    }

    /// One full cycle: probe available nodes for failure, then broken nodes
    /// for recovery, then log the resulting counts.
    ///
    /// Both sets are snapshotted together before either pass, so a node that
    /// fails in the first pass is not probed again in the second.
    pub async fn run_cycle(&self) -> CycleReport {
        let start = self.pool.status();
        let failed = self.probe_and_move(start.available, NodeState::Broken).await;
        let recovered = self.probe_and_move(start.broken, NodeState::Available).await;
        let (available, broken) = self.pool.counts();

        metrics::record_pool_size(available, broken);
        log_fields!(self.log,
            "function" => "run_cycle",
            "action" => "time check node healthy",
            "healthy" => available,
            "ill" => broken);

        CycleReport {
            failed,
            recovered,
            available,
            broken,
        }
    }

    /// Probe every node of a snapshot without holding the pool lock, then move
    /// the ones whose probe outcome maps to `target`.
    async fn probe_and_move(&self, snapshot: Vec<Endpoint>, target: NodeState) -> Vec<Endpoint> {
        let outcomes = join_all(snapshot.iter().map(|node| self.probe_node(node))).await;

        let mut moved = Vec::new();
        for (node, reachable) in snapshot.into_iter().zip(outcomes) {
            if NodeState::after_probe(reachable) != target {
                continue;
            }
            let applied = match target {
                NodeState::Broken => self.pool.mark_broken(&node),
                NodeState::Available => self.pool.mark_available(&node),
            };
            if applied {
                metrics::record_transition(target);
                log_fields!(self.log,
                    "function" => "probe_and_move",
                    "action" => "node state changed",
                    "node" => node,
                    "state" => target);
                moved.push(node);
            }
        }
        moved
    }

    async fn probe_node(&self, node: &Endpoint) -> bool {
        match self.probe.check(node).await {
            Ok(()) => true,
            Err(e) => {
                metrics::record_probe_failure(node.as_str());
                log_fields!(self.log,
                    "function" => "probe_node",
                    "action" => "dial ip port",
                    "node" => node,
                    "error" => e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::logging::{render, Field, TracingLog};
    use std::sync::Mutex;
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct RecordingLog {
        records: Mutex<Vec<String>>,
    }

    impl RecordingLog {
        fn count(&self, needle: &str) -> usize {
            self.records.lock().unwrap().iter().filter(|r| r.contains(needle)).count()
        }
    }

    impl EventLog for RecordingLog {
        fn log(&self, fields: &[Field<'_>]) {
            self.records.lock().unwrap().push(render(fields));
        }
    }

    fn monitor_with_log(nodes: Vec<Endpoint>, log: Arc<dyn EventLog>) -> (Arc<NodePool>, HealthMonitor) {
        let pool = Arc::new(NodePool::new(nodes));
        let monitor = HealthMonitor::new(
            pool.clone(),
            TcpProbe::new(Duration::from_secs(1)),
            Duration::from_secs(1),
            log,
        );
        (pool, monitor)
    }

    fn monitor_for(nodes: Vec<Endpoint>) -> (Arc<NodePool>, HealthMonitor) {
        monitor_with_log(nodes, Arc::new(TracingLog))
    }

    async fn closed_port() -> Endpoint {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr.to_string().parse().unwrap()
    }

    #[tokio::test]
    async fn test_cycle_marks_unreachable_broken() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let up: Endpoint = listener.local_addr().unwrap().to_string().parse().unwrap();
        let down = closed_port().await;

        let (pool, monitor) = monitor_for(vec![up.clone(), down.clone()]);
        let report = monitor.run_cycle().await;

        assert_eq!(report.failed, vec![down.clone()]);
        assert!(report.recovered.is_empty());
        assert_eq!((report.available, report.broken), (1, 1));
        assert_eq!(pool.available(), vec![up]);
        assert_eq!(pool.broken(), vec![down]);
    }

    #[tokio::test]
    async fn test_failed_node_dialed_once_per_cycle() {
        let down = closed_port().await;
        let log = Arc::new(RecordingLog::default());
        let (pool, monitor) = monitor_with_log(vec![down.clone()], log.clone());

        let report = monitor.run_cycle().await;
        assert_eq!(report.failed, vec![down.clone()]);
        assert!(report.recovered.is_empty());
        assert_eq!(log.count("action=dial ip port"), 1);

        // Next cycle: the node starts broken and is dialed once more.
        let report = monitor.run_cycle().await;
        assert!(report.failed.is_empty() && report.recovered.is_empty());
        assert_eq!(log.count("action=dial ip port"), 2);
        assert_eq!(pool.broken(), vec![down]);
    }

    #[tokio::test]
    async fn test_cycle_recovers_node() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let node: Endpoint = listener.local_addr().unwrap().to_string().parse().unwrap();

        let (pool, monitor) = monitor_for(vec![node.clone()]);
        pool.mark_broken(&node);

        let report = monitor.run_cycle().await;
        assert_eq!(report.recovered, vec![node.clone()]);
        assert_eq!(pool.state_of(&node), Some(NodeState::Available));
    }

    #[tokio::test]
    async fn test_run_exits_on_shutdown() {
        let (_pool, monitor) = monitor_for(vec![closed_port().await]);
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(monitor.run(rx));
        tx.send(()).unwrap();

        time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("monitor did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_exits_when_sender_dropped() {
        let (_pool, monitor) = monitor_for(vec![closed_port().await]);
        let (tx, rx) = broadcast::channel::<()>(1);

        let handle = tokio::spawn(monitor.run(rx));
        drop(tx);

        time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("monitor did not stop")
            .unwrap();
    }
}
