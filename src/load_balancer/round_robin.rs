//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};
use crate::load_balancer::{LoadBalancer, endpoint::Endpoint};

/// Round-robin selector.
/// Stores an internal counter to rotate through nodes.
///
/// The counter is never reset and wraps on overflow. Positions are reduced
/// modulo the size of the slice passed at call time, so when the available
/// set changes between calls the rotation is best-effort only.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selections made so far (wrapping).
    #[cfg(test)]
    fn selections(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }
}

impl LoadBalancer for RoundRobin {
    fn next_node<'a>(&self, nodes: &'a [Endpoint]) -> Option<&'a Endpoint> {
        if nodes.is_empty() {
            return None;
        }

        let position = self.counter.fetch_add(1, Ordering::Relaxed);
        nodes.get(position % nodes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(addrs: &[&str]) -> Vec<Endpoint> {
        addrs.iter().map(|a| a.parse().unwrap()).collect()
    }

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new();
        let nodes = nodes(&["127.0.0.1:8080", "127.0.0.1:8081"]);

        let s1 = lb.next_node(&nodes).unwrap();
        assert_eq!(s1, &nodes[0]);

        let s2 = lb.next_node(&nodes).unwrap();
        assert_eq!(s2, &nodes[1]);

        let s3 = lb.next_node(&nodes).unwrap();
        assert_eq!(s3, &nodes[0]);
        assert_eq!(lb.selections(), 3);
    }

    #[test]
    fn test_empty_set() {
        let lb = RoundRobin::new();
        assert!(lb.next_node(&[]).is_none());
        // Empty picks do not advance the rotation.
        assert_eq!(lb.selections(), 0);
    }

    #[test]
    fn test_even_distribution() {
        let lb = RoundRobin::new();
        let nodes = nodes(&["10.0.0.1:1", "10.0.0.2:1", "10.0.0.3:1"]);
        let mut counts = [0usize; 3];

        for _ in 0..100 {
            let picked = lb.next_node(&nodes).unwrap();
            let idx = nodes.iter().position(|n| n == picked).unwrap();
            counts[idx] += 1;
        }

        for count in counts {
            assert!(count >= 100 / 3);
        }
    }

    #[test]
    fn test_counter_wraps() {
        let lb = RoundRobin {
            counter: AtomicUsize::new(usize::MAX),
        };
        let nodes = nodes(&["10.0.0.1:1", "10.0.0.2:1"]);
        assert!(lb.next_node(&nodes).is_some());
        assert_eq!(lb.next_node(&nodes).unwrap(), &nodes[0]);
    }
}
