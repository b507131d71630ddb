//! Node pool management.
//!
//! # Responsibilities
//! - Hold the fixed set of configured nodes
//! - Track which of them are available and which are broken
//! - Apply the load balancing strategy over the available set
//! - Hand out snapshots; callers never hold references into the pool

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::health::state::NodeState;
use crate::load_balancer::{LoadBalancer, endpoint::Endpoint, round_robin::RoundRobin};

/// The two mutable sets. Every configured node is in exactly one of them.
#[derive(Debug, Default)]
struct NodeSets {
    available: Vec<Endpoint>,
    broken: Vec<Endpoint>,
}

/// Point-in-time view of the pool, taken under a single lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    pub all: Vec<Endpoint>,
    pub available: Vec<Endpoint>,
    pub broken: Vec<Endpoint>,
}

impl PoolStatus {
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn broken_count(&self) -> usize {
        self.broken.len()
    }
}

/// Shared node sets plus the selection strategy.
#[derive(Debug)]
pub struct NodePool {
    /// Immutable after construction.
    all: Vec<Endpoint>,
    sets: RwLock<NodeSets>,
    balancer: Box<dyn LoadBalancer>,
}

impl NodePool {
    /// Create a pool with every node marked available and round-robin selection.
    pub fn new(nodes: Vec<Endpoint>) -> Self {
        Self::with_balancer(nodes, Box::new(RoundRobin::new()))
    }

    pub fn with_balancer(nodes: Vec<Endpoint>, balancer: Box<dyn LoadBalancer>) -> Self {
        let sets = NodeSets {
            available: nodes.clone(),
            broken: Vec::new(),
        };
        Self {
            all: nodes,
            sets: RwLock::new(sets),
            balancer,
        }
    }

    // A panic while holding the lock cannot leave the sets half-moved (moves
    // are a remove followed by a push of an owned value), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, NodeSets> {
        self.sets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, NodeSets> {
        self.sets.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Select an available node, or `None` if every node is broken.
    pub fn pick(&self) -> Option<Endpoint> {
        let sets = self.read();
        self.balancer.next_node(&sets.available).cloned()
    }

    /// All configured nodes, in configuration order.
    pub fn all(&self) -> Vec<Endpoint> {
        self.all.clone()
    }

    pub fn available(&self) -> Vec<Endpoint> {
        self.read().available.clone()
    }

    pub fn broken(&self) -> Vec<Endpoint> {
        self.read().broken.clone()
    }

    pub fn counts(&self) -> (usize, usize) {
        let sets = self.read();
        (sets.available.len(), sets.broken.len())
    }

    pub fn status(&self) -> PoolStatus {
        let sets = self.read();
        PoolStatus {
            all: self.all.clone(),
            available: sets.available.clone(),
            broken: sets.broken.clone(),
        }
    }

    /// Current state of a configured node, `None` if it is not in the pool.
    pub fn state_of(&self, node: &Endpoint) -> Option<NodeState> {
        let sets = self.read();
        if sets.available.contains(node) {
            Some(NodeState::Available)
        } else if sets.broken.contains(node) {
            Some(NodeState::Broken)
        } else {
            None
        }
    }

    /// Move a node from available to broken.
    /// Returns false if the node was not in the available set.
    pub fn mark_broken(&self, node: &Endpoint) -> bool {
        let mut sets = self.write();
        let NodeSets { available, broken } = &mut *sets;
        move_node(available, broken, node)
    }

    /// Move a node from broken to available.
    /// Returns false if the node was not in the broken set.
    pub fn mark_available(&self, node: &Endpoint) -> bool {
        let mut sets = self.write();
        let NodeSets { available, broken } = &mut *sets;
        move_node(broken, available, node)
    }
}

fn move_node(from: &mut Vec<Endpoint>, to: &mut Vec<Endpoint>, node: &Endpoint) -> bool {
    match from.iter().position(|n| n == node) {
        Some(idx) => {
            let moved = from.remove(idx);
            to.push(moved);
            true
        }
        None => false,
    }
}
