//! Node selection subsystem.
//!
//! # Data Flow
//! ```text
//! Caller asks for a destination
//!     → pool.rs (read-locked snapshot of the available set)
//!     → round_robin.rs (advance shared counter, index into the set)
//!     → endpoint.rs (cloned host:port handed back to the caller)
//! ```
//!
//! # Design Decisions
//! - Membership is fixed at construction; only the available/broken split changes
//! - One lock covers both mutable sets so a node move is observed atomically
//! - Broken nodes are never visible to the selector

pub mod endpoint;
pub mod pool;
pub mod round_robin;

use std::fmt::Debug;

use self::endpoint::Endpoint;

/// A node selection strategy over the currently available set.
pub trait LoadBalancer: Debug + Send + Sync {
    /// Pick one node from `nodes`, or `None` when the slice is empty.
    fn next_node<'a>(&self, nodes: &'a [Endpoint]) -> Option<&'a Endpoint>;
}
