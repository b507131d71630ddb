//! Client-side cluster node pool.
//!
//! Given a static list of `host:port` candidates, [`NodeManager`] keeps
//! probing them over TCP, splits them into available and broken sets, and
//! hands out available nodes round-robin.

pub mod config;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod load_balancer;
pub mod manager;
pub mod observability;

pub use config::PoolConfig;
pub use error::{EndpointError, PoolError};
pub use load_balancer::endpoint::Endpoint;
pub use load_balancer::pool::PoolStatus;
pub use manager::NodeManager;
pub use observability::logging::{EventLog, TracingLog};
