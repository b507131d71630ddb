//! Error types for the node pool.

use thiserror::Error;

/// Errors returned synchronously to callers of the pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// The candidate list is empty, entirely invalid, or carries a bad port.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Selection was attempted while no node is reachable.
    #[error("no available node")]
    NoAvailableNode,
}

impl PoolError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        PoolError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Errors produced while parsing a `host:port` candidate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    /// The candidate does not split into exactly one host and one port.
    #[error("expected host:port, got {0:?}")]
    MissingSeparator(String),

    /// The port is not a decimal number in 0..=65535.
    #[error("invalid port {port:?} in {endpoint:?}")]
    InvalidPort { endpoint: String, port: String },
}

impl From<EndpointError> for PoolError {
    fn from(err: EndpointError) -> Self {
        PoolError::invalid(err.to_string())
    }
}
