//! TCP liveness probe.
//!
//! A node is reachable when its address resolves and a TCP connection
//! completes within the timeout. The connection is closed immediately;
//! no bytes are exchanged.

use std::io;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time;

use crate::load_balancer::endpoint::Endpoint;

/// Why a probe failed.
#[derive(Debug, Error)]
pub enum ProbeFailure {
    /// Name resolution or connect returned an error.
    #[error("connect failed: {0}")]
    Connect(#[from] io::Error),
    /// Resolution plus connect did not finish in time.
    #[error("connect timed out after {0:?}")]
    Timeout(Duration),
}

/// Bare TCP connect-and-close probe.
#[derive(Debug, Clone, Copy)]
pub struct TcpProbe {
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve and connect to `node`, dropping the stream on success.
    pub async fn check(&self, node: &Endpoint) -> Result<(), ProbeFailure> {
        let connect = TcpStream::connect((node.host(), node.port()));
        match time::timeout(self.timeout, connect).await {
            Ok(Ok(stream)) => {
                drop(stream);
                Ok(())
            }
            Ok(Err(e)) => Err(ProbeFailure::Connect(e)),
            Err(_) => Err(ProbeFailure::Timeout(self.timeout)),
        }
    }
}
