//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use node_pool::observability::logging::{render, EventLog, Field};

/// A listening node that accepts and immediately drops connections.
pub struct MockNode {
    pub addr: SocketAddr,
    task: JoinHandle<()>,
}

impl MockNode {
    pub async fn start() -> Self {
        Self::bind("127.0.0.1:0".parse().unwrap()).await
    }

    /// Bind a specific address (used to bring a stopped node back).
    pub async fn bind(addr: SocketAddr) -> Self {
        let listener = TcpListener::bind(addr).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let task = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((socket, _)) => drop(socket),
                    Err(_) => break,
                }
            }
        });

        Self { addr, task }
    }

    pub fn endpoint(&self) -> String {
        self.addr.to_string()
    }

    /// Stop listening; returns once the port is closed.
    pub async fn stop(self) -> SocketAddr {
        self.task.abort();
        let _ = self.task.await;
        self.addr
    }
}

#[allow(dead_code)]
/// An address on loopback that nothing listens on.
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

#[allow(dead_code)]
/// Poll `cond` every 50ms until it holds or `timeout` elapses.
pub async fn wait_until<F: FnMut() -> bool>(timeout: Duration, mut cond: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// EventLog that keeps every record in memory.
#[derive(Default)]
pub struct RecordingLog {
    records: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingLog {
    pub fn records(&self) -> Vec<String> {
        self.records.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.records.lock().unwrap().iter().any(|r| r.contains(needle))
    }
}

impl EventLog for RecordingLog {
    fn log(&self, fields: &[Field<'_>]) {
        self.records.lock().unwrap().push(render(fields));
    }
}
