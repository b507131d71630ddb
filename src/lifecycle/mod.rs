//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (manager.rs):
//!     Validate candidates → Initial health sweep → Spawn health monitor
//!
//! Shutdown (shutdown.rs):
//!     trigger() → Monitor observes signal → Task exits → JoinHandle awaited
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Binary triggers shutdown
//! ```
//!
//! # Design Decisions
//! - Broadcast channel rather than a rendezvous send, so triggering never blocks
//! - Shutdown is idempotent

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
