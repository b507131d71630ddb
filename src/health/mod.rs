//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Periodic timer
//!     → Snapshot available set → probe.rs each node → failures move to broken
//!     → Snapshot broken set → probe.rs each node → successes move to available
//!     → Log cycle summary
//!
//! State machine (state.rs):
//!     Available ←→ Broken
//! ```
//!
//! # Design Decisions
//! - Probes never run while the pool lock is held
//! - One cycle at a time; late ticks are skipped, never overlapped
//! - Probe failures are logged and counted, never returned to callers

pub mod active;
pub mod probe;
pub mod state;
