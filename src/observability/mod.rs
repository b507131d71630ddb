//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pool construction and health cycles produce:
//!     → logging.rs (key/value diagnostic records via the injected EventLog)
//!     → metrics.rs (gauges and counters)
//!
//! Consumers:
//!     → tracing subscriber (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The pool never logs directly; it only talks to the EventLog it was given
//! - Metrics are cheap (atomic increments) and off until a recorder is installed

pub mod logging;
pub mod metrics;
