//! Structured logging.
//!
//! # Responsibilities
//! - Define the key/value event sink injected into the pool
//! - Forward pool events to `tracing` by default
//! - Initialize the subscriber for the binary
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Log level configurable via config and environment

use std::fmt::{self, Display, Write};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// One key/value pair of a diagnostic record.
pub type Field<'a> = (&'a str, &'a dyn Display);

/// Sink for diagnostic records made of alternating keys and values.
///
/// Implementations must not block; the pool calls `log` from its
/// background task and from construction.
pub trait EventLog: Send + Sync {
    fn log(&self, fields: &[Field<'_>]);
}

/// Emit a record on an [`EventLog`] from `"key" => value` pairs.
///
/// ```
/// use node_pool::{log_fields, observability::logging::TracingLog};
/// let log = TracingLog;
/// log_fields!(log, "action" => "check port", "port" => 8848);
/// ```
#[macro_export]
macro_rules! log_fields {
    ($log:expr, $($key:literal => $value:expr),+ $(,)?) => {
        {
            use $crate::observability::logging::EventLog as _;
            $log.log(&[$(($key, &$value as &dyn ::std::fmt::Display)),+])
        }
    };
}

/// Default sink: emits every record as a `tracing` event.
///
/// Records carrying an `error` field are logged at `warn`, the rest at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl EventLog for TracingLog {
    fn log(&self, fields: &[Field<'_>]) {
        let rendered = render(fields);
        if fields.iter().any(|(key, _)| *key == "error") {
            tracing::warn!(target: "node_pool", "{}", rendered);
        } else {
            tracing::info!(target: "node_pool", "{}", rendered);
        }
    }
}

/// Render fields as space-separated `key=value` pairs.
pub fn render(fields: &[Field<'_>]) -> String {
    let mut out = String::new();
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{}={}", key, value);
    }
    out
}

/// Wrapper that renders a slice as `[a, b, c]` in log fields.
pub struct ListDisplay<'a, T>(pub &'a [T]);

impl<T: Display> Display for ListDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", item)?;
        }
        f.write_str("]")
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("node_pool={0},{0}", config.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
