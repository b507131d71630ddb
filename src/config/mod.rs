//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PoolConfig (validated, immutable)
//!     → NodeManager::from_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; node membership never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::PoolConfig;
pub use schema::HealthCheckConfig;
pub use schema::ObservabilityConfig;
