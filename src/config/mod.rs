//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! TOML file → loader.rs (read, parse)
//!     → validation.rs (semantic checks, all errors reported)
//!     → AppConfig accepted into the system
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, CacheConfig, CircuitBreakerConfig, UpstreamConfig};
