//! Logging setup for Fluent build tooling.
//!
//! Library crates in this workspace only emit `tracing` events. Binaries call
//! [`init_logging`] once at startup to install a subscriber writing either
//! human-readable or JSON lines to stderr, so stdout stays free for command
//! output.
//!
//! # Example
//!
//! ```no_run
//! use fluent_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).unwrap();
//! tracing::info!(contracts = 2, "Configuration resolved");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
