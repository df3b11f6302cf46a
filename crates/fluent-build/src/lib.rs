//! Fluent Build - configuration front end
//!
//! Resolves a project's Fluent configuration, runs contract discovery and
//! plans artifact locations from the command line. The heavy lifting lives in
//! [`fluent_config`]; this crate adds argument parsing, config-file lookup and
//! error rendering.
//!
//! # Usage
//!
//! ```text
//! fluent-build --root my-project resolve
//! fluent-build discover
//! fluent-build check
//! fluent-build artifacts --artifacts-dir artifacts
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command};
pub use commands::{run, CommandError};

pub use fluent_config;
pub use fluent_telemetry;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
