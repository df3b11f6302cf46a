//! Configuration resolution and contract discovery for Fluent WASM builds.
//!
//! This crate turns loosely specified user input into a complete, validated
//! [`FluentConfig`] consumed by the compile, test and node tasks:
//! - Layered settings (built-in defaults, global user settings, per-contract
//!   overrides)
//! - Automatic discovery of contract crates under configured search paths
//! - Strict validation of both raw input and resolved output
//! - Typed errors with stable [`ErrorCode`]s
//!
//! # Example
//!
//! ```no_run
//! use fluent_config::ConfigLoader;
//!
//! # fn main() -> Result<(), fluent_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_root(".")
//!     .with_optional_file("fluent.toml")?
//!     .with_env_prefix("FLUENT")
//!     .load()?;
//!
//! for contract in &config.contracts {
//!     println!("{} (interface {})", contract.path, contract.interface.path);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [compile]
//! debug = true
//!
//! [test]
//! retries = 2
//!
//! [node.network]
//! httpPort = 9545
//!
//! [discovery]
//! paths = ["contracts"]
//!
//! [[contracts]]
//! path = "contracts/token"
//! interface = { path = "contracts/IToken.sol" }
//! compile = { debug = false }
//! ```
//!
//! When `contracts` is non-empty it fully replaces discovery. Otherwise every
//! directory under the discovery paths whose `Cargo.toml` mentions
//! `fluentbase` and which has a matching `I<Name>.sol` next to it becomes a
//! contract.
//!
//! # Environment Variable Overrides
//!
//! Global settings can be overridden with `PREFIX__SECTION__KEY` variables,
//! for example `FLUENT__COMPILE__DEBUG=true` or
//! `FLUENT__NODE__DOCKER__TAG=v0.4.0`.

#![warn(missing_docs)]

pub mod artifacts;
mod config;
pub mod discovery;
mod error;
mod loader;
pub mod merge;
pub mod paths;
pub mod resolver;
mod schema;
mod user;
pub mod validation;

pub use config::FluentConfig;
pub use error::{ArtifactError, ConfigError, ConfigurationError, ErrorCode, SchemaError};
pub use loader::ConfigLoader;
pub use schema::*;
pub use user::*;
