//! Root configuration type.
//!
//! [`FluentConfig`] is the single source of truth consumed by the compile,
//! test and node tasks. It is built once per invocation by
//! [`FluentConfig::parse`] (or [`ConfigLoader`](crate::ConfigLoader)) and is
//! never mutated afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::resolver::resolve;
use crate::schema::{
    CompileSettings, ContractConfig, DiscoverySettings, NodeSettings, TestSettings,
};
use crate::user::UserConfig;
use crate::validation::{validate_raw_input, validate_resolved_output};

/// Fully resolved configuration.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use fluent_config::FluentConfig;
///
/// # fn main() -> Result<(), fluent_config::ConfigError> {
/// let raw = serde_json::json!({ "compile": { "debug": true } });
/// let config = FluentConfig::parse(&raw, Path::new("."))?;
///
/// for contract in &config.contracts {
///     println!("{} -> {}", contract.path, contract.interface.path);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FluentConfig {
    /// Global compile settings.
    pub compile: CompileSettings,

    /// Global test settings.
    pub test: TestSettings,

    /// Local node settings.
    pub node: NodeSettings,

    /// Environment for the node and toolchain.
    pub env: BTreeMap<String, String>,

    /// Effective discovery settings.
    pub discovery: DiscoverySettings,

    /// Contracts in build order.
    pub contracts: Vec<ContractConfig>,
}

impl FluentConfig {
    /// Validate, resolve and re-validate raw user input.
    ///
    /// This is the configuration-extension entry point: the raw value is an
    /// arbitrary nested object as authored by the user.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Schema`] if the input (or, defensively, the output)
    ///   has the wrong shape.
    /// - [`ConfigError::Configuration`] if resolution fails.
    pub fn parse(raw: &serde_json::Value, root: &Path) -> Result<Self, ConfigError> {
        let user = validate_raw_input(raw)?;
        Self::from_user_config(&user, root)
    }

    /// Resolve already shape-validated input and check the output.
    ///
    /// # Errors
    ///
    /// See [`FluentConfig::parse`].
    pub fn from_user_config(user: &UserConfig, root: &Path) -> Result<Self, ConfigError> {
        let config = resolve(user, root)?;
        validate_resolved_output(&config)?;
        Ok(config)
    }

    /// Look up a contract by its resolved directory.
    #[must_use]
    pub fn contract(&self, path: &str) -> Option<&ContractConfig> {
        self.contracts.iter().find(|c| c.path == path)
    }
}
