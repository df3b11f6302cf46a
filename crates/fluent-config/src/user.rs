//! User-authored (partial) configuration.
//!
//! These types mirror [`crate::schema`] with every settings field optional.
//! Unknown keys are ignored; shape validation logs them at debug level.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::PullPolicy;

/// Partial [`CompileSettings`](crate::CompileSettings).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialCompileSettings {
    /// Compilation target triple.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Build with debug information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    /// Replaces the lower layer's options entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Partial [`TestSettings`](crate::TestSettings).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialTestSettings {
    /// Test command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Replaces the lower layer's options entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// Per-test timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Retry count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

/// Partial [`DockerSettings`](crate::DockerSettings).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialDockerSettings {
    /// Image name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Image tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Pull policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull: Option<PullPolicy>,
}

/// Partial [`NetworkSettings`](crate::NetworkSettings).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartialNetworkSettings {
    /// Chain specification name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,

    /// Node data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    /// Block production interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_time: Option<String>,

    /// P2P port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// JSON-RPC port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_port: Option<u16>,
}

/// Partial [`NodeSettings`](crate::NodeSettings).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialNodeSettings {
    /// Container settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker: Option<PartialDockerSettings>,

    /// Network settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<PartialNetworkSettings>,
}

/// Partial [`DiscoverySettings`](crate::DiscoverySettings).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialDiscoverySettings {
    /// Whether discovery runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Search roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,

    /// Excluded glob patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,
}

/// Interface declaration of an explicit contract. `path` is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInterfaceConfig {
    /// Path to the `.sol` file.
    pub path: String,

    /// Optional interface name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An explicitly declared contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserContractConfig {
    /// Contract directory or manifest path.
    pub path: String,

    /// Interface-description file.
    pub interface: UserInterfaceConfig,

    /// Per-contract compile overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile: Option<PartialCompileSettings>,

    /// Per-contract test overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<PartialTestSettings>,
}

/// Raw user configuration after shape validation.
///
/// # Example
///
/// ```
/// use fluent_config::UserConfig;
///
/// let config: UserConfig = serde_json::from_str(r#"{"compile": {"debug": true}}"#).unwrap();
/// assert_eq!(config.compile.unwrap().debug, Some(true));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    /// Global compile settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile: Option<PartialCompileSettings>,

    /// Global test settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<PartialTestSettings>,

    /// Node settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<PartialNodeSettings>,

    /// Environment variables for the node and toolchain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,

    /// Explicit contracts. `None` means the key was absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contracts: Option<Vec<UserContractConfig>>,

    /// Discovery settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery: Option<PartialDiscoverySettings>,
}

impl UserConfig {
    /// `discovery.enabled` was set to `false` by the user.
    #[must_use]
    pub fn discovery_disabled(&self) -> bool {
        self.discovery
            .as_ref()
            .and_then(|d| d.enabled)
            .is_some_and(|enabled| !enabled)
    }

    /// A non-empty `contracts` array was supplied.
    #[must_use]
    pub fn has_explicit_contracts(&self) -> bool {
        self.contracts.as_ref().is_some_and(|c| !c.is_empty())
    }
}
