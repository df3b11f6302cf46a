//! Resolved configuration section types.
//!
//! Every type here is fully populated. The partial, user-authored
//! counterparts live in [`crate::user`].

use serde::{Deserialize, Serialize};

/// Manifest file searched for during discovery and path validation.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Substring a manifest must contain to be treated as a contract.
pub const FRAMEWORK_MARKER: &str = "fluentbase";

/// Extension of interface-description files.
pub const INTERFACE_EXTENSION: &str = "sol";

/// Flags passed to the external compiler.
///
/// # Example
///
/// ```
/// use fluent_config::CompileSettings;
///
/// let settings = CompileSettings::default();
/// assert_eq!(settings.target, "wasm32-unknown-unknown");
/// assert!(!settings.debug);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CompileSettings {
    /// Compilation target triple.
    pub target: String,

    /// Build with debug information.
    pub debug: bool,

    /// Extra compiler flags, in order.
    pub options: Vec<String>,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            target: "wasm32-unknown-unknown".to_string(),
            debug: false,
            options: [
                "--release",
                "--target=wasm32-unknown-unknown",
                "--no-default-features",
                "-C link-arg=-zstack-size=131072",
                "-C target-feature=+bulk-memory",
                "-C opt-level=z",
                "-C strip=symbols",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

/// How contract tests are run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TestSettings {
    /// Test command line.
    pub command: String,

    /// Extra test flags, in order.
    pub options: Vec<String>,

    /// Per-test timeout in milliseconds.
    pub timeout: u64,

    /// Retry count for failing tests.
    pub retries: u32,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            command: "cargo test".to_string(),
            options: vec!["--release".to_string(), "--test-threads=1".to_string()],
            timeout: 5000,
            retries: 0,
        }
    }
}

/// Container image pull policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PullPolicy {
    /// Pull on every run.
    Always,
    /// Pull only when the image is missing locally.
    #[default]
    IfNotPresent,
    /// Never pull.
    Never,
}

impl PullPolicy {
    /// Parse the kebab-case form used in configuration files.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "always" => Some(Self::Always),
            "if-not-present" => Some(Self::IfNotPresent),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    /// Canonical kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::IfNotPresent => "if-not-present",
            Self::Never => "never",
        }
    }
}

/// Container image used by the local node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DockerSettings {
    /// Image name.
    pub image: String,

    /// Image tag.
    pub tag: String,

    /// Pull policy.
    pub pull: PullPolicy,
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            image: "ghcr.io/fluentlabs-xyz/fluent".to_string(),
            tag: "latest".to_string(),
            pull: PullPolicy::IfNotPresent,
        }
    }
}

/// Network parameters of the local node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NetworkSettings {
    /// Chain specification name.
    pub chain: String,

    /// Node data directory.
    pub data_dir: String,

    /// Block production interval, e.g. `5sec`.
    pub block_time: String,

    /// P2P port.
    pub port: u16,

    /// JSON-RPC port.
    pub http_port: u16,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            chain: "dev".to_string(),
            data_dir: "./datadir".to_string(),
            block_time: "5sec".to_string(),
            port: 30305,
            http_port: 8545,
        }
    }
}

/// Local node settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NodeSettings {
    /// Container settings.
    pub docker: DockerSettings,

    /// Network settings.
    pub network: NetworkSettings,
}

/// Contract auto-discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DiscoverySettings {
    /// Whether discovery runs when no contracts are declared.
    pub enabled: bool,

    /// Search roots, relative to the project root.
    pub paths: Vec<String>,

    /// Glob patterns excluded from the search.
    pub ignore: Vec<String>,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            paths: vec!["contracts".to_string(), "src".to_string()],
            ignore: vec!["**/target/**".to_string(), "**/node_modules/**".to_string()],
        }
    }
}

/// Interface-description file of a contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InterfaceConfig {
    /// Path to the `.sol` file.
    pub path: String,

    /// Interface name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One fully resolved contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ContractConfig {
    /// Contract directory, relative to the project root.
    pub path: String,

    /// Interface-description file.
    pub interface: InterfaceConfig,

    /// Effective compile settings.
    pub compile: CompileSettings,

    /// Effective test settings.
    pub test: TestSettings,
}
