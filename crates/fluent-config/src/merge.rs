//! Three-layer settings merge.
//!
//! Precedence, lowest to highest: built-in defaults, the user's global block,
//! the per-contract block. Each category is merged key by key; a key present
//! in a higher layer replaces the lower value wholesale. Arrays are replaced,
//! never concatenated.
//!
//! | Category    | Layers                     |
//! |-------------|----------------------------|
//! | `compile`   | default → global → contract |
//! | `test`      | default → global → contract |
//! | `node`      | default → global            |
//! | `discovery` | default → global            |
//! | `env`       | default → global            |

use std::collections::BTreeMap;

use crate::schema::{
    CompileSettings, DiscoverySettings, DockerSettings, NetworkSettings, NodeSettings,
    TestSettings,
};
use crate::user::{
    PartialCompileSettings, PartialDiscoverySettings, PartialDockerSettings,
    PartialNetworkSettings, PartialNodeSettings, PartialTestSettings,
};

/// A complete settings type that can absorb a partial layer on top of itself.
pub trait Layered: Sized {
    /// The all-optional counterpart.
    type Partial;

    /// Apply `layer` over `self`, replacing every key the layer sets.
    #[must_use]
    fn apply(self, layer: &Self::Partial) -> Self;
}

/// Merge `defaults`, then `global`, then `overrides`.
///
/// Pure and total: absent layers are skipped.
///
/// # Example
///
/// ```
/// use fluent_config::merge::merge_settings;
/// use fluent_config::{CompileSettings, PartialCompileSettings};
///
/// let global = PartialCompileSettings {
///     options: Some(vec!["--global-option".into()]),
///     ..Default::default()
/// };
/// let contract = PartialCompileSettings {
///     options: Some(vec!["--contract-option".into()]),
///     ..Default::default()
/// };
///
/// let merged = merge_settings(CompileSettings::default(), Some(&global), Some(&contract));
/// assert_eq!(merged.options, vec!["--contract-option"]);
/// assert_eq!(merged.target, "wasm32-unknown-unknown");
/// ```
#[must_use]
pub fn merge_settings<T: Layered>(
    defaults: T,
    global: Option<&T::Partial>,
    overrides: Option<&T::Partial>,
) -> T {
    [global, overrides]
        .into_iter()
        .flatten()
        .fold(defaults, T::apply)
}

/// Merge environment maps; global keys win over default keys.
#[must_use]
pub fn merge_env(
    defaults: &BTreeMap<String, String>,
    global: Option<&BTreeMap<String, String>>,
) -> BTreeMap<String, String> {
    let mut merged = defaults.clone();
    if let Some(global) = global {
        merged.extend(global.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

/// Built-in environment for the node and toolchain.
#[must_use]
pub fn default_env() -> BTreeMap<String, String> {
    BTreeMap::from([("RUST_LOG".to_string(), "info".to_string())])
}

fn replace<T: Clone>(slot: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        slot.clone_from(value);
    }
}

impl Layered for CompileSettings {
    type Partial = PartialCompileSettings;

    fn apply(mut self, layer: &PartialCompileSettings) -> Self {
        replace(&mut self.target, layer.target.as_ref());
        replace(&mut self.debug, layer.debug.as_ref());
        replace(&mut self.options, layer.options.as_ref());
        self
    }
}

impl Layered for TestSettings {
    type Partial = PartialTestSettings;

    fn apply(mut self, layer: &PartialTestSettings) -> Self {
        replace(&mut self.command, layer.command.as_ref());
        replace(&mut self.options, layer.options.as_ref());
        replace(&mut self.timeout, layer.timeout.as_ref());
        replace(&mut self.retries, layer.retries.as_ref());
        self
    }
}

impl Layered for DockerSettings {
    type Partial = PartialDockerSettings;

    fn apply(mut self, layer: &PartialDockerSettings) -> Self {
        replace(&mut self.image, layer.image.as_ref());
        replace(&mut self.tag, layer.tag.as_ref());
        replace(&mut self.pull, layer.pull.as_ref());
        self
    }
}

impl Layered for NetworkSettings {
    type Partial = PartialNetworkSettings;

    fn apply(mut self, layer: &PartialNetworkSettings) -> Self {
        replace(&mut self.chain, layer.chain.as_ref());
        replace(&mut self.data_dir, layer.data_dir.as_ref());
        replace(&mut self.block_time, layer.block_time.as_ref());
        replace(&mut self.port, layer.port.as_ref());
        replace(&mut self.http_port, layer.http_port.as_ref());
        self
    }
}

// Node nests two categories; each is merged on its own.
impl Layered for NodeSettings {
    type Partial = PartialNodeSettings;

    fn apply(self, layer: &PartialNodeSettings) -> Self {
        Self {
            docker: merge_settings(self.docker, layer.docker.as_ref(), None),
            network: merge_settings(self.network, layer.network.as_ref(), None),
        }
    }
}

impl Layered for DiscoverySettings {
    type Partial = PartialDiscoverySettings;

    fn apply(mut self, layer: &PartialDiscoverySettings) -> Self {
        replace(&mut self.enabled, layer.enabled.as_ref());
        replace(&mut self.paths, layer.paths.as_ref());
        replace(&mut self.ignore, layer.ignore.as_ref());
        self
    }
}
