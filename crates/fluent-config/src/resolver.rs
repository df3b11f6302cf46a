//! Contract-set resolution.
//!
//! Decides between explicitly declared contracts and discovery, then attaches
//! merged settings to every contract. Explicit contracts take full precedence:
//! when a non-empty `contracts` array is given, discovery does not run and is
//! reported as disabled in the resolved configuration.

use std::path::Path;

use tracing::debug;

use crate::config::FluentConfig;
use crate::discovery::{discover, DiscoveredContract};
use crate::error::ConfigurationError;
use crate::merge::{default_env, merge_env, merge_settings};
use crate::paths::{normalize, to_slash, validate_contract_path};
use crate::schema::{
    CompileSettings, ContractConfig, DiscoverySettings, InterfaceConfig, NodeSettings,
    TestSettings,
};
use crate::user::{UserConfig, UserContractConfig};

/// Resolve shape-validated user input into a complete configuration.
///
/// `root` is the project directory; discovery and contract path checks are
/// relative to it. The filesystem is only read.
///
/// # Errors
///
/// - `INVALID_CONFIGURATION` if discovery is disabled and no `contracts` key
///   was given.
/// - `INVALID_PATH` / `MISSING_MANIFEST` for a bad explicit contract path.
/// - Any discovery error, including `NO_CONTRACTS`.
/// - `NO_CONTRACTS` if the final contract list is empty.
pub fn resolve(user: &UserConfig, root: &Path) -> Result<FluentConfig, ConfigurationError> {
    if user.discovery_disabled() && user.contracts.is_none() {
        return Err(ConfigurationError::invalid_configuration(
            "No contracts configured and auto-discovery is disabled",
        ));
    }

    let compile = merge_settings(CompileSettings::default(), user.compile.as_ref(), None);
    let test = merge_settings(TestSettings::default(), user.test.as_ref(), None);
    let node = merge_settings(NodeSettings::default(), user.node.as_ref(), None);
    let env = merge_env(&default_env(), user.env.as_ref());
    let mut discovery = discovery_settings(user);

    let contracts = match user.contracts.as_deref() {
        Some(declared) if !declared.is_empty() => {
            debug!(declared = declared.len(), "Using explicitly configured contracts");
            discovery.enabled = false;
            declared
                .iter()
                .map(|entry| resolve_declared(root, user, entry))
                .collect::<Result<Vec<_>, _>>()?
        }
        _ if discovery.enabled => {
            debug!(paths = ?discovery.paths, "No contracts configured, running discovery");
            discover(root, &discovery)?
                .into_iter()
                .map(|found| attach_global_settings(found, &compile, &test))
                .collect()
        }
        _ => Vec::new(),
    };

    if contracts.is_empty() {
        return Err(ConfigurationError::no_contracts(
            "Could not find any contracts in the project",
        ));
    }

    Ok(FluentConfig {
        compile,
        test,
        node,
        env,
        discovery,
        contracts,
    })
}

/// Discovery settings after merging defaults with the user's block.
#[must_use]
pub fn discovery_settings(user: &UserConfig) -> DiscoverySettings {
    merge_settings(DiscoverySettings::default(), user.discovery.as_ref(), None)
}

fn resolve_declared(
    root: &Path,
    user: &UserConfig,
    entry: &UserContractConfig,
) -> Result<ContractConfig, ConfigurationError> {
    Ok(ContractConfig {
        path: validate_contract_path(root, &entry.path)?,
        interface: InterfaceConfig {
            path: to_slash(&normalize(&entry.interface.path)),
            name: entry.interface.name.clone(),
        },
        compile: merge_settings(
            CompileSettings::default(),
            user.compile.as_ref(),
            entry.compile.as_ref(),
        ),
        test: merge_settings(
            TestSettings::default(),
            user.test.as_ref(),
            entry.test.as_ref(),
        ),
    })
}

fn attach_global_settings(
    found: DiscoveredContract,
    compile: &CompileSettings,
    test: &TestSettings,
) -> ContractConfig {
    ContractConfig {
        path: found.path,
        interface: found.interface,
        compile: compile.clone(),
        test: test.clone(),
    }
}
