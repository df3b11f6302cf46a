//! Contract discovery.
//!
//! Scans each discovery root for manifests, keeps the directories whose
//! manifest mentions the framework, and pairs every contract with an
//! interface file named after the package (`my-token` → `IMyToken.sol`)
//! in the contract directory's parent.
//!
//! Per-candidate failures are logged and skipped. Only an empty result or a
//! failure of the search itself aborts discovery.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use glob::{MatchOptions, Pattern};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigurationError;
use crate::paths::{relative_to, to_slash};
use crate::schema::{
    DiscoverySettings, InterfaceConfig, FRAMEWORK_MARKER, INTERFACE_EXTENSION, MANIFEST_FILE,
};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A contract found on disk, before settings are attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredContract {
    /// Contract directory, relative to the project root.
    pub path: String,

    /// Matching interface file, relative to the project root.
    pub interface: InterfaceConfig,
}

/// Find every contract under the configured discovery roots.
///
/// Roots are processed in the order listed; within a root, manifests come in
/// glob match order. A directory reached from several roots is processed once.
///
/// # Errors
///
/// - `DISCOVERY_ERROR` if a search or ignore pattern is malformed.
/// - `NO_CONTRACTS` if nothing usable was found.
pub fn discover(
    root: &Path,
    settings: &DiscoverySettings,
) -> Result<Vec<DiscoveredContract>, ConfigurationError> {
    let ignore = compile_ignore_patterns(&settings.ignore)?;
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut discovered = Vec::new();

    for search_path in &settings.paths {
        for manifest in find_manifests(root, search_path)? {
            let relative = relative_to(root, &manifest);
            if ignore.iter().any(|p| p.matches_path_with(&relative, MATCH_OPTIONS)) {
                continue;
            }

            let Some(contract_dir) = manifest.parent() else {
                continue;
            };

            let key = fs::canonicalize(contract_dir).unwrap_or_else(|_| contract_dir.to_path_buf());
            if !seen.insert(key) {
                continue;
            }

            if !is_valid_contract_directory(contract_dir) {
                debug!(contract_dir = %contract_dir.display(), "Skipping non-contract crate");
                continue;
            }

            match inspect_candidate(root, contract_dir) {
                Ok(contract) => {
                    debug!(
                        contract_dir = %contract.path,
                        interface = %contract.interface.path,
                        "Discovered contract"
                    );
                    discovered.push(contract);
                }
                Err(e) if e.is_interface_not_found() => {
                    warn!(
                        contract_dir = %contract_dir.display(),
                        code = %e.code,
                        details = %e.details.join("; "),
                        "{} for contract, skipping",
                        e.message
                    );
                }
                Err(e) => {
                    warn!(
                        contract_dir = %contract_dir.display(),
                        code = %e.code,
                        details = %e.details.join("; "),
                        "Failed to process contract: {}",
                        e.message
                    );
                }
            }
        }
    }

    if discovered.is_empty() {
        return Err(ConfigurationError::no_contracts(
            "Could not find any valid contracts in the project",
        ));
    }

    info!(discovered = discovered.len(), "Contract discovery finished");
    Ok(discovered)
}

/// Whether `dir` holds a manifest mentioning the framework.
///
/// Unreadable or missing manifests count as "not a contract".
pub fn is_valid_contract_directory(dir: &Path) -> bool {
    fs::read_to_string(dir.join(MANIFEST_FILE))
        .map(|content| content.contains(FRAMEWORK_MARKER))
        .unwrap_or(false)
}

/// Read the package name from a contract's manifest.
///
/// `contract_path` may be the contract directory or the manifest itself.
/// Only the `name = "..."` line is extracted; the manifest is not parsed as
/// TOML.
///
/// # Errors
///
/// - `MANIFEST_READ_ERROR` if the manifest cannot be read.
/// - `INVALID_MANIFEST` if no `name` field is present.
pub fn resolve_contract_name(contract_path: &Path) -> Result<String, ConfigurationError> {
    let manifest = if contract_path.ends_with(MANIFEST_FILE) {
        contract_path.to_path_buf()
    } else {
        contract_path.join(MANIFEST_FILE)
    };

    let content = fs::read_to_string(&manifest)
        .map_err(|e| ConfigurationError::manifest_read_error(manifest.display(), e))?;

    name_regex()
        .captures(&content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ConfigurationError::invalid_manifest(manifest.display()))
}

/// Convert `kebab-case` or `snake_case` to `PascalCase`.
///
/// ```
/// use fluent_config::discovery::to_pascal_case;
///
/// assert_eq!(to_pascal_case("my-token"), "MyToken");
/// assert_eq!(to_pascal_case("random_GENERATOR"), "RandomGenerator");
/// ```
pub fn to_pascal_case(name: &str) -> String {
    name.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect()
}

/// Interface name for a contract package: `I` + PascalCase name.
pub fn interface_name(contract_name: &str) -> String {
    format!("I{}", to_pascal_case(contract_name))
}

/// Locate the interface file for `contract_dir` in its parent directory.
///
/// # Errors
///
/// `INTERFACE_NOT_FOUND` with the expected location and naming rule.
pub fn find_contract_interface(
    root: &Path,
    contract_dir: &Path,
    contract_name: &str,
) -> Result<InterfaceConfig, ConfigurationError> {
    let name = interface_name(contract_name);
    let parent = contract_dir.parent().unwrap_or_else(|| Path::new(""));
    let expected = parent.join(format!("{name}.{INTERFACE_EXTENSION}"));

    if !expected.is_file() {
        return Err(ConfigurationError::interface_not_found(
            to_slash(&relative_to(root, &expected)),
            &name,
        ));
    }

    Ok(InterfaceConfig {
        path: to_slash(&relative_to(root, &expected)),
        name: Some(name),
    })
}

fn inspect_candidate(
    root: &Path,
    contract_dir: &Path,
) -> Result<DiscoveredContract, ConfigurationError> {
    let contract_name = resolve_contract_name(contract_dir)?;
    let interface = find_contract_interface(root, contract_dir, &contract_name)?;

    Ok(DiscoveredContract {
        path: to_slash(&relative_to(root, contract_dir)),
        interface,
    })
}

fn find_manifests(root: &Path, search_path: &str) -> Result<Vec<PathBuf>, ConfigurationError> {
    let search_path = search_path.trim_end_matches('/');
    let pattern = format!(
        "{}/{search_path}/**/{MANIFEST_FILE}",
        Pattern::escape(&root.to_string_lossy())
    );

    let entries = glob::glob_with(&pattern, MATCH_OPTIONS)
        .map_err(|e| ConfigurationError::discovery_error(format!("{pattern}: {e}")))?;

    let mut manifests = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => manifests.push(path),
            Err(e) => {
                warn!(path = %e.path().display(), "Unreadable path during discovery: {}", e.error());
            }
        }
    }
    Ok(manifests)
}

fn compile_ignore_patterns(patterns: &[String]) -> Result<Vec<Pattern>, ConfigurationError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                ConfigurationError::discovery_error(format!("invalid ignore pattern {p}: {e}"))
            })
        })
        .collect()
}

fn name_regex() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| {
        Regex::new(r#"(?m)^\s*name\s*=\s*"([^"]+)""#).expect("name pattern is a valid regex")
    })
}
