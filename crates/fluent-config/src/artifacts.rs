//! Artifact layout for resolved contracts.
//!
//! Pure path computations telling the compile task where each contract's
//! artifact goes and where the ABI of its interface is expected. Only
//! [`load_interface_abi`] touches the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::ArtifactError;
use crate::paths::{normalize, to_slash};
use crate::schema::INTERFACE_EXTENSION;
use crate::FluentConfig;

/// `format` field of a contract artifact.
pub const ARTIFACT_FORMAT: &str = "hh-wasm-artifact-1";

/// Module name used when a contract directory has no name of its own.
const FALLBACK_MODULE_NAME: &str = "contract";

/// File name of the compiled module for a contract directory.
///
/// A directory with no final component of its own (`.`, `..`) is named after
/// the directory it resolves to under `root`.
///
/// ```
/// use std::path::Path;
/// use fluent_config::artifacts::wasm_artifact_name;
///
/// assert_eq!(wasm_artifact_name(Path::new("."), "contracts/my-token"), "my_token.wasm");
/// ```
#[must_use]
pub fn wasm_artifact_name(root: &Path, contract_dir: &str) -> String {
    let normalized = normalize(contract_dir);
    let last = normalized.file_name().map_or_else(
        || resolved_dir_name(root, contract_dir),
        |name| name.to_string_lossy().into_owned(),
    );
    format!("{}.wasm", last.replace('-', "_"))
}

fn resolved_dir_name(root: &Path, contract_dir: &str) -> String {
    fs::canonicalize(root.join(contract_dir))
        .ok()
        .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| FALLBACK_MODULE_NAME.to_string())
}

/// Source name recorded in the artifact: the contract's parent directory
/// joined with its wasm name.
#[must_use]
pub fn artifact_source_name(root: &Path, contract_dir: &str) -> String {
    let normalized = normalize(contract_dir);
    let parent = normalized.parent().unwrap_or_else(|| Path::new(""));
    to_slash(&parent.join(wasm_artifact_name(root, contract_dir)))
}

/// Where the compiled interface artifact is expected:
/// `<artifacts_root>/<interface_path>/<InterfaceStem>.json`.
#[must_use]
pub fn interface_artifact_path(artifacts_root: &Path, interface_path: &str) -> PathBuf {
    let interface = normalize(interface_path);
    let file_name = interface
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = format!(".{INTERFACE_EXTENSION}");
    let stem = file_name.strip_suffix(&suffix).unwrap_or(&file_name);

    artifacts_root.join(&interface).join(format!("{stem}.json"))
}

/// Read the `abi` array of a compiled interface.
///
/// # Errors
///
/// - [`ArtifactError::AbiNotFound`] if the artifact does not exist.
/// - [`ArtifactError::Read`] if it cannot be read.
/// - [`ArtifactError::Parse`] if it is not JSON or has no `abi` array.
pub fn load_interface_abi(artifacts_root: &Path, interface_path: &str) -> Result<Value, ArtifactError> {
    let path = interface_artifact_path(artifacts_root, interface_path);
    if !path.is_file() {
        return Err(ArtifactError::AbiNotFound { path });
    }

    let content = fs::read_to_string(&path).map_err(|source| ArtifactError::Read {
        path: path.clone(),
        source,
    })?;
    let mut artifact: Value = serde_json::from_str(&content).map_err(|e| ArtifactError::Parse {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    match artifact.get_mut("abi").map(Value::take) {
        Some(abi @ Value::Array(_)) => Ok(abi),
        _ => Err(ArtifactError::Parse {
            path,
            reason: "missing `abi` array".to_string(),
        }),
    }
}

/// Artifact locations for one resolved contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactPlan {
    /// Artifact format tag, always [`ARTIFACT_FORMAT`].
    pub format: String,
    /// Contract directory, relative to the project root.
    pub contract_dir: String,
    /// Compiled module file name.
    pub wasm_name: String,
    /// Source name recorded in the artifact.
    pub source_name: String,
    /// Interface-description file path.
    pub interface_path: String,
    /// Expected location of the compiled interface artifact.
    pub interface_artifact: PathBuf,
    /// Interface ABI, once loaded with [`ArtifactPlan::load_abi`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abi: Option<Value>,
}

impl ArtifactPlan {
    /// Load the interface ABI from `artifacts_root` into the plan.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] as [`load_interface_abi`] does.
    pub fn load_abi(&mut self, artifacts_root: &Path) -> Result<(), ArtifactError> {
        self.abi = Some(load_interface_abi(artifacts_root, &self.interface_path)?);
        Ok(())
    }
}

/// Plan artifact locations for every contract, in resolution order.
///
/// `root` is the project root contract paths are relative to.
#[must_use]
pub fn plan_artifacts(
    config: &FluentConfig,
    root: &Path,
    artifacts_root: &Path,
) -> Vec<ArtifactPlan> {
    config
        .contracts
        .iter()
        .map(|contract| ArtifactPlan {
            format: ARTIFACT_FORMAT.to_string(),
            contract_dir: contract.path.clone(),
            wasm_name: wasm_artifact_name(root, &contract.path),
            source_name: artifact_source_name(root, &contract.path),
            interface_path: contract.interface.path.clone(),
            interface_artifact: interface_artifact_path(artifacts_root, &contract.interface.path),
            abi: None,
        })
        .collect()
}
