//! Contract path validation and path display helpers.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::ConfigurationError;
use crate::schema::MANIFEST_FILE;

/// Lexically normalize a user-supplied path.
///
/// Drops `.` components and folds `name/..` pairs. Leading `..` components
/// that cannot be folded are kept. Nothing is read from disk.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Validate an explicitly declared contract path and return its directory.
///
/// `contract_path` may name the contract directory or its manifest. Relative
/// paths are checked against `root`; the returned path keeps the caller's
/// form (relative stays relative), normalized and `/`-separated.
///
/// # Errors
///
/// - `INVALID_PATH` if a manifest path is given and the file does not exist.
/// - `MISSING_MANIFEST` if a directory is given without a manifest inside.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use fluent_config::paths::validate_contract_path;
///
/// let dir = validate_contract_path(Path::new("."), "./contracts/token/Cargo.toml").unwrap();
/// assert_eq!(dir, "contracts/token");
/// ```
pub fn validate_contract_path(root: &Path, contract_path: &str) -> Result<String, ConfigurationError> {
    let normalized = normalize(contract_path);
    let on_disk = root.join(&normalized);

    let names_manifest = normalized
        .file_name()
        .is_some_and(|name| name == MANIFEST_FILE);

    if names_manifest {
        if !on_disk.is_file() {
            return Err(ConfigurationError::invalid_path(to_slash(&normalized)));
        }
        let dir = normalized.parent().unwrap_or_else(|| Path::new(""));
        return Ok(to_slash(dir));
    }

    if !on_disk.join(MANIFEST_FILE).is_file() {
        return Err(ConfigurationError::missing_manifest(to_slash(&normalized)));
    }

    Ok(to_slash(&normalized))
}

/// Express `path` relative to `root`, falling back to canonical forms.
pub(crate) fn relative_to(root: &Path, path: &Path) -> PathBuf {
    if let Ok(rel) = path.strip_prefix(root) {
        return normalize(rel);
    }

    match (fs::canonicalize(root), fs::canonicalize(path)) {
        (Ok(root), Ok(path)) => path
            .strip_prefix(&root)
            .map_or_else(|_| path.clone(), Path::to_path_buf),
        _ => normalize(path),
    }
}

/// Render a path with `/` separators; the empty path renders as `.`.
pub(crate) fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            Component::CurDir => {}
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }

    if out.is_empty() {
        ".".to_string()
    } else {
        out
    }
}
