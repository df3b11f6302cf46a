//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for collecting raw user input
//! from files, strings, in-memory values and environment variables, and
//! resolving it into a [`FluentConfig`].

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::schema::PullPolicy;
use crate::validation::validate_raw_input;
use crate::{ConfigError, FluentConfig, UserConfig};

/// Configuration loader with layered approach.
///
/// Raw sources are deep-merged in the order they are added: objects merge key
/// by key, any other value (arrays included) is replaced by the later source.
/// Environment overrides are applied last and only touch global settings.
///
/// # Example
///
/// ```no_run
/// use fluent_config::ConfigLoader;
///
/// # fn main() -> Result<(), fluent_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_root("my-project")
///     .with_dotenv()?
///     .with_optional_file("my-project/fluent.toml")?
///     .with_env_prefix("FLUENT")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    raw: Value,
    root: PathBuf,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader with empty input rooted at `.`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: Value::Object(Map::new()),
            root: PathBuf::from("."),
            env_prefix: None,
        }
    }

    /// Set the project root used for discovery and path validation.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load configuration from a file.
    ///
    /// The format is determined by the extension (`.toml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The file contains invalid TOML/JSON
    /// - The extension is neither `toml` nor `json`
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        debug!(path = %path.display(), "Loading configuration file");
        match extension.as_deref() {
            Some(format @ ("toml" | "json")) => self.with_string(&content, format),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in `"toml"` or `"json"` format.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unknown.
    ///
    /// # Example
    ///
    /// ```
    /// use fluent_config::ConfigLoader;
    ///
    /// let raw = ConfigLoader::new()
    ///     .with_string("[compile]\ndebug = true\n", "toml")
    ///     .unwrap()
    ///     .load_raw();
    ///
    /// assert_eq!(raw["compile"]["debug"], true);
    /// ```
    pub fn with_string(self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let value: Value = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => return Err(ConfigError::UnsupportedFormat(format.to_string())),
        };
        Ok(self.with_value(value))
    }

    /// Merge a raw nested value, as handed over by a host framework.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        deep_merge(&mut self.raw, value);
        self
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// Variables use the format `PREFIX__SECTION__KEY`, for example
    /// `FLUENT__COMPILE__DEBUG=true` or `FLUENT__NODE__NETWORK__HTTP_PORT=9545`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load `<root>/.env` into the process environment if it exists.
    ///
    /// Variables already set are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        let path = self.root.join(".env");
        if path.is_file() {
            dotenvy::from_path(&path).map_err(|e| ConfigError::dotenv(&path, e.to_string()))?;
            debug!(path = %path.display(), "Loaded .env file");
        }
        Ok(self)
    }

    /// Apply environment overrides and resolve the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment override cannot be parsed,
    /// the input has the wrong shape, or resolution fails.
    pub fn load(self) -> Result<FluentConfig, ConfigError> {
        let root = self.root.clone();
        let user = self.load_user()?;
        FluentConfig::from_user_config(&user, &root)
    }

    /// Apply environment overrides and validate the input shape without
    /// resolving contracts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment override cannot be parsed or
    /// the input has the wrong shape.
    pub fn load_user(mut self) -> Result<UserConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }
        Ok(validate_raw_input(&self.raw)?)
    }

    /// Return the merged raw input without environment overrides or
    /// resolution.
    #[must_use]
    pub fn load_raw(self) -> Value {
        self.raw
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let env_vars: HashMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();

        for (key, value) in env_vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(key_without_prefix) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__"))
        else {
            return Ok(());
        };

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        let (path, parsed) = match parts.as_slice() {
            ["COMPILE", "TARGET"] => ("compile.target", string(value)),
            ["COMPILE", "DEBUG"] => ("compile.debug", boolean(key, value)?),

            ["TEST", "COMMAND"] => ("test.command", string(value)),
            ["TEST", "TIMEOUT"] => ("test.timeout", integer::<u64>(key, value)?),
            ["TEST", "RETRIES"] => ("test.retries", integer::<u32>(key, value)?),

            ["NODE", "DOCKER", "IMAGE"] => ("node.docker.image", string(value)),
            ["NODE", "DOCKER", "TAG"] => ("node.docker.tag", string(value)),
            ["NODE", "DOCKER", "PULL"] => {
                let policy = PullPolicy::parse(value).ok_or_else(|| {
                    ConfigError::env_parse_error(
                        key,
                        "expected 'always', 'if-not-present', or 'never'",
                    )
                })?;
                ("node.docker.pull", string(policy.as_str()))
            }

            ["NODE", "NETWORK", "CHAIN"] => ("node.network.chain", string(value)),
            ["NODE", "NETWORK", "DATA_DIR"] => ("node.network.dataDir", string(value)),
            ["NODE", "NETWORK", "BLOCK_TIME"] => ("node.network.blockTime", string(value)),
            ["NODE", "NETWORK", "PORT"] => ("node.network.port", integer::<u16>(key, value)?),
            ["NODE", "NETWORK", "HTTP_PORT"] => {
                ("node.network.httpPort", integer::<u16>(key, value)?)
            }

            ["DISCOVERY", "ENABLED"] => ("discovery.enabled", boolean(key, value)?),

            // Unknown key - ignore
            _ => return Ok(()),
        };

        debug!(var = key, "Applying environment override");
        let overlay = path
            .rsplit('.')
            .fold(parsed, |inner, segment| json!({ segment: inner }));
        deep_merge(&mut self.raw, overlay);
        Ok(())
    }
}

/// Deep-merge `overlay` into `base`.
///
/// Objects merge key by key; any other value replaces what was there.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn string(value: &str) -> Value {
    Value::String(value.to_string())
}

fn boolean(key: &str, value: &str) -> Result<Value, ConfigError> {
    parse_bool(value)
        .map(Value::Bool)
        .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

fn integer<T>(key: &str, value: &str) -> Result<Value, ConfigError>
where
    T: std::str::FromStr + Into<u64>,
{
    value
        .parse::<T>()
        .map(|n| Value::from(n.into()))
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_loader_new_is_empty() {
        let loader = ConfigLoader::new();
        assert_eq!(loader.root(), Path::new("."));
        assert_eq!(loader.load_raw(), json!({}));
    }

    #[test]
    fn test_loader_with_string_toml() {
        let toml = r#"
            [node.network]
            httpPort = 9545

            [[contracts]]
            path = "contracts/a"
            interface = { path = "contracts/Ia.sol" }
        "#;

        let raw = ConfigLoader::new().with_string(toml, "toml").unwrap().load_raw();

        assert_eq!(raw["node"]["network"]["httpPort"], 9545);
        assert_eq!(raw["contracts"][0]["interface"]["path"], "contracts/Ia.sol");
    }

    #[test]
    fn test_loader_with_string_json() {
        let raw = ConfigLoader::new()
            .with_string(r#"{"compile": {"debug": true}}"#, "json")
            .unwrap()
            .load_raw();

        assert_eq!(raw["compile"]["debug"], true);
    }

    #[test]
    fn test_loader_with_string_unknown_format() {
        let result = ConfigLoader::new().with_string("a: 1", "yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/fluent.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let raw = ConfigLoader::new()
            .with_optional_file("/nonexistent/fluent.toml")
            .unwrap()
            .load_raw();
        assert_eq!(raw, json!({}));
    }

    #[test]
    fn test_loader_with_file_json() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, r#"{{"test": {{"retries": 3}}}}"#).unwrap();

        let raw = ConfigLoader::new().with_file(file.path()).unwrap().load_raw();
        assert_eq!(raw["test"]["retries"], 3);
    }

    #[test]
    fn test_loader_with_file_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".yaml").unwrap();
        let result = ConfigLoader::new().with_file(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_sources_deep_merge() {
        let raw = ConfigLoader::new()
            .with_value(json!({
                "compile": { "debug": true, "options": ["--release"] },
                "discovery": { "paths": ["contracts"] }
            }))
            .with_value(json!({
                "compile": { "options": ["--locked"] },
                "discovery": { "enabled": false }
            }))
            .load_raw();

        assert_eq!(
            raw,
            json!({
                "compile": { "debug": true, "options": ["--locked"] },
                "discovery": { "paths": ["contracts"], "enabled": false }
            })
        );
    }

    #[test]
    fn test_deep_merge_replaces_scalars_with_objects() {
        let mut base = json!({ "node": "old" });
        deep_merge(&mut base, json!({ "node": { "docker": { "tag": "v1" } } }));
        assert_eq!(base, json!({ "node": { "docker": { "tag": "v1" } } }));
    }

    #[test]
    fn test_load_resolves() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("contracts/a")).unwrap();
        fs::write(dir.path().join("contracts/a/Cargo.toml"), "[package]\nname = \"a\"\n").unwrap();

        let config = ConfigLoader::new()
            .with_root(dir.path())
            .with_value(json!({
                "contracts": [{ "path": "contracts/a", "interface": { "path": "contracts/Ia.sol" } }]
            }))
            .load()
            .unwrap();

        assert_eq!(config.contracts[0].path, "contracts/a");
    }

    #[test]
    fn test_load_user_checks_shape_only() {
        let user = ConfigLoader::new()
            .with_root("/nonexistent/project")
            .with_value(json!({ "discovery": { "paths": ["programs"] } }))
            .load_user()
            .unwrap();
        assert_eq!(
            user.discovery.and_then(|d| d.paths),
            Some(vec!["programs".to_string()])
        );

        let result = ConfigLoader::new().with_value(json!({ "compile": 1 })).load_user();
        assert!(matches!(result, Err(ConfigError::Schema(_))));
    }

    #[test]
    fn test_with_dotenv_missing_file_is_ok() {
        let dir = tempdir().unwrap();
        assert!(ConfigLoader::new().with_root(dir.path()).with_dotenv().is_ok());
    }

    #[test]
    fn test_with_dotenv_malformed_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "BAD LINE\n").unwrap();

        let err = ConfigLoader::new().with_root(dir.path()).with_dotenv().unwrap_err();
        match &err {
            ConfigError::Dotenv { path, .. } => assert_eq!(path, &dir.path().join(".env")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("failed to load "));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));

        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));

        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    // Overrides are exercised through apply_env_var directly; mutating the
    // process environment from parallel tests is racy.

    #[test]
    fn test_apply_env_var_compile() {
        let mut loader = ConfigLoader::new().with_value(json!({ "compile": { "target": "x" } }));
        loader.apply_env_var("TEST__COMPILE__DEBUG", "yes", "TEST").unwrap();
        loader.apply_env_var("TEST__COMPILE__TARGET", "wasm32-wasip1", "TEST").unwrap();

        assert_eq!(
            loader.raw,
            json!({ "compile": { "target": "wasm32-wasip1", "debug": true } })
        );
    }

    #[test]
    fn test_apply_env_var_network() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__NODE__NETWORK__HTTP_PORT", "9545", "TEST").unwrap();
        loader.apply_env_var("TEST__NODE__NETWORK__DATA_DIR", "/tmp/data", "TEST").unwrap();

        assert_eq!(loader.raw["node"]["network"]["httpPort"], 9545);
        assert_eq!(loader.raw["node"]["network"]["dataDir"], "/tmp/data");
    }

    #[test]
    fn test_apply_env_var_pull_is_canonical() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__NODE__DOCKER__PULL", "Always", "TEST").unwrap();
        assert_eq!(loader.raw["node"]["docker"]["pull"], "always");

        loader.apply_env_var("TEST__NODE__DOCKER__PULL", "IF-NOT-PRESENT", "TEST").unwrap();
        assert_eq!(loader.raw["node"]["docker"]["pull"], "if-not-present");

        let user = loader.load_user().unwrap();
        assert_eq!(
            user.node.and_then(|n| n.docker).and_then(|d| d.pull),
            Some(PullPolicy::IfNotPresent)
        );
    }

    #[test]
    fn test_apply_env_var_invalid_values() {
        let mut loader = ConfigLoader::new();
        assert!(loader.apply_env_var("TEST__TEST__TIMEOUT", "soon", "TEST").is_err());
        assert!(loader.apply_env_var("TEST__NODE__NETWORK__PORT", "70000", "TEST").is_err());
        assert!(loader.apply_env_var("TEST__DISCOVERY__ENABLED", "maybe", "TEST").is_err());
        assert!(loader.apply_env_var("TEST__NODE__DOCKER__PULL", "sometimes", "TEST").is_err());
    }

    #[test]
    fn test_apply_env_var_unknown_key_ignored() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__CONTRACTS__PATH", "x", "TEST").unwrap();
        loader.apply_env_var("TESTING", "x", "TEST").unwrap();
        assert_eq!(loader.raw, json!({}));
    }
}
