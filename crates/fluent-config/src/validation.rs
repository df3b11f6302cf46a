//! Shape validation of raw input and resolved output.
//!
//! Input validation runs before any merge or discovery so a malformed
//! configuration never reaches the resolver. Output validation is a safety
//! net guaranteeing downstream tasks a fully populated configuration.

use serde_json::Value;
use tracing::debug;

use crate::config::FluentConfig;
use crate::error::SchemaError;
use crate::schema::{CompileSettings, ContractConfig, TestSettings};
use crate::user::UserConfig;

/// Validate the shape of raw user input.
///
/// `null` is treated as an empty configuration. Anything other than an
/// object at the root is rejected. Types, enum membership (`pull`) and
/// required contract fields are checked here. Unknown keys are ignored and
/// logged.
///
/// # Errors
///
/// Returns [`SchemaError`] describing the first violation.
pub fn validate_raw_input(raw: &Value) -> Result<UserConfig, SchemaError> {
    let user: UserConfig = match raw {
        Value::Null => UserConfig::default(),
        Value::Object(_) => {
            serde_json::from_value(raw.clone()).map_err(|e| SchemaError::Deserialize {
                path: ".".to_string(),
                reason: e.to_string(),
            })?
        }
        other => {
            return Err(SchemaError::Deserialize {
                path: ".".to_string(),
                reason: format!("expected an object, found {}", type_name(other)),
            })
        }
    };

    for (i, contract) in user.contracts.iter().flatten().enumerate() {
        require(&format!("contracts[{i}].path"), &contract.path)?;
        require(&format!("contracts[{i}].interface.path"), &contract.interface.path)?;
    }

    if let Ok(known) = serde_json::to_value(&user) {
        let ignored = ignored_keys(raw, &known);
        if !ignored.is_empty() {
            debug!(keys = ?ignored, "Ignoring unknown configuration keys");
        }
    }

    Ok(user)
}

/// Dotted paths of non-null keys in `raw` that `known` does not carry.
fn ignored_keys(raw: &Value, known: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_ignored(raw, known, "", &mut out);
    out
}

fn collect_ignored(raw: &Value, known: &Value, prefix: &str, out: &mut Vec<String>) {
    match (raw, known) {
        (Value::Object(raw), Value::Object(known)) => {
            for (key, value) in raw {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                match known.get(key) {
                    Some(inner) => collect_ignored(value, inner, &path, out),
                    None if !value.is_null() => out.push(path),
                    None => {}
                }
            }
        }
        (Value::Array(raw), Value::Array(known)) => {
            for (i, (value, inner)) in raw.iter().zip(known).enumerate() {
                collect_ignored(value, inner, &format!("{prefix}[{i}]"), out);
            }
        }
        _ => {}
    }
}

/// Check that a resolved configuration is complete.
///
/// # Errors
///
/// Returns [`SchemaError`] naming the first empty or out-of-range field.
pub fn validate_resolved_output(config: &FluentConfig) -> Result<(), SchemaError> {
    validate_compile("compile", &config.compile)?;
    validate_test("test", &config.test)?;

    let docker = &config.node.docker;
    require("node.docker.image", &docker.image)?;
    require("node.docker.tag", &docker.tag)?;

    let network = &config.node.network;
    require("node.network.chain", &network.chain)?;
    require("node.network.dataDir", &network.data_dir)?;
    require("node.network.blockTime", &network.block_time)?;
    require_port("node.network.port", network.port)?;
    require_port("node.network.httpPort", network.http_port)?;

    if config.env.keys().any(String::is_empty) {
        return Err(SchemaError::invalid_value("env", "variable names must not be empty"));
    }

    if config.contracts.is_empty() {
        return Err(SchemaError::missing_field("contracts"));
    }
    for (i, contract) in config.contracts.iter().enumerate() {
        validate_contract(i, contract)?;
    }

    Ok(())
}

fn validate_contract(index: usize, contract: &ContractConfig) -> Result<(), SchemaError> {
    let prefix = format!("contracts[{index}]");
    require(&format!("{prefix}.path"), &contract.path)?;
    require(&format!("{prefix}.interface.path"), &contract.interface.path)?;
    validate_compile(&format!("{prefix}.compile"), &contract.compile)?;
    validate_test(&format!("{prefix}.test"), &contract.test)
}

fn validate_compile(prefix: &str, settings: &CompileSettings) -> Result<(), SchemaError> {
    require(&format!("{prefix}.target"), &settings.target)
}

fn validate_test(prefix: &str, settings: &TestSettings) -> Result<(), SchemaError> {
    require(&format!("{prefix}.command"), &settings.command)
}

fn require(field: &str, value: &str) -> Result<(), SchemaError> {
    if value.trim().is_empty() {
        return Err(SchemaError::missing_field(field));
    }
    Ok(())
}

fn require_port(field: &str, port: u16) -> Result<(), SchemaError> {
    if port == 0 {
        return Err(SchemaError::invalid_value(field, "port must be between 1 and 65535"));
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DiscoverySettings, InterfaceConfig, NodeSettings};
    use serde_json::json;

    fn resolved() -> FluentConfig {
        FluentConfig {
            compile: CompileSettings::default(),
            test: TestSettings::default(),
            node: NodeSettings::default(),
            env: crate::merge::default_env(),
            discovery: DiscoverySettings::default(),
            contracts: vec![ContractConfig {
                path: "contracts/a".to_string(),
                interface: InterfaceConfig {
                    path: "contracts/Ia.sol".to_string(),
                    name: None,
                },
                compile: CompileSettings::default(),
                test: TestSettings::default(),
            }],
        }
    }

    #[test]
    fn test_null_is_empty_config() {
        assert_eq!(validate_raw_input(&Value::Null).unwrap(), UserConfig::default());
    }

    #[test]
    fn test_non_object_rejected() {
        let err = validate_raw_input(&json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(validate_raw_input(&json!({ "compile": { "debug": "yes" } })).is_err());
        assert!(validate_raw_input(&json!({ "test": { "timeout": -1 } })).is_err());
        assert!(validate_raw_input(&json!({ "env": { "A": 1 } })).is_err());
    }

    #[test]
    fn test_invalid_pull_policy_rejected() {
        let err = validate_raw_input(&json!({ "node": { "docker": { "pull": "invalid" } } }))
            .unwrap_err();
        assert!(matches!(err, SchemaError::Deserialize { .. }));
    }

    #[test]
    fn test_missing_interface_rejected() {
        let err = validate_raw_input(&json!({ "contracts": [{ "path": "test-path" }] }))
            .unwrap_err();
        assert!(err.to_string().contains("interface"));
    }

    #[test]
    fn test_empty_interface_path_rejected() {
        let err = validate_raw_input(&json!({
            "contracts": [{ "path": "a", "interface": { "path": " " } }]
        }))
        .unwrap_err();
        assert_eq!(err, SchemaError::missing_field("contracts[0].interface.path"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let raw = json!({
            "paths": { "artifacts": "out" },
            "compile": { "debug": true, "optimize": true },
            "contracts": [{ "path": "a", "interface": { "path": "Ia.sol" }, "extra": 1 }]
        });

        let user = validate_raw_input(&raw).unwrap();
        assert_eq!(user.compile.as_ref().and_then(|c| c.debug), Some(true));

        let known = serde_json::to_value(&user).unwrap();
        assert_eq!(
            ignored_keys(&raw, &known),
            vec!["compile.optimize", "contracts[0].extra", "paths"]
        );
    }

    #[test]
    fn test_null_keys_not_reported() {
        let raw = json!({ "compile": null, "test": { "retries": 1 } });
        let user = validate_raw_input(&raw).unwrap();
        let known = serde_json::to_value(&user).unwrap();
        assert!(ignored_keys(&raw, &known).is_empty());
    }

    #[test]
    fn test_resolved_output_valid() {
        assert!(validate_resolved_output(&resolved()).is_ok());
    }

    #[test]
    fn test_resolved_output_requires_contracts() {
        let mut config = resolved();
        config.contracts.clear();
        assert_eq!(
            validate_resolved_output(&config).unwrap_err(),
            SchemaError::missing_field("contracts")
        );
    }

    #[test]
    fn test_resolved_output_rejects_zero_port() {
        let mut config = resolved();
        config.node.network.http_port = 0;
        assert!(matches!(
            validate_resolved_output(&config).unwrap_err(),
            SchemaError::InvalidValue { field, .. } if field == "node.network.httpPort"
        ));
    }

    #[test]
    fn test_resolved_output_rejects_empty_contract_target() {
        let mut config = resolved();
        config.contracts[0].compile.target = String::new();
        assert_eq!(
            validate_resolved_output(&config).unwrap_err(),
            SchemaError::missing_field("contracts[0].compile.target")
        );
    }
}
