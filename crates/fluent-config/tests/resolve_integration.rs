//! End-to-end resolution against real project layouts.

use std::fs;
use std::path::Path;

use fluent_config::discovery::{discover, resolve_contract_name};
use fluent_config::{ConfigLoader, DiscoverySettings, ErrorCode, FluentConfig};
use serde_json::json;
use tempfile::{tempdir, TempDir};

const CONTRACT_MANIFEST: &str = r#"[package]
name = "{name}"
version = "0.1.0"
edition = "2021"

[dependencies]
fluentbase-sdk = { git = "https://github.com/fluentlabs-xyz/fluentbase", default-features = false }
"#;

fn write_contract(root: &Path, dir: &str, name: &str) {
    let path = root.join(dir);
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("Cargo.toml"), CONTRACT_MANIFEST.replace("{name}", name)).unwrap();
    fs::create_dir_all(path.join("src")).unwrap();
    fs::write(path.join("src/lib.rs"), "#![no_std]\n").unwrap();
}

fn write_interface(root: &Path, file: &str) {
    let path = root.join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "interface I {}\n").unwrap();
}

/// Two discoverable contracts under `contracts/` and one plain crate.
fn sample_project() -> TempDir {
    let dir = tempdir().unwrap();
    write_contract(dir.path(), "contracts/greeting", "greeting");
    write_interface(dir.path(), "contracts/IGreeting.sol");
    write_contract(dir.path(), "contracts/my-token", "my-token");
    write_interface(dir.path(), "contracts/IMyToken.sol");

    fs::create_dir_all(dir.path().join("contracts/helper")).unwrap();
    fs::write(
        dir.path().join("contracts/helper/Cargo.toml"),
        "[package]\nname = \"helper\"\n",
    )
    .unwrap();
    dir
}

fn paths(config: &FluentConfig) -> Vec<&str> {
    let mut paths: Vec<&str> = config.contracts.iter().map(|c| c.path.as_str()).collect();
    paths.sort_unstable();
    paths
}

#[test]
fn test_discovery_finds_framework_contracts() {
    let project = sample_project();
    let config = FluentConfig::parse(&json!({}), project.path()).unwrap();

    assert_eq!(paths(&config), vec!["contracts/greeting", "contracts/my-token"]);
    let token = config.contract("contracts/my-token").unwrap();
    assert_eq!(token.interface.path, "contracts/IMyToken.sol");
    assert_eq!(token.interface.name.as_deref(), Some("IMyToken"));
}

#[test]
fn test_resolution_is_idempotent() {
    let project = sample_project();
    let raw = json!({ "compile": { "debug": true }, "discovery": { "paths": ["contracts"] } });

    let first = FluentConfig::parse(&raw, project.path()).unwrap();
    let second = FluentConfig::parse(&raw, project.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_discovery_skips_contract_without_interface() {
    let dir = tempdir().unwrap();
    write_contract(dir.path(), "contracts/with-interface", "with-interface");
    write_interface(dir.path(), "contracts/IWithInterface.sol");
    write_contract(dir.path(), "contracts/without-interface", "without-interface");

    let found = discover(dir.path(), &DiscoverySettings::default()).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "contracts/with-interface");
}

#[test]
fn test_empty_discovery_fails() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("contracts/plain")).unwrap();
    fs::write(dir.path().join("contracts/plain/Cargo.toml"), "[package]\nname = \"plain\"\n").unwrap();

    let err = FluentConfig::parse(&json!({}), dir.path()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NoContracts));
}

#[test]
fn test_explicit_contracts_override_discovery() {
    let project = sample_project();
    let raw = json!({
        "contracts": [
            { "path": "contracts/greeting", "interface": { "path": "contracts/IGreeting.sol" } }
        ]
    });

    let config = FluentConfig::parse(&raw, project.path()).unwrap();
    assert_eq!(config.contracts.len(), 1);
    assert!(!config.discovery.enabled);
}

#[test]
fn test_disabled_discovery_without_contracts_is_invalid() {
    let project = sample_project();
    let err = FluentConfig::parse(&json!({ "discovery": { "enabled": false } }), project.path())
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidConfiguration));
}

#[test]
fn test_contract_options_replace_global_options() {
    let dir = tempdir().unwrap();
    write_contract(dir.path(), "a", "a");
    write_contract(dir.path(), "b", "b");

    let raw = json!({
        "compile": { "target": "global-target", "options": ["--global-option"] },
        "contracts": [
            {
                "path": "a",
                "interface": { "path": "Ia.sol" },
                "compile": { "options": ["--contract-option"] }
            },
            { "path": "b", "interface": { "path": "Ib.sol" } }
        ]
    });

    let config = FluentConfig::parse(&raw, dir.path()).unwrap();
    assert_eq!(config.contracts[0].compile.options, vec!["--contract-option"]);
    assert_eq!(config.contracts[0].compile.target, "global-target");
    assert_eq!(config.contracts[1].compile.options, vec!["--global-option"]);
}

#[test]
fn test_three_layer_precedence() {
    let dir = tempdir().unwrap();
    write_contract(dir.path(), "a", "a");

    let raw = json!({
        "test": { "timeout": 1000, "retries": 1 },
        "contracts": [{
            "path": "a",
            "interface": { "path": "Ia.sol" },
            "test": { "timeout": 2000 }
        }]
    });

    let config = FluentConfig::parse(&raw, dir.path()).unwrap();
    let test = &config.contracts[0].test;
    assert_eq!(test.timeout, 2000);
    assert_eq!(test.retries, 1);
    assert_eq!(test.command, "cargo test");
}

#[test]
fn test_manifest_without_name_is_invalid() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Cargo.toml"), "[package]\nversion = \"0.1.0\"\n").unwrap();

    let err = resolve_contract_name(dir.path()).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidManifest);
    assert!(err.details.iter().any(|d| d.contains("Cargo.toml")));
}

#[test]
fn test_interface_naming() {
    let dir = tempdir().unwrap();
    write_contract(dir.path(), "contracts/my-token", "my-token");

    let err = discover(dir.path(), &DiscoverySettings::default()).unwrap_err();
    assert_eq!(err.code, ErrorCode::NoContracts);

    write_interface(dir.path(), "contracts/IMyToken.sol");
    let found = discover(dir.path(), &DiscoverySettings::default()).unwrap();
    assert_eq!(found[0].interface.name.as_deref(), Some("IMyToken"));
}

#[test]
fn test_ignore_patterns_exclude_build_output() {
    let project = sample_project();
    write_contract(project.path(), "contracts/greeting/target/copy", "greeting-copy");
    write_interface(project.path(), "contracts/greeting/target/IGreetingCopy.sol");

    let config = FluentConfig::parse(&json!({}), project.path()).unwrap();
    assert_eq!(config.contracts.len(), 2);
}

#[test]
fn test_loader_layers_files_and_values() {
    let project = sample_project();
    fs::write(
        project.path().join("fluent.toml"),
        "[compile]\ndebug = true\n\n[node.docker]\ntag = \"v0.4.0\"\n",
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_root(project.path())
        .with_file(project.path().join("fluent.toml"))
        .unwrap()
        .with_value(json!({ "node": { "docker": { "pull": "always" } } }))
        .load()
        .unwrap();

    assert!(config.compile.debug);
    assert!(config.contracts.iter().all(|c| c.compile.debug));
    assert_eq!(config.node.docker.tag, "v0.4.0");
    assert_eq!(config.node.docker.pull, fluent_config::PullPolicy::Always);
    assert_eq!(config.node.docker.image, "ghcr.io/fluentlabs-xyz/fluent");
}

#[test]
fn test_unknown_keys_ignored() {
    let project = sample_project();
    let config = FluentConfig::parse(
        &json!({
            "compile": { "debug": true, "optimize": true },
            "paths": { "artifacts": "out" },
            "contracts": [{
                "path": "contracts/greeting",
                "interface": { "path": "contracts/IGreeting.sol" },
                "notes": "kept out of the result"
            }]
        }),
        project.path(),
    )
    .unwrap();

    assert!(config.compile.debug);
    assert_eq!(paths(&config), ["contracts/greeting"]);
}

#[test]
fn test_discovery_keeps_search_path_order() {
    let dir = tempdir().unwrap();
    write_contract(dir.path(), "zeta/b-one", "b-one");
    write_interface(dir.path(), "zeta/IBOne.sol");
    write_contract(dir.path(), "alpha/a-one", "a-one");
    write_interface(dir.path(), "alpha/IAOne.sol");

    let settings = DiscoverySettings {
        paths: vec!["zeta".to_string(), "alpha".to_string()],
        ..DiscoverySettings::default()
    };
    let found = discover(dir.path(), &settings).unwrap();
    let found: Vec<&str> = found.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(found, ["zeta/b-one", "alpha/a-one"]);
}

#[test]
fn test_discovery_skips_manifest_without_name() {
    let dir = tempdir().unwrap();
    write_contract(dir.path(), "contracts/good", "good");
    write_interface(dir.path(), "contracts/IGood.sol");

    fs::create_dir_all(dir.path().join("contracts/nameless")).unwrap();
    fs::write(
        dir.path().join("contracts/nameless/Cargo.toml"),
        "[package]\nversion = \"0.1.0\"\n\n[dependencies]\nfluentbase-sdk = \"0.1\"\n",
    )
    .unwrap();

    let found = discover(dir.path(), &DiscoverySettings::default()).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "contracts/good");
}
