//! Command implementations.
//!
//! Every command returns the text destined for stdout; logging goes through
//! `tracing` and ends up on stderr.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use fluent_config::artifacts::plan_artifacts;
use fluent_config::discovery::discover;
use fluent_config::resolver::discovery_settings;
use fluent_config::{ArtifactError, ConfigError, ConfigLoader, FluentConfig};
use thiserror::Error;
use tracing::{debug, info};

use crate::cli::{Cli, Command};

/// Configuration files tried under the root when `--config` is absent.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["fluent.toml", "fluent.json"];

/// Environment override prefix.
pub const ENV_PREFIX: &str = "FLUENT";

/// Errors surfaced by commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Loading or resolving the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An interface artifact could not be loaded.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// Output could not be serialized.
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CommandError {
    /// Render for stderr.
    ///
    /// Resolution errors use `error[CODE]: message` with indented details;
    /// everything else is a single `error: ...` line.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Config(ConfigError::Configuration(e)) => e.render(),
            other => format!("error: {other}"),
        }
    }
}

/// Run the selected command and return its stdout output.
///
/// # Errors
///
/// Returns `CommandError` if configuration loading, resolution, ABI loading
/// or output serialization fails.
pub fn run(cli: &Cli) -> Result<String, CommandError> {
    let loader = loader(&cli.root, cli.config.as_deref())?;

    match &cli.command {
        Command::Resolve => {
            let config = loader.load()?;
            Ok(serde_json::to_string_pretty(&config)?)
        }
        Command::Discover => {
            let user = loader.load_user()?;
            let settings = discovery_settings(&user);
            let found = discover(&cli.root, &settings).map_err(ConfigError::from)?;

            let mut out = String::new();
            for contract in &found {
                let _ = writeln!(out, "{} -> {}", contract.path, contract.interface.path);
            }
            Ok(out.trim_end().to_string())
        }
        Command::Check => {
            let config = loader.load()?;
            Ok(summary(&config))
        }
        Command::Artifacts {
            artifacts_dir,
            check_abi,
        } => {
            let config = loader.load()?;
            let artifacts_root = cli.root.join(artifacts_dir);
            let mut plans = plan_artifacts(&config, &cli.root, &artifacts_root);
            if *check_abi {
                for plan in &mut plans {
                    plan.load_abi(&artifacts_root)?;
                }
            }
            Ok(serde_json::to_string_pretty(&plans)?)
        }
    }
}

/// Build the loader for a project: `.env`, config file, environment.
///
/// # Errors
///
/// Returns `ConfigError` if `.env` or the config file cannot be loaded.
pub fn loader(root: &Path, config: Option<&Path>) -> Result<ConfigLoader, ConfigError> {
    let mut loader = ConfigLoader::new().with_root(root).with_dotenv()?;

    match config_file(root, config) {
        Some(path) => {
            info!(path = %path.display(), "Using configuration file");
            loader = loader.with_file(path)?;
        }
        None => debug!(root = %root.display(), "No configuration file, using defaults"),
    }

    Ok(loader.with_env_prefix(ENV_PREFIX))
}

/// The configuration file to load, if any.
///
/// An explicit path is returned as is so a missing file is reported.
pub fn config_file(root: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    DEFAULT_CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// One-line summary of a resolved configuration.
#[must_use]
pub fn summary(config: &FluentConfig) -> String {
    let source = if config.discovery.enabled {
        "discovered"
    } else {
        "declared"
    };
    let noun = if config.contracts.len() == 1 {
        "contract"
    } else {
        "contracts"
    };
    format!("ok: {} {noun} {source}", config.contracts.len())
}
