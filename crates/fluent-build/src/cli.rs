//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fluent_telemetry::LogConfig;

/// Resolve Fluent build configuration and discover contracts.
#[derive(Parser, Debug)]
#[command(name = "fluent-build")]
#[command(version)]
#[command(about = "Resolve Fluent build configuration and discover contracts")]
pub struct Cli {
    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (TOML or JSON); defaults to fluent.toml or fluent.json under the root
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the resolved configuration as JSON
    Resolve,

    /// Run discovery only and list contracts
    Discover,

    /// Resolve and print a one-line summary
    Check,

    /// Print the artifact layout of every contract as JSON
    Artifacts {
        /// Artifacts directory, relative to the root unless absolute
        #[arg(long, default_value = "artifacts")]
        artifacts_dir: PathBuf,

        /// Load each interface ABI and fail if one is missing
        #[arg(long)]
        check_abi: bool,
    },
}

impl Cli {
    /// Logging setup for these flags.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let config = if self.json_logs {
            LogConfig::production()
        } else {
            LogConfig::default()
        };

        if self.verbose {
            config.with_level("debug")
        } else {
            config
        }
    }
}
