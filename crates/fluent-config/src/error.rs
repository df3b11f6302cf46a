//! Configuration error types.
//!
//! [`ConfigurationError`] carries semantic resolution failures with a stable
//! [`ErrorCode`]. [`SchemaError`] reports shape violations of raw input or of
//! the resolved output. [`ConfigError`] is the loader-level umbrella wrapping
//! both, plus file and environment failures.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error codes for [`ConfigurationError`].
///
/// Downstream tasks branch on these instead of matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No contracts were declared or discovered.
    NoContracts,
    /// Discovery failed outside of per-candidate processing.
    DiscoveryError,
    /// A declared manifest path does not exist.
    InvalidPath,
    /// A declared contract directory has no manifest.
    MissingManifest,
    /// A manifest lacks its package name.
    InvalidManifest,
    /// A manifest could not be read.
    ManifestReadError,
    /// The interface-description file for a contract is missing.
    InterfaceNotFound,
    /// Generic validation failure.
    ValidationError,
    /// Settings layers could not be merged.
    MergeError,
    /// The configuration is contradictory.
    InvalidConfiguration,
    /// Anything else.
    UnknownError,
}

impl ErrorCode {
    /// Returns the stable string form of this code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoContracts => "NO_CONTRACTS",
            Self::DiscoveryError => "DISCOVERY_ERROR",
            Self::InvalidPath => "INVALID_PATH",
            Self::MissingManifest => "MISSING_MANIFEST",
            Self::InvalidManifest => "INVALID_MANIFEST",
            Self::ManifestReadError => "MANIFEST_READ_ERROR",
            Self::InterfaceNotFound => "INTERFACE_NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::MergeError => "MERGE_ERROR",
            Self::InvalidConfiguration => "INVALID_CONFIGURATION",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed configuration error with a stable code and user-facing details.
///
/// # Example
///
/// ```
/// use fluent_config::{ConfigurationError, ErrorCode};
///
/// let err = ConfigurationError::no_contracts("Could not find any valid contracts in the project");
/// assert_eq!(err.code, ErrorCode::NoContracts);
/// assert_eq!(err.to_string(), "No contracts found");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ConfigurationError {
    /// Short summary.
    pub message: String,
    /// One fact per line, meant for end-user display.
    pub details: Vec<String>,
    /// Stable discriminant.
    pub code: ErrorCode,
}

impl ConfigurationError {
    /// Create an error from its parts.
    pub fn new<I, S>(code: ErrorCode, message: impl Into<String>, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            details: details.into_iter().map(Into::into).collect(),
            code,
        }
    }

    /// No contracts were declared or discovered.
    pub fn no_contracts(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoContracts, "No contracts found", [detail])
    }

    /// Discovery failed; `reason` preserves the original message.
    pub fn discovery_error(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::DiscoveryError,
            "Failed to discover contracts",
            [reason],
        )
    }

    /// A declared manifest path does not exist.
    pub fn invalid_path(path: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidPath,
            "Invalid contract path",
            [format!("Path does not exist: {path}")],
        )
    }

    /// A declared contract directory contains no manifest.
    pub fn missing_manifest(dir: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::MissingManifest,
            "Invalid contract path",
            [format!("Cargo.toml not found in directory: {dir}")],
        )
    }

    /// A manifest has no `name = "..."` field.
    pub fn invalid_manifest(manifest: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidManifest,
            "Invalid Cargo.toml",
            [format!("Could not find package name in {manifest}")],
        )
    }

    /// A manifest could not be read.
    pub fn manifest_read_error(manifest: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ManifestReadError,
            "Failed to read Cargo.toml",
            [format!("{manifest}: {reason}")],
        )
    }

    /// The expected interface file is missing.
    pub fn interface_not_found(expected: impl fmt::Display, interface_name: &str) -> Self {
        Self::new(
            ErrorCode::InterfaceNotFound,
            "Interface file not found",
            [
                format!("Expected interface file at: {expected}"),
                format!("Interface should be named: {interface_name}.sol"),
                "Make sure the interface file exists and follows the naming convention"
                    .to_string(),
            ],
        )
    }

    /// The configuration is contradictory.
    pub fn invalid_configuration(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidConfiguration,
            "Invalid configuration",
            [detail],
        )
    }

    /// Whether per-candidate discovery should skip rather than abort.
    #[must_use]
    pub fn is_interface_not_found(&self) -> bool {
        self.code == ErrorCode::InterfaceNotFound
    }

    /// Render for a terminal: `error[CODE]: message` then one indented detail per line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("error[{}]: {}", self.code, self.message);
        for detail in &self.details {
            out.push_str("\n  ");
            out.push_str(detail);
        }
        out
    }
}

/// Shape violations of raw input or resolved output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The input did not deserialize into the expected shape.
    #[error("invalid configuration shape at {path}: {reason}")]
    Deserialize {
        /// Dotted path of the offending value (`.` for the root).
        path: String,
        /// Deserializer message.
        reason: String,
    },

    /// A value has the right type but is unusable.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Dotted field path.
        field: String,
        /// Why it is invalid.
        reason: String,
    },

    /// A value that must be populated is empty.
    #[error("missing required configuration field: {field}")]
    MissingField {
        /// Dotted field path.
        field: String,
    },
}

impl SchemaError {
    /// Create a new invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

/// Errors that can occur while loading and resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Failed to read configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither TOML nor JSON.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Environment variable parsing error.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// The environment variable name.
        var: String,
        /// Explanation of the parsing error.
        reason: String,
    },

    /// A `.env` file exists but could not be loaded.
    #[error("failed to load {path}: {reason}")]
    Dotenv {
        /// Path to the `.env` file.
        path: PathBuf,
        /// Loader error message.
        reason: String,
    },

    /// Shape validation failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Resolution failed.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl ConfigError {
    /// Create a new file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a new environment variable parse error.
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Create a new `.env` loading error.
    pub fn dotenv(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Dotenv {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The resolution error code, if this is a [`ConfigurationError`].
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Configuration(e) => Some(e.code),
            _ => None,
        }
    }
}

/// Errors raised while locating interface artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// No compiled interface artifact at the expected location.
    #[error("ABI file not found at {path}")]
    AbiNotFound {
        /// Expected artifact path.
        path: PathBuf,
    },

    /// The artifact exists but could not be read.
    #[error("failed to read artifact {path}")]
    Read {
        /// Artifact path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The artifact is not valid JSON or lacks an `abi` array.
    #[error("invalid artifact {path}: {reason}")]
    Parse {
        /// Artifact path.
        path: PathBuf,
        /// What was wrong.
        reason: String,
    },
}
