//! Structured logging for Fluent tooling.
//!
//! Wraps the tracing-subscriber setup: an [`EnvFilter`] built from the
//! configured level (or `RUST_LOG` when set) plus a single fmt layer, either
//! pretty or JSON.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "fluent_config=debug").
    pub level: String,

    /// Whether to output JSON lines.
    pub json_format: bool,

    /// Whether `RUST_LOG` takes precedence over `level`.
    pub respect_env: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Whether to emit ANSI colors.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "warn".to_string(),
            json_format: false,
            respect_env: true,
            file_line_info: false,
            include_target: false,
            ansi: true,
        }
    }
}

impl LogConfig {
    /// Verbose human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            file_line_info: true,
            include_target: true,
            ..Self::default()
        }
    }

    /// JSON lines for machine consumption, e.g. in CI.
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            include_target: true,
            ansi: false,
            ..Self::default()
        }
    }

    /// Override the filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Build the filter this configuration would install.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::InvalidFilter` if `level` does not parse.
    pub fn filter(&self) -> TelemetryResult<EnvFilter> {
        if self.respect_env {
            if let Ok(filter) = EnvFilter::try_from_default_env() {
                return Ok(filter);
            }
        }
        create_env_filter(&self.level)
    }
}

/// Initializes the logging subsystem.
///
/// Output goes to stderr.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` for a bad level and
/// `TelemetryError::LoggingInit` if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = config.filter()?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_ansi(config.ansi)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if the directive is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter(e.to_string()))
}
