//! Browser configuration management
//!
//! Layers, lowest to highest precedence: built-in defaults (with the fetcher's
//! `PREDICTIONS_*` variables applied), an optional TOML file, then
//! `PREDICTIONS__SECTION__KEY` environment variables. CLI flags are applied by
//! the caller on top of the result.

use anyhow::{Context, Result};
use prediction_fetcher::FetcherConfig;
use prediction_view::SortCriteria;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::logging::{LOG_FORMATS, LOG_LEVELS};

/// Main browser configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Predictions API client configuration
    pub fetcher: FetcherConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Initial view settings
    pub view: ViewConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (compact, pretty, json)
    pub format: String,
}

/// Initial view settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Sort applied before the first header click
    pub sort: SortCriteria,

    /// Maximum rows printed per table (None prints everything)
    pub max_rows: Option<usize>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: "compact".to_string() }
    }
}

/// Load configuration from defaults, an optional file and the environment
pub fn load_config(config_file: Option<&Path>) -> Result<BrowserConfig> {
    let defaults = BrowserConfig {
        fetcher: FetcherConfig::from_env()?,
        ..Default::default()
    };

    let mut builder = config::Config::builder()
        .add_source(config::Config::try_from(&defaults).context("Failed to encode defaults")?);

    if let Some(path) = config_file {
        tracing::debug!("Loading configuration from file: {:?}", path);
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let config: BrowserConfig = builder
        .add_source(
            config::Environment::with_prefix("PREDICTIONS")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to load configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration
pub fn validate_config(config: &BrowserConfig) -> Result<()> {
    config.fetcher.validate()?;

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level));
    }

    if !LOG_FORMATS.contains(&config.logging.format.as_str()) {
        return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format));
    }

    if config.view.max_rows == Some(0) {
        return Err(anyhow::anyhow!("view.max_rows must be at least 1 when set"));
    }

    Ok(())
}
