use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Configuration for the prediction fetcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Predictions API root (scheme + host + optional path prefix)
    pub base_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Earliest season the API serves
    pub min_season: i32,

    /// Latest season the API serves
    pub max_season: i32,

    /// Season loaded when none is given
    pub default_season: i32,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 30,
            min_season: 2015,
            max_season: 2026,
            default_season: 2025,
        }
    }
}

impl FetcherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup on top of the defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("PREDICTIONS_API_URL") {
            config.base_url = url;
        }

        if let Some(timeout) = lookup("PREDICTIONS_TIMEOUT_SECS") {
            config.request_timeout_secs = timeout
                .parse()
                .with_context(|| format!("Invalid PREDICTIONS_TIMEOUT_SECS: {timeout}"))?;
        }

        if let Some(season) = lookup("PREDICTIONS_DEFAULT_SEASON") {
            config.default_season = season
                .parse()
                .with_context(|| format!("Invalid PREDICTIONS_DEFAULT_SEASON: {season}"))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            anyhow::bail!("Predictions API URL must not be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("Predictions API URL must be http(s): {}", self.base_url);
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("Request timeout must be greater than zero");
        }

        if self.min_season > self.max_season {
            anyhow::bail!(
                "Invalid season range: {} is after {}",
                self.min_season,
                self.max_season
            );
        }

        if !self.contains_season(self.default_season) {
            anyhow::bail!(
                "Default season {} is outside {}..={}",
                self.default_season,
                self.min_season,
                self.max_season
            );
        }

        Ok(())
    }

    pub fn season_range(&self) -> RangeInclusive<i32> {
        self.min_season..=self.max_season
    }

    pub fn contains_season(&self, season: i32) -> bool {
        self.season_range().contains(&season)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
