use crate::config::FetcherConfig;
use crate::error::{FetchError, Result};
use crate::models::{check_row_keys, PredictionRecord};
use crate::source::PredictionSource;
use anyhow::Context;
use reqwest::Client;
use tracing::{debug, info};

/// HTTP-backed prediction source
pub struct PredictionFetcher {
    config: FetcherConfig,
    client: Client,
    base_url: String,
}

impl PredictionFetcher {
    /// Create a new fetcher instance
    pub fn new(config: FetcherConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();

        Ok(Self { config, client, base_url })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Endpoint for one season's batch
    pub fn predictions_url(&self, season: i32) -> String {
        format!("{}/api/predictions/{}/", self.base_url, season)
    }
}

#[async_trait::async_trait]
impl PredictionSource for PredictionFetcher {
    async fn fetch_predictions(&self, season: i32) -> Result<Vec<PredictionRecord>> {
        if !self.config.contains_season(season) {
            return Err(FetchError::SeasonOutOfRange {
                season,
                min: self.config.min_season,
                max: self.config.max_season,
            });
        }

        let url = self.predictions_url(season);
        info!("Fetching predictions for season {} from: {}", season, url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { season, status });
        }

        let body = response.text().await?;
        let records: Vec<PredictionRecord> = serde_json::from_str(&body)?;

        let duplicates = check_row_keys(&records);
        if duplicates > 0 {
            debug!("Season {} batch has {} duplicate row keys", season, duplicates);
        }

        info!("Successfully fetched {} predictions for season {}", records.len(), season);
        Ok(records)
    }
}
