//! Prediction source abstraction

use crate::error::Result;
use crate::models::PredictionRecord;

/// Anything that can produce the full, unfiltered prediction list for a season
#[async_trait::async_trait]
pub trait PredictionSource: Send + Sync {
    /// Fetch every prediction for `season`; one call is one round-trip
    async fn fetch_predictions(&self, season: i32) -> Result<Vec<PredictionRecord>>;
}
