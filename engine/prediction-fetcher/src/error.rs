//! Error types for the prediction fetcher

use thiserror::Error;

/// Result type for prediction fetches
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors that can occur while fetching a season's predictions
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Predictions request for season {season} failed with status: {status}")]
    Status { season: i32, status: reqwest::StatusCode },

    #[error("Failed to parse predictions JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to fetch predictions: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Season {season} is outside the supported range {min}..={max}")]
    SeasonOutOfRange { season: i32, min: i32, max: i32 },
}

impl FetchError {
    /// HTTP status of the failed response, if the server answered at all
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status(),
            _ => None,
        }
    }
}
