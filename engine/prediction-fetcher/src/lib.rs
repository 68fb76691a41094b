//! Prediction Fetcher
//!
//! Client for the predictions API. Each season's batch is a precomputed list of
//! per-player stat projections served at `/api/predictions/{season}/`.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod source;

pub use config::FetcherConfig;
pub use error::{FetchError, Result};
pub use fetcher::PredictionFetcher;
pub use models::*;
pub use reqwest::StatusCode;
pub use source::PredictionSource;
