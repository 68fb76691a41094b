use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// One row of projected per-game performance for a player in a season
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PredictionRecord {
    #[serde(rename = "Player")]
    pub player: String,

    #[serde(rename = "Season")]
    pub season: i32,

    #[serde(rename = "Age")]
    pub age: i32,

    /// Position code as it appears in the data (e.g., "PG", "C", "SF-PF")
    #[serde(rename = "Pos")]
    pub position: String,

    #[serde(rename = "STL")]
    pub steals: f64,

    #[serde(rename = "BLK")]
    pub blocks: f64,

    #[serde(rename = "TRB")]
    pub rebounds: f64,

    #[serde(rename = "AST")]
    pub assists: f64,

    #[serde(rename = "PTS")]
    pub points: f64,
}

impl PredictionRecord {
    /// Table row identity: `(player, season)` is unique within one batch
    pub fn row_key(&self) -> (String, i32) {
        (self.player.clone(), self.season)
    }
}

/// Count records whose row key repeats an earlier one, warning once per repeat.
///
/// Duplicates are an upstream contract violation; they are reported, not removed.
pub fn check_row_keys(records: &[PredictionRecord]) -> usize {
    let mut seen = HashSet::with_capacity(records.len());
    let mut duplicates = 0;

    for record in records {
        if !seen.insert((record.player.as_str(), record.season)) {
            warn!(
                "Duplicate prediction row for {} ({}); keeping both",
                record.player, record.season
            );
            duplicates += 1;
        }
    }

    duplicates
}
