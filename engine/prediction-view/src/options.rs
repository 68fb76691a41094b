//! Selector options derived from the full (unfiltered) season data

use prediction_fetcher::PredictionRecord;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Distinct position codes, in order of first appearance
    pub positions: Vec<String>,

    /// Distinct ages, ascending
    pub ages: Vec<i32>,
}

impl FilterOptions {
    pub fn from_records(records: &[PredictionRecord]) -> Self {
        let mut seen = HashSet::new();
        let positions = records
            .iter()
            .filter(|r| seen.insert(r.position.as_str()))
            .map(|r| r.position.clone())
            .collect();

        let ages = records.iter().map(|r| r.age).collect::<BTreeSet<_>>().into_iter().collect();

        Self { positions, ages }
    }

    pub fn has_position(&self, position: &str) -> bool {
        self.positions.iter().any(|p| p == position)
    }

    pub fn has_age(&self, age: i32) -> bool {
        self.ages.binary_search(&age).is_ok()
    }
}
