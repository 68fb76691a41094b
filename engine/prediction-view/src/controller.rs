//! View state for a season prediction table

use crate::criteria::{FilterCriteria, SortCriteria, SortField};
use crate::options::FilterOptions;
use crate::pipeline::project;
use chrono::{DateTime, Utc};
use prediction_fetcher::{FetchError, PredictionRecord, PredictionSource};
use tracing::{debug, error, info};

/// Handle for one issued season request. Sequence numbers grow with every
/// selection; only the newest one may replace the displayed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub season: i32,
}

/// What happened when a fetch result was handed to the controller
#[derive(Debug)]
pub enum FetchOutcome {
    /// Data replaced with the new batch
    Applied { season: i32, count: usize },

    /// The newest request failed; prior data kept
    Failed(FetchError),

    /// A newer request has been issued since; result dropped
    Stale { season: i32 },
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied { .. })
    }
}

/// Single owner of the table's inputs (records, filters, sort) and of the
/// projection derived from them. Every mutation recomputes the projection.
#[derive(Debug)]
pub struct PredictionViewController {
    selected_season: i32,
    loaded_season: Option<i32>,
    loaded_at: Option<DateTime<Utc>>,
    records: Vec<PredictionRecord>,
    filters: FilterCriteria,
    sort: SortCriteria,
    projection: Vec<PredictionRecord>,
    options: FilterOptions,
    issued_seq: u64,
    settled_seq: u64,
}

impl PredictionViewController {
    pub fn new(initial_season: i32) -> Self {
        Self {
            selected_season: initial_season,
            loaded_season: None,
            loaded_at: None,
            records: Vec::new(),
            filters: FilterCriteria::default(),
            sort: SortCriteria::default(),
            projection: Vec::new(),
            options: FilterOptions::default(),
            issued_seq: 0,
            settled_seq: 0,
        }
    }

    /// Record a season selection and issue the ticket its fetch must carry
    pub fn select_season(&mut self, season: i32) -> FetchTicket {
        self.selected_season = season;
        self.issued_seq += 1;
        debug!("Issued fetch #{} for season {}", self.issued_seq, season);
        FetchTicket { seq: self.issued_seq, season }
    }

    /// Hand a completed fetch back to the controller
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<PredictionRecord>, FetchError>,
    ) -> FetchOutcome {
        if ticket.seq != self.issued_seq {
            debug!(
                "Dropping stale fetch #{} for season {} (latest is #{})",
                ticket.seq, ticket.season, self.issued_seq
            );
            return FetchOutcome::Stale { season: ticket.season };
        }
        self.settled_seq = ticket.seq;

        match result {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                self.loaded_season = Some(ticket.season);
                self.loaded_at = Some(Utc::now());
                self.options = FilterOptions::from_records(&self.records);
                self.recompute();
                info!("Loaded {} predictions for season {}", count, ticket.season);
                FetchOutcome::Applied { season: ticket.season, count }
            }
            Err(e) => {
                error!("Failed to fetch predictions for season {}: {}", ticket.season, e);
                FetchOutcome::Failed(e)
            }
        }
    }

    /// Select a season, fetch it from `source` and apply the result
    pub async fn load<S>(&mut self, source: &S, season: i32) -> FetchOutcome
    where
        S: PredictionSource + ?Sized,
    {
        let ticket = self.select_season(season);
        let result = source.fetch_predictions(season).await;
        self.apply_fetch(ticket, result)
    }

    pub fn set_position(&mut self, position: Option<String>) {
        self.filters.set_position(position);
        self.recompute();
    }

    pub fn set_age(&mut self, age: Option<i32>) {
        self.filters.set_age(age);
        self.recompute();
    }

    pub fn set_name_query(&mut self, query: Option<String>) {
        self.filters.set_name(query);
        self.recompute();
    }

    pub fn set_filters(&mut self, filters: FilterCriteria) {
        self.filters = filters;
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterCriteria::default();
        self.recompute();
    }

    /// Column header click
    pub fn sort_by(&mut self, field: SortField) -> SortCriteria {
        self.sort = self.sort.clicked(field);
        self.recompute();
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortCriteria) {
        self.sort = sort;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.projection = project(&self.records, &self.filters, self.sort);
        debug!(
            "Projection: {} of {} rows ({:?}, {:?})",
            self.projection.len(),
            self.records.len(),
            self.filters,
            self.sort
        );
    }

    pub fn projection(&self) -> &[PredictionRecord] {
        &self.projection
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn sort(&self) -> SortCriteria {
        self.sort
    }

    pub fn selected_season(&self) -> i32 {
        self.selected_season
    }

    pub fn loaded_season(&self) -> Option<i32> {
        self.loaded_season
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn has_pending_fetch(&self) -> bool {
        self.issued_seq > self.settled_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::SortDirection;
    use crate::test_support::{players, record};
    use prediction_fetcher::StatusCode;
    use std::collections::HashMap;

    fn batch(season: i32, names: &[&str]) -> Vec<PredictionRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut r = record(name, 24 + i as i32, if i % 2 == 0 { "PG" } else { "C" }, i as f64);
                r.season = season;
                r
            })
            .collect()
    }

    fn server_error(season: i32) -> FetchError {
        FetchError::Status { season, status: StatusCode::INTERNAL_SERVER_ERROR }
    }

    struct StubSource {
        batches: HashMap<i32, Vec<PredictionRecord>>,
    }

    #[async_trait::async_trait]
    impl PredictionSource for StubSource {
        async fn fetch_predictions(
            &self,
            season: i32,
        ) -> prediction_fetcher::Result<Vec<PredictionRecord>> {
            self.batches.get(&season).cloned().ok_or_else(|| server_error(season))
        }
    }

    #[test]
    fn test_initial_state() {
        let view = PredictionViewController::new(2025);
        assert_eq!(view.selected_season(), 2025);
        assert_eq!(view.loaded_season(), None);
        assert!(view.projection().is_empty());
        assert_eq!(view.sort(), SortCriteria::descending(SortField::Pts));
        assert!(!view.has_pending_fetch());
    }

    #[test]
    fn test_apply_replaces_data_and_sorts_by_default() {
        let mut view = PredictionViewController::new(2025);
        let ticket = view.select_season(2025);
        assert!(view.has_pending_fetch());

        let outcome = view.apply_fetch(ticket, Ok(batch(2025, &["A", "B", "C"])));
        assert!(matches!(outcome, FetchOutcome::Applied { season: 2025, count: 3 }));
        assert!(!view.has_pending_fetch());
        assert_eq!(view.loaded_season(), Some(2025));
        assert!(view.loaded_at().is_some());
        assert_eq!(players(view.projection()), ["C", "B", "A"]);
        assert_eq!(view.options().positions, ["PG", "C"]);
    }

    #[test]
    fn test_failed_fetch_keeps_prior_data() {
        let mut view = PredictionViewController::new(2024);
        let first = view.select_season(2024);
        view.apply_fetch(first, Ok(batch(2024, &["A", "B"])));

        let second = view.select_season(2025);
        let outcome = view.apply_fetch(second, Err(server_error(2025)));

        assert!(matches!(outcome, FetchOutcome::Failed(FetchError::Status { season: 2025, .. })));
        assert_eq!(view.loaded_season(), Some(2024));
        assert_eq!(view.selected_season(), 2025);
        assert_eq!(view.records().len(), 2);
        assert_eq!(players(view.projection()), ["B", "A"]);
        assert!(!view.has_pending_fetch());
    }

    #[test]
    fn test_failed_first_fetch_leaves_empty_table() {
        let mut view = PredictionViewController::new(2025);
        let ticket = view.select_season(2025);
        let outcome = view.apply_fetch(ticket, Err(server_error(2025)));
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert!(view.projection().is_empty());
        assert_eq!(view.loaded_season(), None);
    }

    #[test]
    fn test_out_of_order_completion_last_request_wins() {
        let mut view = PredictionViewController::new(2025);
        let older = view.select_season(2024);
        let newer = view.select_season(2025);

        let outcome = view.apply_fetch(newer, Ok(batch(2025, &["New"])));
        assert!(outcome.is_applied());

        let outcome = view.apply_fetch(older, Ok(batch(2024, &["Old"])));
        assert!(matches!(outcome, FetchOutcome::Stale { season: 2024 }));
        assert_eq!(view.loaded_season(), Some(2025));
        assert_eq!(players(view.projection()), ["New"]);
    }

    #[test]
    fn test_superseded_fetch_dropped_even_when_first() {
        let mut view = PredictionViewController::new(2025);
        let older = view.select_season(2024);
        let newer = view.select_season(2025);

        let outcome = view.apply_fetch(older, Ok(batch(2024, &["Old"])));
        assert!(matches!(outcome, FetchOutcome::Stale { .. }));
        assert!(view.projection().is_empty());
        assert!(view.has_pending_fetch());

        let outcome = view.apply_fetch(newer, Err(server_error(2025)));
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert!(!view.has_pending_fetch());
    }

    #[test]
    fn test_criteria_persist_across_seasons() {
        let mut view = PredictionViewController::new(2024);
        view.set_position(Some("C".to_string()));
        view.sort_by(SortField::Player);

        let ticket = view.select_season(2024);
        view.apply_fetch(ticket, Ok(batch(2024, &["A", "B", "C", "D"])));
        assert_eq!(players(view.projection()), ["B", "D"]);

        let ticket = view.select_season(2025);
        view.apply_fetch(ticket, Ok(batch(2025, &["W", "X", "Y", "Z"])));
        assert_eq!(view.filters().position.as_deref(), Some("C"));
        assert_eq!(view.sort(), SortCriteria::ascending(SortField::Player));
        assert_eq!(players(view.projection()), ["X", "Z"]);
    }

    #[test]
    fn test_filter_changes_recompute() {
        let mut view = PredictionViewController::new(2025);
        let ticket = view.select_season(2025);
        view.apply_fetch(ticket, Ok(batch(2025, &["Anna", "Ben", "Hannah"])));

        view.set_name_query(Some("ANN".to_string()));
        assert_eq!(players(view.projection()), ["Hannah", "Anna"]);

        view.set_age(Some(24));
        assert_eq!(players(view.projection()), ["Anna"]);

        view.clear_filters();
        assert_eq!(view.projection().len(), 3);
        // options always reflect the full batch
        assert_eq!(view.options().ages, [24, 25, 26]);
    }

    #[test]
    fn test_whitespace_name_query_filters() {
        let mut view = PredictionViewController::new(2025);
        let ticket = view.select_season(2025);
        view.apply_fetch(ticket, Ok(batch(2025, &["Nene", "A B"])));

        view.set_name_query(Some(" ".to_string()));
        assert_eq!(players(view.projection()), ["A B"]);

        view.set_name_query(Some(String::new()));
        assert_eq!(view.filters().name, None);
        assert_eq!(view.projection().len(), 2);
    }

    #[test]
    fn test_header_clicks_toggle_direction() {
        let mut view = PredictionViewController::new(2025);
        let ticket = view.select_season(2025);
        view.apply_fetch(ticket, Ok(batch(2025, &["A", "B"])));

        // default is PTS descending; first click flips to ascending
        let sort = view.sort_by(SortField::Pts);
        assert_eq!(sort.direction, SortDirection::Ascending);
        assert_eq!(players(view.projection()), ["A", "B"]);

        let sort = view.sort_by(SortField::Pts);
        assert_eq!(sort.direction, SortDirection::Descending);
        assert_eq!(players(view.projection()), ["B", "A"]);
    }

    #[tokio::test]
    async fn test_load_through_source() {
        let source = StubSource { batches: HashMap::from([(2023, batch(2023, &["A", "B"]))]) };
        let mut view = PredictionViewController::new(2023);

        let outcome = view.load(&source, 2023).await;
        assert!(outcome.is_applied());
        assert_eq!(view.records().len(), 2);

        let outcome = view.load(&source, 2022).await;
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(view.loaded_season(), Some(2023));
    }
}
