//! Prediction View
//!
//! Owns the state behind a season prediction table and derives what is shown
//! from it.
//!
//! ## Architecture
//!
//! - **criteria**: filter and sort selections held by the user
//! - **pipeline**: `project`, the pure filter-then-sort derivation
//! - **options**: distinct positions/ages used to populate selectors
//! - **controller**: `PredictionViewController`, the single owner of view state,
//!   including last-request-wins handling of season fetches

pub mod controller;
pub mod criteria;
pub mod options;
pub mod pipeline;

pub use controller::{FetchOutcome, FetchTicket, PredictionViewController};
pub use criteria::{FilterCriteria, ParseSortFieldError, SortCriteria, SortDirection, SortField};
pub use options::FilterOptions;
pub use pipeline::{compare_text, project};
