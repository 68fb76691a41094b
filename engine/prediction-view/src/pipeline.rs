//! Filter/sort projection over a season's predictions

use crate::criteria::{FilterCriteria, SortCriteria, SortDirection, SortField};
use feruca::{Collator, Locale, Tailoring};
use prediction_fetcher::PredictionRecord;
use std::cmp::Ordering;

/// Derive the displayed rows: position, age and name filters in that order,
/// then a stable sort on the selected column.
pub fn project(
    records: &[PredictionRecord],
    filters: &FilterCriteria,
    sort: SortCriteria,
) -> Vec<PredictionRecord> {
    let query = filters.name.as_deref().map(str::to_lowercase);

    let mut rows: Vec<PredictionRecord> = records
        .iter()
        .filter(|r| filters.position.as_deref().map_or(true, |p| r.position == p))
        .filter(|r| filters.age.map_or(true, |a| r.age == a))
        .filter(|r| {
            query.as_deref().map_or(true, |q| q.is_empty() || r.player.to_lowercase().contains(q))
        })
        .cloned()
        .collect();

    let mut collator = text_collator();

    // sort_by is stable; reversing the comparator keeps ties in input order
    rows.sort_by(|a, b| {
        let ord = compare_field(&mut collator, a, b, sort.field);
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    rows
}

fn compare_field(
    collator: &mut Collator,
    a: &PredictionRecord,
    b: &PredictionRecord,
    field: SortField,
) -> Ordering {
    match field {
        SortField::Player => collate(collator, &a.player, &b.player),
        SortField::Pos => collate(collator, &a.position, &b.position),
        SortField::Season => a.season.cmp(&b.season),
        SortField::Age => a.age.cmp(&b.age),
        SortField::Stl => a.steals.total_cmp(&b.steals),
        SortField::Blk => a.blocks.total_cmp(&b.blocks),
        SortField::Trb => a.rebounds.total_cmp(&b.rebounds),
        SortField::Ast => a.assists.total_cmp(&b.assists),
        SortField::Pts => a.points.total_cmp(&b.points),
    }
}

/// Dictionary-style text ordering using the Unicode collation algorithm with
/// root-locale tailoring. Base letters decide first, then accents, then case
/// (lowercase before uppercase).
pub fn compare_text(a: &str, b: &str) -> Ordering {
    collate(&mut text_collator(), a, b)
}

// Non-ignorable punctuation and spaces, as browser collation does by default
fn text_collator() -> Collator {
    Collator::new(Tailoring::Cldr(Locale::Root), false, false)
}

fn collate(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    // canonically equivalent spellings collate equal; keep the order total
    collator.collate(a, b).then_with(|| b.cmp(a))
}
