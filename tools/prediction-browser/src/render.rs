//! Table and status rendering

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use prediction_fetcher::PredictionRecord;
use prediction_view::{FilterCriteria, FilterOptions, PredictionViewController, SortCriteria, SortField};

/// Render rows as a table with the fixed column order. The active sort
/// column's header carries the direction arrow.
pub fn render_table(rows: &[PredictionRecord], sort: SortCriteria, max_rows: Option<usize>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(SortField::ALL.iter().map(|&field| {
        let label = if field == sort.field {
            format!("{} {}", field.label(), sort.direction.arrow())
        } else {
            field.label().to_string()
        };
        Cell::new(label).add_attribute(Attribute::Bold)
    }));

    let shown = max_rows.unwrap_or(rows.len()).min(rows.len());
    for record in &rows[..shown] {
        table.add_row(vec![
            Cell::new(&record.player),
            Cell::new(record.season),
            Cell::new(record.age).set_alignment(CellAlignment::Right),
            Cell::new(&record.position),
            stat_cell(record.steals),
            stat_cell(record.blocks),
            stat_cell(record.rebounds),
            stat_cell(record.assists),
            stat_cell(record.points),
        ]);
    }

    let mut out = table.to_string();
    if shown < rows.len() {
        out.push_str(&format!("\n… {} more rows", rows.len() - shown));
    }
    out
}

fn stat_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.1}")).set_alignment(CellAlignment::Right)
}

/// Human summary of active filters
pub fn describe_filters(filters: &FilterCriteria) -> String {
    let mut parts = Vec::new();
    if let Some(position) = &filters.position {
        parts.push(format!("pos={position}"));
    }
    if let Some(age) = filters.age {
        parts.push(format!("age={age}"));
    }
    if let Some(name) = &filters.name {
        parts.push(format!("name~\"{name}\""));
    }

    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

/// One-line summary of the view: season, row counts, sort, filters
pub fn render_status(view: &PredictionViewController) -> String {
    let season = match view.loaded_season() {
        Some(loaded) if loaded == view.selected_season() => format!("Season {loaded}"),
        Some(loaded) => format!("Season {loaded} (selected {})", view.selected_season()),
        None => format!("Season {} (not loaded)", view.selected_season()),
    };

    let pending = if view.has_pending_fetch() { " | loading…" } else { "" };
    let sort = view.sort();

    format!(
        "{season} | {} of {} players | sort: {} {} | filters: {}{pending}",
        view.projection().len(),
        view.records().len(),
        sort.field.label(),
        sort.direction.arrow(),
        describe_filters(view.filters()),
    )
}

pub fn render_options(options: &FilterOptions) -> String {
    let positions = if options.positions.is_empty() {
        "(none)".to_string()
    } else {
        options.positions.join(", ")
    };
    let ages = if options.ages.is_empty() {
        "(none)".to_string()
    } else {
        options.ages.iter().map(i32::to_string).collect::<Vec<_>>().join(", ")
    };

    format!("Positions: all, {positions}\nAges: all, {ages}")
}
