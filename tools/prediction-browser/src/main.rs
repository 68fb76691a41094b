//! Player Prediction Browser
//!
//! Terminal front-end for per-season player stat predictions:
//! - show: fetch a season once and print the filtered, sorted table
//! - options: list the positions and ages available in a season
//! - interactive: keep a session open and refine filters/sort live

mod config;
mod interactive;
mod logging;
mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use prediction_fetcher::PredictionFetcher;
use prediction_view::{
    FetchOutcome, FilterCriteria, PredictionViewController, SortCriteria, SortDirection, SortField,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::{load_config, validate_config, BrowserConfig};
use crate::render::{render_options, render_status, render_table};

#[derive(Parser)]
#[command(name = "prediction-browser")]
#[command(about = "Browse per-player season stat predictions")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Predictions API root, e.g. http://127.0.0.1:8000
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (compact, pretty, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a season and print the filtered, sorted table
    Show(ShowArgs),

    /// List distinct positions and ages for a season
    Options {
        /// Season year
        #[arg(short, long)]
        season: Option<i32>,
    },

    /// Interactive session with live filtering and sorting
    Interactive {
        /// Season to load first
        #[arg(short, long)]
        season: Option<i32>,
    },
}

#[derive(Args)]
struct ShowArgs {
    /// Season year
    #[arg(short, long)]
    season: Option<i32>,

    /// Exact position code (e.g. PG, C)
    #[arg(short, long)]
    pos: Option<String>,

    /// Exact age
    #[arg(short, long)]
    age: Option<i32>,

    /// Case-insensitive player name substring
    #[arg(short, long)]
    name: Option<String>,

    /// Column to sort by (Player, Season, Age, Pos, STL, BLK, TRB, AST, PTS)
    #[arg(long)]
    sort: Option<SortField>,

    /// Sort descending
    #[arg(long, conflicts_with = "asc")]
    desc: bool,

    /// Sort ascending
    #[arg(long)]
    asc: bool,

    /// Maximum rows to print (at least 1)
    #[arg(short, long, value_parser = parse_row_limit)]
    limit: Option<usize>,

    /// Print the rows as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl ShowArgs {
    fn filters(&self) -> FilterCriteria {
        let mut filters = FilterCriteria::default();
        filters.set_position(self.pos.clone());
        filters.set_age(self.age);
        filters.set_name(self.name.clone());
        filters
    }

    /// A named column sorts ascending unless `--desc` is given, like a fresh
    /// header click; without one the configured sort is used.
    fn sort(&self, configured: SortCriteria) -> SortCriteria {
        let mut sort = match self.sort {
            Some(field) => SortCriteria::ascending(field),
            None => configured,
        };
        if self.desc {
            sort.direction = SortDirection::Descending;
        } else if self.asc {
            sort.direction = SortDirection::Ascending;
        }
        sort
    }
}

/// Row limits follow the same rule as `view.max_rows` in configuration
fn parse_row_limit(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::initialize_logging_with_config(&config.logging.level, &config.logging.format)?;
    info!("Using predictions API at {}", config.fetcher.base_url);

    let fetcher = Arc::new(PredictionFetcher::new(config.fetcher.clone())?);
    let default_season = config.fetcher.default_season;

    match cli.command {
        Commands::Show(args) => {
            let season = args.season.unwrap_or(default_season);
            run_show(&fetcher, &config, season, &args).await
        }
        Commands::Options { season } => run_options(&fetcher, season.unwrap_or(default_season)).await,
        Commands::Interactive { season } => {
            interactive::run(
                fetcher,
                config.fetcher.clone(),
                config.view.sort,
                config.view.max_rows,
                season.unwrap_or(default_season),
            )
            .await
        }
    }
}

/// Configuration from file/env with global CLI flags applied on top
fn resolve_config(cli: &Cli) -> Result<BrowserConfig> {
    let mut config = load_config(cli.config.as_deref())?;

    if let Some(url) = &cli.api_url {
        config.fetcher.base_url = url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }

    validate_config(&config)?;
    Ok(config)
}

async fn load_season(fetcher: &PredictionFetcher, view: &mut PredictionViewController, season: i32) -> Result<()> {
    match view.load(fetcher, season).await {
        FetchOutcome::Applied { .. } => Ok(()),
        FetchOutcome::Failed(e) => {
            Err(e).with_context(|| format!("Could not load predictions for season {season}"))
        }
        FetchOutcome::Stale { .. } => anyhow::bail!("Request for season {season} was superseded"),
    }
}

async fn run_show(
    fetcher: &PredictionFetcher,
    config: &BrowserConfig,
    season: i32,
    args: &ShowArgs,
) -> Result<()> {
    let mut view = PredictionViewController::new(season);
    view.set_filters(args.filters());
    view.set_sort(args.sort(config.view.sort));

    load_season(fetcher, &mut view, season).await?;

    if args.json {
        let limit = args.limit.unwrap_or(usize::MAX);
        let rows: Vec<_> = view.projection().iter().take(limit).collect();
        println!("{}", serde_json::to_string_pretty(&rows).context("Failed to encode rows")?);
        return Ok(());
    }

    println!(
        "{}",
        format!("📊 Expected player performance for the {season} season").cyan().bold()
    );
    println!("{}", render_table(view.projection(), view.sort(), args.limit.or(config.view.max_rows)));
    println!("{}", render_status(&view).dimmed());
    Ok(())
}

async fn run_options(fetcher: &PredictionFetcher, season: i32) -> Result<()> {
    let mut view = PredictionViewController::new(season);
    load_season(fetcher, &mut view, season).await?;

    println!("{}", format!("📋 Filter options for {season}").cyan().bold());
    println!("{}", render_options(view.options()));
    Ok(())
}
