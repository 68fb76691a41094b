//! Interactive session
//!
//! One event loop owns the view controller. Season selections spawn fetch
//! tasks whose results come back over a channel; stdin commands keep being
//! handled while a fetch is in flight.

use anyhow::Result;
use colored::*;
use prediction_fetcher::{FetcherConfig, PredictionRecord, PredictionSource};
use prediction_view::{FetchOutcome, FetchTicket, PredictionViewController, SortCriteria, SortField};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::render::{render_options, render_status, render_table};

type FetchResult = prediction_fetcher::Result<Vec<PredictionRecord>>;

/// A parsed interactive command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Season(i32),
    Position(Option<String>),
    Age(Option<i32>),
    Name(Option<String>),
    Sort(SortField),
    Clear,
    Options,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`. A name query is taken
/// verbatim, so `name  ` filters on a single space.
pub fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    // `raw` keeps everything after the single separator following the verb
    let (verb, raw) = line.split_once(char::is_whitespace).unwrap_or((line.trim_end(), ""));
    let rest = raw.trim();

    let command = match verb.to_ascii_lowercase().as_str() {
        "season" | "s" => {
            let season = rest.parse().map_err(|_| "Usage: season <year>".to_string())?;
            Command::Season(season)
        }
        "pos" | "position" => match rest {
            "" => return Err("Usage: pos <code|all>".to_string()),
            all if all.eq_ignore_ascii_case("all") => Command::Position(None),
            // position codes are matched exactly as they appear in the data
            code => Command::Position(Some(code.to_string())),
        },
        "age" => match rest {
            "" => return Err("Usage: age <n|all>".to_string()),
            all if all.eq_ignore_ascii_case("all") => Command::Age(None),
            n => Command::Age(Some(n.parse().map_err(|_| format!("Invalid age: {n}"))?)),
        },
        "name" | "search" => Command::Name(Some(raw.to_string()).filter(|q| !q.is_empty())),
        "sort" => Command::Sort(rest.parse().map_err(|e| format!("{e}"))?),
        "clear" => Command::Clear,
        "options" | "opts" => Command::Options,
        "show" | "ls" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("Unknown command '{other}'. Type 'help' for available commands.")),
    };

    Ok(Some(command))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Interactive session state: the view plus the means to issue fetches
pub struct Session<S: PredictionSource + 'static> {
    source: Arc<S>,
    fetcher_config: FetcherConfig,
    max_rows: Option<usize>,
    view: PredictionViewController,
    results_tx: mpsc::UnboundedSender<(FetchTicket, FetchResult)>,
}

impl<S: PredictionSource + 'static> Session<S> {
    pub fn new(
        source: Arc<S>,
        fetcher_config: FetcherConfig,
        sort: SortCriteria,
        max_rows: Option<usize>,
        season: i32,
    ) -> (Self, mpsc::UnboundedReceiver<(FetchTicket, FetchResult)>) {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let mut view = PredictionViewController::new(season);
        view.set_sort(sort);

        (Self { source, fetcher_config, max_rows, view, results_tx }, results_rx)
    }

    pub fn view(&self) -> &PredictionViewController {
        &self.view
    }

    /// Issue a ticket for `season` and start fetching it in the background
    pub fn request_season(&mut self, season: i32) -> std::result::Result<FetchTicket, String> {
        if !self.fetcher_config.contains_season(season) {
            return Err(format!(
                "Season must be between {} and {}",
                self.fetcher_config.min_season, self.fetcher_config.max_season
            ));
        }

        let ticket = self.view.select_season(season);
        let source = Arc::clone(&self.source);
        let tx = self.results_tx.clone();

        tokio::spawn(async move {
            let result = source.fetch_predictions(ticket.season).await;
            // receiver gone means the session ended
            let _ = tx.send((ticket, result));
        });

        Ok(ticket)
    }

    pub fn handle_command(&mut self, command: Command) -> Control {
        match command {
            Command::Season(season) => match self.request_season(season) {
                Ok(_) => println!("{}", format!("⏳ Loading season {season}…").yellow()),
                Err(msg) => println!("❌ {msg}"),
            },
            Command::Position(position) => {
                if let Some(code) = &position {
                    if !self.view.options().has_position(code) {
                        println!("{}", format!("⚠️  No players listed at '{code}' this season").yellow());
                    }
                }
                self.view.set_position(position);
                self.show();
            }
            Command::Age(age) => {
                if let Some(n) = age {
                    if !self.view.options().has_age(n) {
                        println!("{}", format!("⚠️  No players aged {n} this season").yellow());
                    }
                }
                self.view.set_age(age);
                self.show();
            }
            Command::Name(query) => {
                self.view.set_name_query(query);
                self.show();
            }
            Command::Sort(field) => {
                self.view.sort_by(field);
                self.show();
            }
            Command::Clear => {
                self.view.clear_filters();
                self.show();
            }
            Command::Options => println!("{}", render_options(self.view.options())),
            Command::Show => self.show(),
            Command::Help => show_help(),
            Command::Quit => return Control::Quit,
        }
        Control::Continue
    }

    pub fn handle_fetch(&mut self, ticket: FetchTicket, result: FetchResult) -> FetchOutcome {
        let outcome = self.view.apply_fetch(ticket, result);
        match &outcome {
            FetchOutcome::Applied { season, count } => {
                let at = self.view.loaded_at().map(|t| t.format(" at %H:%M:%S UTC").to_string());
                println!(
                    "{}",
                    format!("✅ Loaded {count} predictions for {season}{}", at.unwrap_or_default()).green()
                );
                self.show();
            }
            FetchOutcome::Failed(e) => {
                println!("{}", format!("❌ Could not load season {}: {e}", ticket.season).red());
                println!("{}", "   Keeping the previously displayed data.".dimmed());
            }
            FetchOutcome::Stale { season } => {
                debug!("Ignored superseded result for season {}", season);
            }
        }
        outcome
    }

    fn show(&self) {
        println!("{}", render_table(self.view.projection(), self.view.sort(), self.max_rows));
        println!("{}", render_status(&self.view).cyan());
    }

    fn prompt(&self) {
        print!("{}> ", format!("predictions[{}]", self.view.selected_season()).cyan().bold());
        let _ = std::io::stdout().flush();
    }
}

/// Run the interactive loop until `quit` or end of input
pub async fn run<S: PredictionSource + 'static>(
    source: Arc<S>,
    fetcher_config: FetcherConfig,
    sort: SortCriteria,
    max_rows: Option<usize>,
    season: i32,
) -> Result<()> {
    show_welcome();

    let (mut session, mut results_rx) = Session::new(source, fetcher_config, sort, max_rows, season);
    if let Err(msg) = session.request_season(season) {
        anyhow::bail!(msg);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    session.prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(Some(command)) => {
                        if session.handle_command(command) == Control::Quit {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(msg) => println!("❌ {msg}"),
                }
                session.prompt();
            }
            Some((ticket, result)) = results_rx.recv() => {
                if !matches!(session.handle_fetch(ticket, result), FetchOutcome::Stale { .. }) {
                    session.prompt();
                }
            }
        }
    }

    println!("👋 Goodbye!");
    Ok(())
}

fn show_welcome() {
    println!();
    println!("{}", "╔══════════════════════════════════════════════════════════════╗".cyan());
    println!("{}", "║                  🏀 PLAYER PREDICTION BROWSER                ║".cyan());
    println!("{}", "╚══════════════════════════════════════════════════════════════╝".cyan());
    println!("{}", "Type 'help' for available commands.".yellow());
    println!();
}

fn show_help() {
    println!();
    println!("{}", "Commands:".bold());
    println!("  season <year>     Load another season");
    println!("  pos <code|all>    Filter by position");
    println!("  age <n|all>       Filter by age");
    println!("  name [text]       Filter by player name (no text clears)");
    println!("  sort <column>     Sort by column; repeat to flip direction");
    println!("                    Columns: Player Season Age Pos STL BLK TRB AST PTS");
    println!("  clear             Remove all filters");
    println!("  options           List positions and ages in this season");
    println!("  show              Print the table again");
    println!("  quit              Exit");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use prediction_fetcher::{FetchError, StatusCode};
    use prediction_view::SortDirection;
    use std::time::Duration;

    fn record(player: &str, season: i32, points: f64) -> PredictionRecord {
        PredictionRecord {
            player: player.to_string(),
            season,
            age: 27,
            position: "SF".to_string(),
            steals: 1.0,
            blocks: 0.4,
            rebounds: 5.0,
            assists: 3.0,
            points,
        }
    }

    /// Serves seasons >= 2020; older seasons are slow so they finish last
    struct StubSource;

    #[async_trait::async_trait]
    impl PredictionSource for StubSource {
        async fn fetch_predictions(&self, season: i32) -> prediction_fetcher::Result<Vec<PredictionRecord>> {
            if season == 2016 {
                return Err(FetchError::Status { season, status: StatusCode::INTERNAL_SERVER_ERROR });
            }
            if season < 2020 {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok(vec![record(&format!("P{season}"), season, 10.0)])
        }
    }

    fn session() -> (Session<StubSource>, mpsc::UnboundedReceiver<(FetchTicket, FetchResult)>) {
        Session::new(Arc::new(StubSource), FetcherConfig::default(), SortCriteria::default(), Some(10), 2025)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  "), Ok(None));
        assert_eq!(parse_command("season 2021"), Ok(Some(Command::Season(2021))));
        assert_eq!(parse_command("pos PG"), Ok(Some(Command::Position(Some("PG".into())))));
        assert_eq!(parse_command("pos all"), Ok(Some(Command::Position(None))));
        assert_eq!(parse_command("age 24"), Ok(Some(Command::Age(Some(24)))));
        assert_eq!(parse_command("AGE All"), Ok(Some(Command::Age(None))));
        assert_eq!(parse_command("name de'aaron fox"), Ok(Some(Command::Name(Some("de'aaron fox".into())))));
        assert_eq!(parse_command("name"), Ok(Some(Command::Name(None))));
        assert_eq!(parse_command("name "), Ok(Some(Command::Name(None))));
        assert_eq!(parse_command("  season 2021 \r\n"), Ok(Some(Command::Season(2021))));
        assert_eq!(parse_command("sort trb"), Ok(Some(Command::Sort(SortField::Trb))));
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn test_name_query_keeps_inner_whitespace() {
        assert_eq!(parse_command("name  "), Ok(Some(Command::Name(Some(" ".into())))));
        assert_eq!(parse_command("name jr. "), Ok(Some(Command::Name(Some("jr. ".into())))));
        assert_eq!(parse_command("search Dončić"), Ok(Some(Command::Name(Some("Dončić".into())))));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("season twenty").is_err());
        assert!(parse_command("age old").is_err());
        assert!(parse_command("pos").is_err());
        assert!(parse_command("sort team").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[tokio::test]
    async fn test_out_of_range_season_not_requested() {
        let (mut session, _rx) = session();
        assert!(session.request_season(2030).is_err());
        assert_eq!(session.view().selected_season(), 2025);
        assert!(!session.view().has_pending_fetch());
    }

    #[tokio::test]
    async fn test_slow_older_request_does_not_overwrite_newer() {
        let (mut session, mut rx) = session();
        session.request_season(2018).unwrap();
        session.request_season(2024).unwrap();

        let (ticket, result) = rx.recv().await.unwrap();
        assert_eq!(ticket.season, 2024);
        assert!(session.handle_fetch(ticket, result).is_applied());

        let (ticket, result) = rx.recv().await.unwrap();
        assert_eq!(ticket.season, 2018);
        assert!(matches!(session.handle_fetch(ticket, result), FetchOutcome::Stale { season: 2018 }));

        assert_eq!(session.view().loaded_season(), Some(2024));
        assert_eq!(session.view().projection()[0].player, "P2024");
    }

    #[tokio::test]
    async fn test_failed_season_keeps_table() {
        let (mut session, mut rx) = session();
        session.request_season(2025).unwrap();
        let (ticket, result) = rx.recv().await.unwrap();
        session.handle_fetch(ticket, result);

        session.request_season(2016).unwrap();
        let (ticket, result) = rx.recv().await.unwrap();
        assert!(matches!(session.handle_fetch(ticket, result), FetchOutcome::Failed(_)));
        assert_eq!(session.view().loaded_season(), Some(2025));
        assert_eq!(session.view().projection().len(), 1);
    }

    #[tokio::test]
    async fn test_commands_drive_view() {
        let (mut session, mut rx) = session();
        session.request_season(2025).unwrap();
        let (ticket, result) = rx.recv().await.unwrap();
        session.handle_fetch(ticket, result);

        assert_eq!(session.handle_command(Command::Position(Some("C".into()))), Control::Continue);
        assert!(session.view().projection().is_empty());

        session.handle_command(Command::Clear);
        assert_eq!(session.view().projection().len(), 1);

        session.handle_command(Command::Sort(SortField::Player));
        session.handle_command(Command::Sort(SortField::Player));
        assert_eq!(session.view().sort(), SortCriteria::new(SortField::Player, SortDirection::Descending));

        assert_eq!(session.handle_command(Command::Quit), Control::Quit);
    }
}
