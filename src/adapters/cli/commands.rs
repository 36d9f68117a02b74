//! CLI Command Handlers
//!
//! Implementation of all CLI commands for meme-radar.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::adapters::fourmeme::FourMemeClient;
use crate::adapters::terminal::{install_panic_hook, InputReader, TerminalDisplay};
use crate::application::{Dashboard, RefreshLoop, ViewState};
use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::domain::{FilterMode, Locale, SortMode};
use crate::render::table::TableRenderer;

/// meme-radar - live new-token watcher for four.meme
#[derive(Parser, Debug)]
#[command(
    name = "meme-radar",
    version = env!("CARGO_PKG_VERSION"),
    about = "Live new-token watcher for four.meme",
    long_about = "meme-radar polls the four.meme listing API, highlights tokens it has \
                  never seen before and keeps a log of every new listing."
)]
pub struct CliApp {
    /// The command to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

impl CliApp {
    /// The requested command, `run` with defaults when none was given
    pub fn resolved_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Run(RunCmd::default()))
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the live dashboard
    Run(RunCmd),

    /// Run a single refresh cycle and print the table
    Snapshot(SnapshotCmd),

    /// Forget every seen token so the next run starts a fresh baseline
    ResetSeen(ResetSeenCmd),
}

impl Command {
    pub fn options(&self) -> &QueryArgs {
        match self {
            Command::Run(cmd) => &cmd.query,
            Command::Snapshot(cmd) => &cmd.query,
            Command::ResetSeen(cmd) => &cmd.query,
        }
    }

    /// True when the command takes over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self, Command::Run(_))
    }
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override the refresh interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Label language (zh, en)
    #[arg(long, value_name = "LOCALE")]
    pub locale: Option<Locale>,

    /// Initial sort (Hot, TimeDesc, OrderDesc, ProgressDesc)
    #[arg(long, value_name = "SORT")]
    pub sort: Option<SortMode>,

    /// Initial filter (all, chinese, bsc)
    #[arg(long, value_name = "FILTER")]
    pub filter: Option<FilterMode>,
}

impl Default for QueryArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            interval_ms: None,
            locale: None,
            sort: None,
            filter: None,
        }
    }
}

impl QueryArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_to(&self, config: &mut Config) -> Result<()> {
        if let Some(ms) = self.interval_ms {
            config.refresh.interval_ms = ms;
        }
        if let Some(locale) = self.locale {
            config.display.locale = locale;
        }
        if let Some(sort) = self.sort {
            config.display.default_sort = sort;
        }
        if let Some(filter) = self.filter {
            config.display.default_filter = filter;
        }
        config.validate().context("Invalid command-line override")?;
        Ok(())
    }
}

/// Start the live dashboard
#[derive(Parser, Debug, Clone, Default)]
pub struct RunCmd {
    #[command(flatten)]
    pub query: QueryArgs,
}

/// Single refresh cycle
#[derive(Parser, Debug, Clone, Default)]
pub struct SnapshotCmd {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Print the listings as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Clear durable state
#[derive(Parser, Debug, Clone, Default)]
pub struct ResetSeenCmd {
    #[command(flatten)]
    pub query: QueryArgs,
}

/// Execute the CLI command
pub async fn execute(command: Command, config: Config) -> Result<()> {
    match command {
        Command::Run(_) => run_command(config).await,
        Command::Snapshot(cmd) => snapshot_command(cmd, config).await,
        Command::ResetSeen(_) => reset_seen_command(config),
    }
}

fn build_refresh_loop(config: &Config) -> Result<RefreshLoop> {
    let client = FourMemeClient::with_config(config.api_client_config())
        .context("Failed to create four.meme client")?;
    Ok(RefreshLoop::new(
        Arc::new(client),
        config.storage.store(),
        config.refresh_config(),
        config.display.default_sort,
        config.display.default_filter,
    ))
}

fn build_renderer(config: &Config) -> TableRenderer {
    TableRenderer::new(config.display.locale, config.display.trade_url_template.clone())
}

/// Handle run command
async fn run_command(config: Config) -> Result<()> {
    tracing::info!("Starting meme-radar...");
    tracing::info!(
        "Endpoint: {} | interval: {}ms | page size: {}",
        config.api.base_url,
        config.refresh.interval_ms,
        config.api.page_size
    );

    let refresh = build_refresh_loop(&config)?;
    refresh.begin_session().await;

    let renderer = build_renderer(&config);
    let view = ViewState::new(config.display.default_sort, config.display.default_filter);

    install_panic_hook();
    let display = TerminalDisplay::enter(renderer.labels().title)
        .context("Failed to initialise terminal")?;

    let (tx, rx) = mpsc::channel(32);
    let mut input = InputReader::spawn(tx);

    let dashboard = Dashboard::new(refresh, renderer, display, view, config.frame_interval());
    let result = dashboard.run(rx).await;
    input.stop();

    let mut display = result.context("Dashboard failed")?;
    display.leave().context("Failed to restore terminal")?;

    tracing::info!("meme-radar stopped");
    Ok(())
}

/// Handle snapshot command
async fn snapshot_command(cmd: SnapshotCmd, config: Config) -> Result<()> {
    let refresh = build_refresh_loop(&config)?;
    let report = refresh.run_cycle().await.context("Refresh failed")?;
    let snapshot = refresh.snapshot().await;

    tracing::info!(
        "Fetched {} listings, {} shown, {} new ({:?})",
        report.fetched,
        report.displayed,
        report.new_tokens,
        report.phase
    );

    if cmd.json {
        let json = serde_json::to_string_pretty(&snapshot.tokens)
            .context("Failed to serialize listings")?;
        println!("{}", json);
        return Ok(());
    }

    let renderer = build_renderer(&config);
    let now = Utc::now().timestamp_millis();
    println!("{}", renderer.labels().title);
    for line in renderer.table_lines(&snapshot.tokens, now) {
        println!("{}", line.text());
    }
    if !snapshot.event_log.is_empty() {
        println!();
        for line in renderer.event_log_lines(&snapshot.event_log) {
            println!("{}", line.text());
        }
    }
    Ok(())
}

/// Handle reset-seen command
fn reset_seen_command(config: Config) -> Result<()> {
    let store = config.storage.store();
    store
        .clear_seen_set()
        .with_context(|| format!("Failed to clear {}", store.seen_path().display()))?;
    store
        .clear_event_log()
        .with_context(|| format!("Failed to clear {}", store.log_path().display()))?;

    println!("✓ Seen tokens cleared: {}", store.seen_path().display());
    println!("✓ Event log cleared: {}", store.log_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_run() {
        let app = CliApp::try_parse_from(["meme-radar"]).unwrap();
        assert!(app.command.is_none());

        match app.resolved_command() {
            Command::Run(cmd) => {
                assert_eq!(cmd.query.config, PathBuf::from(DEFAULT_CONFIG_PATH));
                assert!(cmd.query.sort.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_app_parse_run() {
        let args = vec![
            "meme-radar", "run", "--config", "test.toml", "--interval-ms", "5000",
            "--locale", "en", "--sort", "TimeDesc", "--filter", "chinese",
        ];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.resolved_command() {
            Command::Run(cmd) => {
                assert_eq!(cmd.query.config, PathBuf::from("test.toml"));
                assert_eq!(cmd.query.interval_ms, Some(5000));
                assert_eq!(cmd.query.locale, Some(Locale::En));
                assert_eq!(cmd.query.sort, Some(SortMode::TimeDesc));
                assert_eq!(cmd.query.filter, Some(FilterMode::Chinese));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_app_parse_snapshot() {
        let app = CliApp::try_parse_from(["meme-radar", "snapshot", "--json"]).unwrap();
        match app.resolved_command() {
            Command::Snapshot(cmd) => assert!(cmd.json),
            _ => panic!("Expected Snapshot command"),
        }
        assert!(!app.resolved_command().is_interactive());
    }

    #[test]
    fn test_cli_app_parse_reset_seen() {
        let app = CliApp::try_parse_from(["meme-radar", "reset-seen", "-c", "x.toml"]).unwrap();
        match app.resolved_command() {
            Command::ResetSeen(cmd) => assert_eq!(cmd.query.config, PathBuf::from("x.toml")),
            _ => panic!("Expected ResetSeen command"),
        }
    }

    #[test]
    fn test_invalid_sort_rejected() {
        let result = CliApp::try_parse_from(["meme-radar", "run", "--sort", "Cheapest"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags() {
        let app = CliApp::try_parse_from(["meme-radar", "snapshot", "--verbose", "--debug"]).unwrap();
        assert!(app.verbose);
        assert!(app.debug);
    }

    #[test]
    fn test_overrides_applied_and_validated() {
        let mut config = Config::default();
        let args = QueryArgs {
            interval_ms: Some(1000),
            locale: Some(Locale::En),
            sort: Some(SortMode::ProgressDesc),
            ..Default::default()
        };
        args.apply_to(&mut config).unwrap();
        assert_eq!(config.refresh.interval_ms, 1000);
        assert_eq!(config.display.locale, Locale::En);
        assert_eq!(config.display.default_sort, SortMode::ProgressDesc);
        assert_eq!(config.display.default_filter, FilterMode::All);

        let too_fast = QueryArgs {
            interval_ms: Some(10),
            ..Default::default()
        };
        assert!(too_fast.apply_to(&mut config).is_err());
    }

    #[test]
    fn test_reset_seen_clears_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = dir.path().display().to_string();

        let store = config.storage.store();
        store
            .save_seen_set(&crate::domain::SeenSet::from_addresses(["0xabc"]))
            .unwrap();

        reset_seen_command(config).unwrap();
        assert!(store.load_seen_set().is_empty());
        assert!(store.load_event_log().is_empty());
    }
}
