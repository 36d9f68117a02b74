//! meme-radar - live new-token watcher for four.meme
//!
//! Polls the four.meme listing API and highlights tokens never seen before.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

use meme_radar::adapters::cli::{self, CliApp};
use meme_radar::config::{load_config_or_default, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (environment overrides go here)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    let command = app.resolved_command();
    let options = command.options();

    let config_path = PathBuf::from(shellexpand::tilde(&options.config.to_string_lossy()).into_owned());
    let mut config = load_config_or_default(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    options.apply_to(&mut config)?;

    init_logging(app.verbose, app.debug, &config, command.is_interactive())?;
    if !config_path.exists() {
        tracing::warn!("Config file {} not found, using defaults", config_path.display());
    }

    cli::execute(command, config).await
}

/// Initialize logging. The dashboard owns stdout, so interactive runs log
/// to the configured file; everything else logs to stderr.
fn init_logging(verbose: bool, debug: bool, config: &Config, to_file: bool) -> Result<()> {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if to_file {
        let path = PathBuf::from(shellexpand::tilde(&config.logging.log_file).into_owned());
        let file = open_log_file(&path)?;
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
