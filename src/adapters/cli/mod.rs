//! CLI Adapter
//!
//! Command-line interface for meme-radar.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, QueryArgs, ResetSeenCmd, RunCmd, SnapshotCmd};

use anyhow::Result;

use crate::config::Config;

/// Execute the CLI command
pub async fn execute(command: Command, config: Config) -> Result<()> {
    commands::execute(command, config).await
}
