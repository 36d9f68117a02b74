//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - four.meme: listing API client
//! - Storage: JSON seen-set and event log
//! - Terminal: crossterm painter and keyboard input
//! - CLI: Command-line interface handlers

pub mod fourmeme;
pub mod storage;
pub mod terminal;
pub mod cli;

pub use fourmeme::{FourMemeClient, FourMemeConfig};
pub use storage::JsonStateStore;
pub use terminal::{InputReader, TerminalDisplay};
pub use cli::CliApp;
