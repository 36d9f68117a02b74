//! meme-radar - live new-token watcher for four.meme
//!
//! Polls the listing API, flags addresses never seen before and renders a
//! fixed-width, CJK-aware table in the terminal.
//!
//! # Modules
//!
//! - `domain`: Listing records, seen-set, novelty detection, modes
//! - `ports`: Trait abstractions (TokenFeedPort, DisplayPort) and mocks
//! - `adapters`: External implementations (four.meme, JSON storage, terminal, CLI)
//! - `render`: Width classification, text layout, number formatting, table
//! - `application`: Refresh loop and dashboard wiring
//! - `config`: Configuration loading and validation

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod render;
pub mod application;
pub mod config;
