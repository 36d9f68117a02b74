//! Local state persistence

pub mod json_store;

pub use json_store::{JsonStateStore, PersistError, DEFAULT_EVENT_LOG_FILE, DEFAULT_SEEN_FILE};
