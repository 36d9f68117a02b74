//! Domain Layer - Listing records and new-token detection
//!
//! Pure types and logic with no I/O. Fetching, persistence and terminal
//! output happen through the ports layer.
//!
//! - `token`: listing records as delivered by the API, and detection events
//! - `seen_set`: grow-only, case-insensitive address set
//! - `event_log`: capped, detection-ordered event list
//! - `novelty`: baseline/steady new-listing detection
//! - `modes`: sort, filter and locale selections

pub mod token;
pub mod seen_set;
pub mod event_log;
pub mod novelty;
pub mod modes;

pub use token::{NewTokenEvent, TokenPrice, TokenRecord, NEW_STATUS};
pub use seen_set::SeenSet;
pub use event_log::{append_capped, DEFAULT_MAX_LOG_ITEMS};
pub use novelty::{DetectionPhase, NoveltyDetector, NoveltyOutcome};
pub use modes::{FilterMode, Locale, ModeParseError, SortMode};
