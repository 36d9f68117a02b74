//! JSON State Persistence
//!
//! Durable seen-address set and capped new-token event log, each in its
//! own JSON document:
//!
//! ```json
//! { "addresses": { "0xabc...": true } }
//! { "events": [ { "token": { ... }, "timestamp": 1760000000000 } ] }
//! ```
//!
//! Reads never fail: a missing, empty or corrupt document is treated as no
//! prior state. Writes go to a temporary file in the target directory which
//! is then renamed over the document, so a crash leaves either the old or
//! the new contents.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{append_capped, NewTokenEvent, SeenSet};

/// Default seen-set file name
pub const DEFAULT_SEEN_FILE: &str = ".seen_tokens.json";

/// Default event log file name
pub const DEFAULT_EVENT_LOG_FILE: &str = ".new_token_events.json";

#[derive(Error, Debug, Clone)]
pub enum PersistError {
    #[error("Failed to serialize state: {0}")]
    SerializationError(String),

    #[error("Failed to write state file: {0}")]
    WriteError(String),

    #[error("Failed to replace state file: {0}")]
    RenameError(String),

    #[error("Failed to create directory: {0}")]
    DirectoryError(String),

    #[error("State write task failed: {0}")]
    TaskError(String),
}

#[derive(Debug, Serialize)]
struct SeenDocumentOut<'a> {
    addresses: BTreeMap<&'a str, bool>,
}

#[derive(Debug, Deserialize)]
struct SeenDocumentIn {
    #[serde(default)]
    addresses: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize)]
struct EventLogOut<'a> {
    events: &'a [NewTokenEvent],
}

#[derive(Debug, Deserialize)]
struct EventLogIn {
    #[serde(default)]
    events: Vec<Value>,
}

/// File-backed store for the seen-set and event log. Single writer.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    seen_path: PathBuf,
    log_path: PathBuf,
}

impl JsonStateStore {
    pub fn new(seen_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            seen_path: seen_path.into(),
            log_path: log_path.into(),
        }
    }

    /// Store with both documents under `data_dir`
    pub fn in_dir(data_dir: &Path, seen_file: &str, log_file: &str) -> Self {
        Self::new(data_dir.join(seen_file), data_dir.join(log_file))
    }

    pub fn seen_path(&self) -> &Path {
        &self.seen_path
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Load the seen-set. Every key counts, whatever its value.
    pub fn load_seen_set(&self) -> SeenSet {
        match read_document::<SeenDocumentIn>(&self.seen_path) {
            Some(doc) => {
                let set = SeenSet::from_addresses(doc.addresses.keys());
                tracing::debug!("Seen-set loaded: {} addresses", set.len());
                set
            }
            None => SeenSet::new(),
        }
    }

    /// Overwrite the seen-set document with `set`
    pub fn save_seen_set(&self, set: &SeenSet) -> Result<(), PersistError> {
        let doc = SeenDocumentOut {
            addresses: set.sorted().into_iter().map(|a| (a, true)).collect(),
        };
        write_json(&self.seen_path, &doc)?;
        tracing::debug!("Seen-set saved: {} addresses", set.len());
        Ok(())
    }

    /// Load the event log. Entries that do not parse are dropped.
    pub fn load_event_log(&self) -> Vec<NewTokenEvent> {
        let Some(doc) = read_document::<EventLogIn>(&self.log_path) else {
            return Vec::new();
        };
        let total = doc.events.len();
        let events: Vec<NewTokenEvent> = doc
            .events
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();
        if events.len() < total {
            tracing::warn!(
                "Dropped {} malformed event log entries from {}",
                total - events.len(),
                self.log_path.display()
            );
        }
        events
    }

    pub fn save_event_log(&self, events: &[NewTokenEvent]) -> Result<(), PersistError> {
        write_json(&self.log_path, &EventLogOut { events })
    }

    /// Append `new_events`, keep the newest `max_items` and persist.
    /// Returns the resulting log. With nothing to append the stored log is
    /// returned untouched.
    pub fn append_events(
        &self,
        new_events: &[NewTokenEvent],
        max_items: usize,
    ) -> Result<Vec<NewTokenEvent>, PersistError> {
        let existing = self.load_event_log();
        if new_events.is_empty() {
            return Ok(existing);
        }
        let merged = append_capped(existing, new_events, max_items);
        self.save_event_log(&merged)?;
        tracing::debug!("Event log appended {} (total {})", new_events.len(), merged.len());
        Ok(merged)
    }

    /// Reset the event log to empty
    pub fn clear_event_log(&self) -> Result<(), PersistError> {
        self.save_event_log(&[])
    }

    /// Reset the seen-set to empty
    pub fn clear_seen_set(&self) -> Result<(), PersistError> {
        self.save_seen_set(&SeenSet::new())
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!("Cannot read {}: {}; starting empty", path.display(), e);
            return None;
        }
    };
    if content.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(&content) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!("Corrupt state file {}: {}; starting empty", path.display(), e);
            None
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|e| PersistError::SerializationError(e.to_string()))?;
    write_atomic(path, content.as_bytes())
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<(), PersistError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| PersistError::DirectoryError(e.to_string()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| PersistError::WriteError(e.to_string()))?;
    tmp.write_all(content)
        .map_err(|e| PersistError::WriteError(e.to_string()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| PersistError::WriteError(e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| PersistError::RenameError(e.error.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenRecord;
    use tempfile::tempdir;

    fn store(dir: &Path) -> JsonStateStore {
        JsonStateStore::in_dir(dir, DEFAULT_SEEN_FILE, DEFAULT_EVENT_LOG_FILE)
    }

    fn event(addr: &str, ts: i64) -> NewTokenEvent {
        NewTokenEvent::new(
            TokenRecord {
                address: addr.to_string(),
                name: format!("Token {}", addr),
                ..Default::default()
            }
            .marked(true),
            ts,
        )
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());
        assert!(s.load_seen_set().is_empty());
        assert!(s.load_event_log().is_empty());
    }

    #[test]
    fn test_seen_set_roundtrip_lowercases() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());

        let mut set = s.load_seen_set();
        set.insert("0xABCDEF");
        s.save_seen_set(&set).unwrap();

        let loaded = s.load_seen_set();
        assert!(loaded.contains("0xabcdef"));
        assert_eq!(loaded.sorted(), vec!["0xabcdef"]);
    }

    #[test]
    fn test_seen_document_format() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());
        s.save_seen_set(&SeenSet::from_addresses(["0xB", "0xa"])).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(s.seen_path()).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"addresses": {"0xa": true, "0xb": true}}));
    }

    #[test]
    fn test_seen_set_accepts_mixed_case_keys_and_values() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());
        fs::write(s.seen_path(), r#"{"addresses": {"0xAbC": true, "0xdef": 1}}"#).unwrap();

        let loaded = s.load_seen_set();
        assert_eq!(loaded.sorted(), vec!["0xabc", "0xdef"]);
    }

    #[test]
    fn test_corrupt_documents_are_empty() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());
        fs::write(s.seen_path(), "{ not json").unwrap();
        fs::write(s.log_path(), "[1, 2, 3]").unwrap();

        assert!(s.load_seen_set().is_empty());
        assert!(s.load_event_log().is_empty());
    }

    #[test]
    fn test_malformed_event_entries_dropped() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());
        let good = serde_json::to_value(event("0x1", 5)).unwrap();
        let doc = serde_json::json!({"events": [good, {"timestamp": "soon"}, 42]});
        fs::write(s.log_path(), doc.to_string()).unwrap();

        let log = s.load_event_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].timestamp, 5);
    }

    #[test]
    fn test_append_events_caps_and_persists() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());

        s.append_events(&[event("0x1", 1), event("0x2", 2)], 3).unwrap();
        let out = s.append_events(&[event("0x3", 3), event("0x4", 4)], 3).unwrap();

        let stamps: Vec<i64> = out.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![2, 3, 4]);
        assert_eq!(s.load_event_log(), out);
    }

    #[test]
    fn test_append_to_full_log() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());
        let full: Vec<_> = (1..=3).map(|i| event(&format!("0x{}", i), i)).collect();
        s.save_event_log(&full).unwrap();

        let out = s.append_events(&[event("0x4", 4)], 3).unwrap();
        let stamps: Vec<i64> = out.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![2, 3, 4]);
        assert_eq!(s.load_event_log(), out);
    }

    #[test]
    fn test_append_nothing_returns_existing() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());
        s.append_events(&[event("0x1", 1)], 10).unwrap();

        let out = s.append_events(&[], 10).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_event_roundtrip_preserves_token() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());
        let mut e = event("0xFeed", 7);
        e.token.extra.insert("launchTime".to_string(), serde_json::json!(1700));
        s.append_events(&[e.clone()], 10).unwrap();

        assert_eq!(s.load_event_log(), vec![e]);
    }

    #[test]
    fn test_clear_event_log() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());
        s.append_events(&[event("0x1", 1)], 10).unwrap();
        s.clear_event_log().unwrap();

        assert!(s.load_event_log().is_empty());
        let raw: Value = serde_json::from_str(&fs::read_to_string(s.log_path()).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"events": []}));
    }

    #[test]
    fn test_clear_seen_set() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());
        s.save_seen_set(&SeenSet::from_addresses(["0x1"])).unwrap();
        s.clear_seen_set().unwrap();
        assert!(s.load_seen_set().is_empty());
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("state").join("nested");
        let s = store(&nested);
        s.save_seen_set(&SeenSet::from_addresses(["0x1"])).unwrap();
        assert!(s.seen_path().exists());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());
        s.save_seen_set(&SeenSet::from_addresses(["0x1"])).unwrap();
        s.clear_event_log().unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec![DEFAULT_EVENT_LOG_FILE.to_string(), DEFAULT_SEEN_FILE.to_string()]);
    }
}
