//! Refresh Loop
//!
//! Polls the listing feed on a fixed interval. Each cycle:
//! - fetches one page with the active sort/filter
//! - keeps only listings on the configured network
//! - runs novelty detection against the seen-set
//! - persists the seen-set (baseline, or when something is new) and
//!   appends new events to the durable log
//! - publishes a fully replaced snapshot for the renderer
//!
//! Only one cycle runs at a time: a tick that fires while a cycle is still
//! in flight is skipped, not queued. A failed fetch leaves the previous
//! snapshot in place and bumps the failure counter.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::time::MissedTickBehavior;

use crate::adapters::storage::{JsonStateStore, PersistError};
use crate::domain::{
    append_capped, DetectionPhase, FilterMode, NewTokenEvent, NoveltyDetector, SeenSet, SortMode,
    TokenRecord, DEFAULT_MAX_LOG_ITEMS,
};
use crate::ports::token_feed::{FeedError, TokenFeedPort, TokenQuery};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Refresh cycle already in flight")]
    CycleInFlight,

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FeedError),
}

/// Refresh loop settings
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between cycles
    pub interval: Duration,
    /// Network tag listings must carry to be shown and tracked
    pub network: String,
    /// Listings per request
    pub page_size: u32,
    /// Event log cap
    pub max_log_items: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            network: "BSC".to_string(),
            page_size: 30,
            max_log_items: DEFAULT_MAX_LOG_ITEMS,
        }
    }
}

/// State published to the renderer after every cycle
#[derive(Debug, Clone, Default)]
pub struct DisplaySnapshot {
    /// Current listings with novelty flags, in API order
    pub tokens: Vec<TokenRecord>,
    /// Events detected by the most recent cycle
    pub new_events: Vec<NewTokenEvent>,
    /// Durable event log, oldest first
    pub event_log: Vec<NewTokenEvent>,
    /// Wall-clock time of the last successful cycle, epoch ms
    pub last_update_ms: Option<i64>,
    pub has_loaded_once: bool,
    pub is_loading: bool,
    /// Failed fetches since startup
    pub transport_failures: u64,
    pub last_error: Option<String>,
    /// Incremented on every change
    pub generation: u64,
}

/// Summary of one completed cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub phase: DetectionPhase,
    pub fetched: usize,
    pub displayed: usize,
    pub new_tokens: usize,
}

/// Mutable state owned by the single running cycle
struct CycleState {
    store: JsonStateStore,
    detector: NoveltyDetector,
    seen: SeenSet,
}

#[derive(Clone)]
pub struct RefreshLoop {
    feed: Arc<dyn TokenFeedPort>,
    config: RefreshConfig,
    /// Held for the duration of a cycle; `try_lock` is the single-flight guard
    cycle: Arc<Mutex<CycleState>>,
    snapshot: Arc<RwLock<DisplaySnapshot>>,
    query: Arc<RwLock<TokenQuery>>,
    is_running: Arc<RwLock<bool>>,
}

impl RefreshLoop {
    /// Create a loop over `feed`, loading the seen-set and event log from `store`
    pub fn new(
        feed: Arc<dyn TokenFeedPort>,
        store: JsonStateStore,
        config: RefreshConfig,
        sort: SortMode,
        filter: FilterMode,
    ) -> Self {
        let seen = store.load_seen_set();
        let event_log = store.load_event_log();
        tracing::info!(
            "Loaded {} seen addresses and {} logged events",
            seen.len(),
            event_log.len()
        );

        let query = TokenQuery::first_page(sort, filter, config.page_size);
        let snapshot = DisplaySnapshot {
            event_log,
            ..Default::default()
        };

        Self {
            feed,
            config,
            cycle: Arc::new(Mutex::new(CycleState {
                store,
                detector: NoveltyDetector::new(),
                seen,
            })),
            snapshot: Arc::new(RwLock::new(snapshot)),
            query: Arc::new(RwLock::new(query)),
            is_running: Arc::new(RwLock::new(false)),
        }
    }

    /// Start a fresh session: the event log only covers the current run
    pub async fn begin_session(&self) {
        let state = self.cycle.lock().await;
        if let Err(e) = on_store(&state.store, |store| store.clear_event_log()).await {
            tracing::warn!("Failed to clear event log: {}", e);
        }
        let mut snap = self.snapshot.write().await;
        snap.event_log.clear();
        snap.generation += 1;
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Current published state
    pub async fn snapshot(&self) -> DisplaySnapshot {
        self.snapshot.read().await.clone()
    }

    /// Generation counter of the published state
    pub async fn generation(&self) -> u64 {
        self.snapshot.read().await.generation
    }

    pub async fn current_query(&self) -> TokenQuery {
        self.query.read().await.clone()
    }

    /// Change the active modes used by subsequent cycles
    pub async fn set_modes(&self, sort: SortMode, filter: FilterMode) {
        let mut query = self.query.write().await;
        query.sort = sort;
        query.filter = filter;
        tracing::info!("Query changed: sort={} filter={}", sort, filter);
    }

    /// Run one fetch-detect-persist-publish cycle
    pub async fn run_cycle(&self) -> Result<CycleReport, RefreshError> {
        let mut guard = self
            .cycle
            .try_lock()
            .map_err(|_| RefreshError::CycleInFlight)?;
        let state = &mut *guard;

        let query = self.current_query().await;
        self.update_snapshot(|s| s.is_loading = true).await;

        let batch = match self.feed.fetch_tokens(&query).await {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!("Fetch failed ({} / {}): {}", query.sort, query.filter, e);
                let message = e.to_string();
                self.update_snapshot(|s| {
                    s.is_loading = false;
                    s.transport_failures += 1;
                    s.last_error = Some(message);
                })
                .await;
                return Err(e.into());
            }
        };

        let fetched = batch.len();
        let filtered: Vec<TokenRecord> = batch
            .into_iter()
            .filter(|t| t.is_on_network(&self.config.network))
            .collect();

        let now = Utc::now().timestamp_millis();
        let outcome = state.detector.detect(&filtered, &state.seen, now);

        if outcome.should_persist_seen() {
            let seen = outcome.updated_seen.clone();
            if let Err(e) = on_store(&state.store, move |store| store.save_seen_set(&seen)).await {
                tracing::warn!("Failed to save seen-set: {}", e);
            }
        }

        let persisted_log = if outcome.new_events.is_empty() {
            None
        } else {
            for event in &outcome.new_events {
                tracing::info!(
                    "New token: {} ({}) {}",
                    event.token.name,
                    event.token.symbol,
                    event.token.address
                );
            }
            let events = outcome.new_events.clone();
            let cap = self.config.max_log_items;
            match on_store(&state.store, move |store| store.append_events(&events, cap)).await {
                Ok(log) => Some(log),
                Err(e) => {
                    tracing::warn!("Failed to append event log: {}", e);
                    None
                }
            }
        };

        let report = CycleReport {
            phase: outcome.phase,
            fetched,
            displayed: outcome.records.len(),
            new_tokens: outcome.new_events.len(),
        };
        state.seen = outcome.updated_seen;

        let max_log_items = self.config.max_log_items;
        let new_events = outcome.new_events;
        let records = outcome.records;
        self.update_snapshot(move |s| {
            s.event_log = match persisted_log {
                Some(log) => log,
                None => append_capped(std::mem::take(&mut s.event_log), &new_events, max_log_items),
            };
            s.tokens = records;
            s.new_events = new_events;
            s.last_update_ms = Some(now);
            s.has_loaded_once = true;
            s.is_loading = false;
            s.last_error = None;
        })
        .await;

        tracing::debug!(
            "Cycle done: phase={:?} fetched={} shown={} new={}",
            report.phase,
            report.fetched,
            report.displayed,
            report.new_tokens
        );
        Ok(report)
    }

    /// Spawn a cycle without waiting for it
    pub fn trigger(&self) {
        let this = self.clone();
        tokio::spawn(async move {
            if let Err(e) = this.run_cycle().await {
                tracing::debug!("Refresh skipped: {}", e);
            }
        });
    }

    /// Tick until stopped. Cycles run as separate tasks so an overlong
    /// fetch makes the following ticks skip instead of piling up.
    pub async fn run(&self) {
        *self.is_running.write().await = true;
        tracing::info!(
            "Refresh loop started: interval={:?} network={}",
            self.config.interval,
            self.config.network
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while *self.is_running.read().await {
            ticker.tick().await;
            if !*self.is_running.read().await {
                break;
            }
            self.trigger();
        }

        tracing::info!("Refresh loop stopped");
    }

    pub async fn stop(&self) {
        *self.is_running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Seen-set held by the loop
    pub async fn seen_count(&self) -> usize {
        self.cycle.lock().await.seen.len()
    }

    async fn update_snapshot<F>(&self, f: F)
    where
        F: FnOnce(&mut DisplaySnapshot),
    {
        let mut snap = self.snapshot.write().await;
        f(&mut snap);
        snap.generation += 1;
    }
}

/// Run a store operation on the blocking pool; state files are written
/// with plain `std::fs` and `sync_all`.
async fn on_store<T, F>(store: &JsonStateStore, op: F) -> Result<T, PersistError>
where
    F: FnOnce(&JsonStateStore) -> Result<T, PersistError> + Send + 'static,
    T: Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| PersistError::TaskError(e.to_string()))?
}
