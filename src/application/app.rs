//! Dashboard driver
//!
//! Wires the refresh loop, keyboard input and the display together. The
//! refresh loop publishes snapshots; this task only reads them and repaints
//! when something visible changed.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::refresh_loop::{DisplaySnapshot, RefreshLoop};
use super::view::{InputAction, ViewCommand, ViewState};
use crate::ports::display::{DisplayError, DisplayPort};
use crate::render::frame::Frame;
use crate::render::screen::ScreenInput;
use crate::render::table::TableRenderer;
use crate::render::width::{HeuristicWidth, WidthClassifier};

/// Relative times in the table must age even when nothing is fetched
const MAX_FRAME_AGE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Display error: {0}")]
    Display(#[from] DisplayError),
}

/// Compose the full screen for a snapshot and view state
pub fn compose_frame<C: WidthClassifier>(
    renderer: &TableRenderer<C>,
    snapshot: &DisplaySnapshot,
    view: &ViewState,
    now_ms: i64,
) -> Frame {
    renderer.render_screen(&ScreenInput {
        tokens: &snapshot.tokens,
        event_log: &snapshot.event_log,
        last_update_ms: snapshot.last_update_ms,
        has_loaded_once: snapshot.has_loaded_once,
        is_loading: snapshot.is_loading,
        transport_failures: snapshot.transport_failures,
        last_error: snapshot.last_error.as_deref(),
        active_sort: view.active_sort,
        selected_sort: view.selected_sort,
        active_filter: view.active_filter,
        selected_filter: view.selected_filter,
        now_ms,
    })
}

pub struct Dashboard<D, C = HeuristicWidth> {
    refresh: RefreshLoop,
    renderer: TableRenderer<C>,
    display: D,
    view: ViewState,
    frame_interval: Duration,
}

impl<D: DisplayPort, C: WidthClassifier> Dashboard<D, C> {
    pub fn new(
        refresh: RefreshLoop,
        renderer: TableRenderer<C>,
        display: D,
        view: ViewState,
        frame_interval: Duration,
    ) -> Self {
        Self {
            refresh,
            renderer,
            display,
            view,
            frame_interval,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Paint the current state unconditionally
    pub async fn repaint(&mut self) -> Result<(), AppError> {
        let snapshot = self.refresh.snapshot().await;
        let frame = compose_frame(&self.renderer, &snapshot, &self.view, Utc::now().timestamp_millis());
        self.display.paint(&frame)?;
        Ok(())
    }

    /// Apply one key action. Returns false when the dashboard should quit.
    pub async fn handle(&mut self, action: InputAction) -> bool {
        match self.view.apply(action) {
            ViewCommand::None => true,
            ViewCommand::Requery { sort, filter } => {
                self.refresh.set_modes(sort, filter).await;
                self.refresh.trigger();
                true
            }
            ViewCommand::Quit => false,
        }
    }

    /// Run until quit, Ctrl+C or the input channel closes. The refresh loop
    /// runs in its own task and is stopped on exit.
    pub async fn run(mut self, mut input: mpsc::Receiver<InputAction>) -> Result<D, AppError> {
        let ticker = {
            let refresh = self.refresh.clone();
            tokio::spawn(async move { refresh.run().await })
        };

        let result = self.event_loop(&mut input).await;

        self.refresh.stop().await;
        ticker.abort();
        result.map(|_| self.display)
    }

    async fn event_loop(&mut self, input: &mut mpsc::Receiver<InputAction>) -> Result<(), AppError> {
        let mut frames = tokio::time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut painted: Option<(u64, ViewState)> = None;
        let mut last_paint = tokio::time::Instant::now();

        loop {
            tokio::select! {
                action = input.recv() => {
                    match action {
                        Some(action) => {
                            if !self.handle(action).await {
                                tracing::info!("Quit requested");
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = frames.tick() => {
                    let generation = self.refresh.generation().await;
                    let stale = painted != Some((generation, self.view))
                        || last_paint.elapsed() >= MAX_FRAME_AGE;
                    if stale {
                        self.repaint().await?;
                        painted = Some((generation, self.view));
                        last_paint = tokio::time::Instant::now();
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupt received");
                    break;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::JsonStateStore;
    use crate::application::refresh_loop::RefreshConfig;
    use crate::domain::{FilterMode, Locale, SortMode, TokenRecord};
    use crate::ports::mocks::{MockTokenFeed, RecordingDisplay};
    use std::sync::Arc;
    use tempfile::tempdir;

    const TEMPLATE: &str = "https://example.com/token/{address}";

    fn token(addr: &str, name: &str) -> TokenRecord {
        TokenRecord {
            address: addr.to_string(),
            name: name.to_string(),
            symbol: "TKN".to_string(),
            network_code: "BSC".to_string(),
            ..Default::default()
        }
    }

    fn dashboard(
        feed: MockTokenFeed,
        dir: &std::path::Path,
    ) -> (Dashboard<RecordingDisplay>, RecordingDisplay) {
        let store = JsonStateStore::in_dir(dir, "seen.json", "log.json");
        let config = RefreshConfig {
            interval: Duration::from_millis(50),
            ..Default::default()
        };
        let refresh = RefreshLoop::new(Arc::new(feed), store, config, SortMode::Hot, FilterMode::All);
        let display = RecordingDisplay::new();
        let dash = Dashboard::new(
            refresh,
            TableRenderer::new(Locale::En, TEMPLATE),
            display.clone(),
            ViewState::new(SortMode::Hot, FilterMode::All),
            Duration::from_millis(10),
        );
        (dash, display)
    }

    #[tokio::test]
    async fn test_compose_frame_before_first_load() {
        let renderer = TableRenderer::new(Locale::En, TEMPLATE);
        let snapshot = DisplaySnapshot {
            is_loading: true,
            ..Default::default()
        };
        let view = ViewState::new(SortMode::Hot, FilterMode::All);
        let text = compose_frame(&renderer, &snapshot, &view, 0).to_plain_text();
        assert!(text.contains("Loading"));
    }

    #[tokio::test]
    async fn test_requery_updates_refresh_modes() {
        let dir = tempdir().unwrap();
        let feed = MockTokenFeed::new().with_batch(vec![]);
        let calls = feed.clone();
        let (mut dash, _display) = dashboard(feed, dir.path());

        assert!(dash.handle(InputAction::SortNext).await);
        assert!(dash.handle(InputAction::Confirm).await);
        assert_eq!(dash.view().active_sort, SortMode::TimeDesc);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let calls = calls.get_calls();
        assert!(!calls.is_empty());
        assert_eq!(calls.last().unwrap().sort, SortMode::TimeDesc);
    }

    #[tokio::test]
    async fn test_quit_action_stops() {
        let dir = tempdir().unwrap();
        let (mut dash, _display) = dashboard(MockTokenFeed::new(), dir.path());
        assert!(!dash.handle(InputAction::Quit).await);
    }

    #[tokio::test]
    async fn test_run_paints_fetched_tokens() {
        let dir = tempdir().unwrap();
        let feed = MockTokenFeed::new().with_batch(vec![token("0xabc", "Radar Coin")]);
        let (dash, display) = dashboard(feed, dir.path());

        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(dash.run(rx));

        tokio::time::sleep(Duration::from_millis(300)).await;
        tx.send(InputAction::Quit).await.unwrap();
        handle.await.unwrap().unwrap();

        assert!(!display.frames().is_empty());
        let text = display.last_text().unwrap();
        assert!(text.contains("Radar Coin"));
    }

    #[tokio::test]
    async fn test_run_ends_when_input_closes() {
        let dir = tempdir().unwrap();
        let (dash, _display) = dashboard(MockTokenFeed::new(), dir.path());
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        assert!(dash.run(rx).await.is_ok());
    }
}
