//! Refresh Pipeline Integration Tests
//!
//! Drives the public API end to end without network access:
//! 1. API envelope decoding -> RefreshLoop with the in-memory feed
//! 2. Novelty detection across cycles and across restarts
//! 3. Durable seen-set and event log on disk
//! 4. Rendering of the published snapshot

use std::sync::Arc;

use meme_radar::adapters::fourmeme::decode_envelope;
use meme_radar::adapters::storage::JsonStateStore;
use meme_radar::application::{compose_frame, RefreshConfig, RefreshLoop, ViewState};
use meme_radar::domain::{DetectionPhase, FilterMode, Locale, SortMode, TokenRecord};
use meme_radar::ports::mocks::MockTokenFeed;
use meme_radar::render::table::TableRenderer;
use tempfile::tempdir;

// ============================================================================
// Test Fixtures
// ============================================================================

const TEMPLATE: &str = "https://example.com/token/{address}";

/// Listing page in the shape the API returns, with mixed string/number fields
fn api_page(entries: &[(&str, &str, &str)]) -> String {
    let data: Vec<String> = entries
        .iter()
        .map(|(address, name, network)| {
            format!(
                r#"{{"address":"{address}","name":"{name}","shortName":"{name}","symbol":"SYM",
                    "networkCode":"{network}","status":"PUBLISH","createDate":1700000000000,
                    "tokenPrice":{{"price":"0.00000123","marketCap":45678.9,"tradingUsd":"1200",
                    "progress":0.4567,"increase":"-0.05"}}}}"#
            )
        })
        .collect();
    format!(r#"{{"code":0,"msg":"success","data":[{}]}}"#, data.join(","))
}

fn page(entries: &[(&str, &str, &str)]) -> Vec<TokenRecord> {
    decode_envelope(&api_page(entries)).expect("fixture page decodes")
}

fn store(dir: &std::path::Path) -> JsonStateStore {
    JsonStateStore::in_dir(dir, ".seen_tokens.json", ".new_token_events.json")
}

fn refresh_loop(feed: MockTokenFeed, store: JsonStateStore) -> RefreshLoop {
    RefreshLoop::new(
        Arc::new(feed),
        store,
        RefreshConfig::default(),
        SortMode::Hot,
        FilterMode::All,
    )
}

// ============================================================================
// Pipeline
// ============================================================================

#[tokio::test]
async fn test_first_run_baseline_then_new_listing() {
    let dir = tempdir().unwrap();
    let feed = MockTokenFeed::new()
        .with_batch(page(&[("0xAAA", "Alpha", "BSC"), ("0xBBB", "Beta", "BSC")]))
        .with_batch(page(&[
            ("0xCCC", "Gamma", "BSC"),
            ("0xAAA", "Alpha", "BSC"),
            ("0xBBB", "Beta", "BSC"),
        ]));
    let rl = refresh_loop(feed, store(dir.path()));

    let baseline = rl.run_cycle().await.unwrap();
    assert_eq!(baseline.phase, DetectionPhase::Baseline);
    assert_eq!(baseline.new_tokens, 0);
    assert!(rl.snapshot().await.tokens.iter().all(|t| !t.is_new));

    let steady = rl.run_cycle().await.unwrap();
    assert_eq!(steady.new_tokens, 1);

    let snap = rl.snapshot().await;
    assert!(snap.tokens[0].is_new);
    assert_eq!(snap.event_log.len(), 1);
    assert_eq!(snap.event_log[0].token.name, "Gamma");
    assert!(snap.event_log[0].token.is_new);

    let disk = store(dir.path());
    assert_eq!(disk.load_seen_set().len(), 3);
    assert_eq!(disk.load_event_log().len(), 1);
}

#[tokio::test]
async fn test_restart_does_not_re_announce() {
    let dir = tempdir().unwrap();

    {
        let feed = MockTokenFeed::new().with_batch(page(&[("0xAAA", "Alpha", "BSC")]));
        let rl = refresh_loop(feed, store(dir.path()));
        rl.run_cycle().await.unwrap();
    }

    // Second process: the first batch is a baseline, even with a new address
    let feed = MockTokenFeed::new()
        .with_batch(page(&[("0xDDD", "Delta", "BSC"), ("0xaaa", "Alpha", "BSC")]))
        .with_batch(page(&[("0xEEE", "Echo", "BSC"), ("0xDDD", "Delta", "BSC")]));
    let rl = refresh_loop(feed, store(dir.path()));
    rl.begin_session().await;

    let first = rl.run_cycle().await.unwrap();
    assert_eq!(first.phase, DetectionPhase::Baseline);
    assert_eq!(first.new_tokens, 0);

    let second = rl.run_cycle().await.unwrap();
    assert_eq!(second.new_tokens, 1);

    let seen = store(dir.path()).load_seen_set();
    assert_eq!(seen.sorted(), vec!["0xaaa", "0xddd", "0xeee"]);
}

#[tokio::test]
async fn test_other_networks_are_ignored() {
    let dir = tempdir().unwrap();
    let feed = MockTokenFeed::new()
        .with_batch(page(&[("0x1", "One", "BSC")]))
        .with_batch(page(&[("0x2", "Two", "ETH"), ("0x1", "One", "BSC")]));
    let rl = refresh_loop(feed, store(dir.path()));

    rl.run_cycle().await.unwrap();
    let report = rl.run_cycle().await.unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.displayed, 1);
    assert_eq!(report.new_tokens, 0);
    assert!(!store(dir.path()).load_seen_set().contains("0x2"));
}

#[tokio::test]
async fn test_corrupt_state_files_start_fresh() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(".seen_tokens.json"), "{not json").unwrap();
    std::fs::write(dir.path().join(".new_token_events.json"), "").unwrap();

    let feed = MockTokenFeed::new().with_batch(page(&[("0xAAA", "Alpha", "BSC")]));
    let rl = refresh_loop(feed, store(dir.path()));
    assert!(rl.snapshot().await.event_log.is_empty());

    let report = rl.run_cycle().await.unwrap();
    assert_eq!(report.phase, DetectionPhase::Baseline);
    assert!(store(dir.path()).load_seen_set().contains("0xaaa"));
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test]
async fn test_rendered_rows_have_constant_width() {
    let dir = tempdir().unwrap();
    let feed = MockTokenFeed::new().with_batch(page(&[
        ("0xAAA", "Alpha", "BSC"),
        ("0xBBB", "超级无敌长名字的中文代币测试", "BSC"),
        ("0xCCC", "🚀🚀 Moon", "BSC"),
    ]));
    let rl = refresh_loop(feed, store(dir.path()));
    rl.run_cycle().await.unwrap();

    let renderer = TableRenderer::new(Locale::En, TEMPLATE);
    let snap = rl.snapshot().await;
    let lines = renderer.table_lines(&snap.tokens, 1_700_000_060_000);

    // header, rule, three rows
    assert_eq!(lines.len(), 5);
    for line in &lines {
        assert_eq!(renderer.layout().display_width(&line.text()), renderer.row_width());
    }
}

#[tokio::test]
async fn test_full_screen_shows_new_token_log() {
    let dir = tempdir().unwrap();
    let feed = MockTokenFeed::new()
        .with_batch(page(&[("0xAAA", "Alpha", "BSC")]))
        .with_batch(page(&[("0xFFF", "Foxtrot", "BSC"), ("0xAAA", "Alpha", "BSC")]));
    let rl = refresh_loop(feed, store(dir.path()));
    rl.run_cycle().await.unwrap();
    rl.run_cycle().await.unwrap();

    let renderer = TableRenderer::new(Locale::En, TEMPLATE);
    let view = ViewState::new(SortMode::Hot, FilterMode::All);
    let snap = rl.snapshot().await;
    let text = compose_frame(&renderer, &snap, &view, 1_700_000_060_000).to_plain_text();

    assert!(text.contains("Foxtrot"));
    assert!(text.contains("NEW"));
    assert!(text.contains("total 1"));
    assert!(text.contains("https://example.com/token/0xFFF"));
}
