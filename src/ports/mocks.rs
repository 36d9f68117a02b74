//! In-memory port implementations for tests and offline runs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::display::{DisplayError, DisplayPort};
use super::token_feed::{FeedError, TokenFeedPort, TokenQuery};
use crate::domain::TokenRecord;
use crate::render::frame::Frame;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Token feed that replays scripted responses and records every query.
///
/// Responses are consumed in order. Once the script runs out the last
/// successful batch is repeated (empty if there never was one).
#[derive(Debug, Default, Clone)]
pub struct MockTokenFeed {
    calls: Arc<Mutex<Vec<TokenQuery>>>,
    responses: Arc<Mutex<VecDeque<Result<Vec<TokenRecord>, FeedError>>>>,
    last_batch: Arc<Mutex<Vec<TokenRecord>>>,
    delay: Option<Duration>,
}

impl MockTokenFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to queue a successful batch
    pub fn with_batch(self, batch: Vec<TokenRecord>) -> Self {
        lock(&self.responses).push_back(Ok(batch));
        self
    }

    /// Builder method to queue a failure
    pub fn with_failure(self, error: FeedError) -> Self {
        lock(&self.responses).push_back(Err(error));
        self
    }

    /// Builder method to make every fetch take `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a batch after construction
    pub fn push_batch(&self, batch: Vec<TokenRecord>) {
        lock(&self.responses).push_back(Ok(batch));
    }

    /// Get all recorded queries
    pub fn get_calls(&self) -> Vec<TokenQuery> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl TokenFeedPort for MockTokenFeed {
    async fn fetch_tokens(&self, query: &TokenQuery) -> Result<Vec<TokenRecord>, FeedError> {
        lock(&self.calls).push(query.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = lock(&self.responses).pop_front();
        match next {
            Some(Ok(batch)) => {
                *lock(&self.last_batch) = batch.clone();
                Ok(batch)
            }
            Some(Err(e)) => Err(e),
            None => Ok(lock(&self.last_batch).clone()),
        }
    }
}

/// Display that keeps every painted frame
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Frame> {
        lock(&self.frames).clone()
    }

    /// Plain text of the most recent frame
    pub fn last_text(&self) -> Option<String> {
        lock(&self.frames).last().map(Frame::to_plain_text)
    }
}

impl DisplayPort for RecordingDisplay {
    fn paint(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        lock(&self.frames).push(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FilterMode, SortMode};
    use crate::render::frame::Line;

    fn query() -> TokenQuery {
        TokenQuery::first_page(SortMode::Hot, FilterMode::All, 30)
    }

    fn token(addr: &str) -> TokenRecord {
        TokenRecord {
            address: addr.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_mock_feed_replays_script() {
        let mock = MockTokenFeed::new()
            .with_batch(vec![token("0x1")])
            .with_failure(FeedError::Http("timeout".to_string()))
            .with_batch(vec![token("0x2")]);

        assert_eq!(mock.fetch_tokens(&query()).await.unwrap()[0].address, "0x1");
        assert!(mock.fetch_tokens(&query()).await.is_err());
        assert_eq!(mock.fetch_tokens(&query()).await.unwrap()[0].address, "0x2");
        // Script exhausted: last batch repeats
        assert_eq!(mock.fetch_tokens(&query()).await.unwrap()[0].address, "0x2");
        assert_eq!(mock.get_calls().len(), 4);
    }

    #[tokio::test]
    async fn test_mock_feed_records_queries() {
        let mock = MockTokenFeed::new();
        let q = TokenQuery::first_page(SortMode::TimeDesc, FilterMode::Chinese, 10);
        assert!(mock.fetch_tokens(&q).await.unwrap().is_empty());
        assert_eq!(mock.get_calls(), vec![q]);
    }

    #[test]
    fn test_recording_display() {
        let mut display = RecordingDisplay::new();
        let handle = display.clone();
        display.paint(&Frame::new(vec![Line::plain("hello")])).unwrap();
        assert_eq!(handle.frames().len(), 1);
        assert_eq!(handle.last_text().as_deref(), Some("hello"));
    }
}
