//! four.meme API Client
//!
//! HTTP client for the public token query endpoint. Transport errors, 429
//! and 5xx responses are retried with a short backoff; everything else is
//! returned to the caller on the first attempt.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::domain::TokenRecord;
use crate::ports::token_feed::{FeedError, TokenFeedPort, TokenQuery};
use super::types::{decode_envelope, query_pairs};

/// Default token query endpoint
pub const DEFAULT_API_URL: &str = "https://four.meme/meme-api/v1/private/token/query";

/// Longest error body kept in `FeedError::Status`
const MAX_ERROR_BODY: usize = 200;

/// Upper bound on a single retry wait
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Wait after a 429: 500ms doubled per attempt, capped
fn rate_limit_backoff(attempt: u32) -> Duration {
    2u64.checked_pow(attempt)
        .and_then(|factor| factor.checked_mul(500))
        .map_or(MAX_BACKOFF, Duration::from_millis)
        .min(MAX_BACKOFF)
}

/// Wait after a 5xx or transport error: 200ms per attempt, capped
fn retry_delay(attempt: u32) -> Duration {
    Duration::from_millis(200u64.saturating_mul(u64::from(attempt) + 1)).min(MAX_BACKOFF)
}

/// four.meme client configuration
#[derive(Debug, Clone)]
pub struct FourMemeConfig {
    /// Token query endpoint
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
}

impl Default for FourMemeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
        }
    }
}

/// Listing client for four.meme
#[derive(Debug, Clone)]
pub struct FourMemeClient {
    config: FourMemeConfig,
    http: Client,
}

impl FourMemeClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self, FeedError> {
        Self::with_config(FourMemeConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: FourMemeConfig) -> Result<Self, FeedError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("meme-radar/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    /// Get the configured endpoint
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fetch one page of listings
    pub async fn fetch_page(&self, query: &TokenQuery) -> Result<Vec<TokenRecord>, FeedError> {
        let req = self
            .http
            .get(&self.config.base_url)
            .query(&query_pairs(query));

        let response = self
            .execute_with_retry(|| async {
                req.try_clone()
                    .ok_or_else(|| FeedError::Http("Failed to clone request".into()))?
                    .send()
                    .await
                    .map_err(|e| FeedError::Http(e.to_string()))
            })
            .await?;

        self.handle_response(response).await
    }

    /// Execute request with retry logic and rate limit handling
    async fn execute_with_retry<F, Fut>(&self, request_fn: F) -> Result<reqwest::Response, FeedError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, FeedError>>,
    {
        let attempts = self.config.max_retries.saturating_add(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            let is_last = attempt + 1 == attempts;
            match request_fn().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS && !is_last {
                        let backoff = rate_limit_backoff(attempt);
                        tracing::warn!(
                            "Rate limited (429), backing off for {:?} (attempt {}/{})",
                            backoff, attempt + 1, attempts
                        );
                        tokio::time::sleep(backoff).await;
                        continue;
                    }

                    if status.is_server_error() && !is_last {
                        tracing::warn!("Server error {} (attempt {}/{})", status, attempt + 1, attempts);
                        tokio::time::sleep(retry_delay(attempt)).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(e) => {
                    tracing::debug!("Request failed (attempt {}/{}): {}", attempt + 1, attempts, e);
                    last_error = Some(e);
                    if !is_last {
                        tokio::time::sleep(retry_delay(attempt)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FeedError::Http("Max retries exceeded".into())))
    }

    /// Check status and decode the envelope
    async fn handle_response(&self, response: reqwest::Response) -> Result<Vec<TokenRecord>, FeedError> {
        let status = response.status();

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
                body.truncate(cut);
            }
            return Err(FeedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Http(format!("Failed to read response: {}", e)))?;
        decode_envelope(&body)
    }
}

#[async_trait]
impl TokenFeedPort for FourMemeClient {
    async fn fetch_tokens(&self, query: &TokenQuery) -> Result<Vec<TokenRecord>, FeedError> {
        self.fetch_page(query).await
    }
}
