use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{FilterMode, SortMode, TokenRecord};

/// Listing fetch error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API error {code}: {msg}")]
    Api { code: i64, msg: String },

    #[error("Response parsing error: {0}")]
    Parse(String),
}

/// Parameters for one listing query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenQuery {
    pub sort: SortMode,
    pub filter: FilterMode,
    pub page_index: u32,
    pub page_size: u32,
}

impl TokenQuery {
    /// First page with the given modes
    pub fn first_page(sort: SortMode, filter: FilterMode, page_size: u32) -> Self {
        Self {
            sort,
            filter,
            page_index: 1,
            page_size,
        }
    }
}

/// Remote listing source
#[async_trait]
pub trait TokenFeedPort: Send + Sync {
    /// Fetch one page of listings in API order
    async fn fetch_tokens(&self, query: &TokenQuery) -> Result<Vec<TokenRecord>, FeedError>;
}
