//! Wire types for the four.meme token query endpoint

use serde::Deserialize;
use serde_json::Value;

use crate::domain::TokenRecord;
use crate::ports::token_feed::{FeedError, TokenQuery};

/// Response envelope: `code == 0` means success
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub code: Value,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<TokenRecord>>,
}

impl ApiEnvelope {
    /// Numeric status code; quoted numbers are accepted, anything else is -1
    pub fn code(&self) -> i64 {
        match &self.code {
            Value::Number(n) => n.as_i64().unwrap_or(-1),
            Value::String(s) => s.trim().parse().unwrap_or(-1),
            _ => -1,
        }
    }
}

/// Query string for a listing request, fixed flags included
pub fn query_pairs(query: &TokenQuery) -> Vec<(&'static str, String)> {
    vec![
        ("orderBy", query.sort.as_query().to_string()),
        ("tokenName", query.filter.token_name().to_string()),
        ("listedPancake", "false".to_string()),
        ("pageIndex", query.page_index.to_string()),
        ("pageSize", query.page_size.to_string()),
        ("symbol", String::new()),
        ("labels", String::new()),
    ]
}

/// Decode a response body into listings, enforcing `code == 0`.
/// A successful envelope without `data` is an empty page.
pub fn decode_envelope(body: &str) -> Result<Vec<TokenRecord>, FeedError> {
    let envelope: ApiEnvelope =
        serde_json::from_str(body).map_err(|e| FeedError::Parse(e.to_string()))?;

    let code = envelope.code();
    if code != 0 {
        return Err(FeedError::Api {
            code,
            msg: envelope.msg.unwrap_or_default(),
        });
    }
    Ok(envelope.data.unwrap_or_default())
}
