//! Token listing records
//!
//! `TokenRecord` is the snapshot of one listing at fetch time. Metric fields
//! stay as the decimal strings the API delivers; the API is inconsistent
//! about quoting numbers, so both JSON strings and numbers are accepted.
//! Fields this crate does not use are kept in `extra` and survive a
//! round-trip through the event log.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Status label shown for newly detected listings
pub const NEW_STATUS: &str = "NEW";

/// Market metrics nested under `tokenPrice`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPrice {
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub increase: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub market_cap: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub trading_usd: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub day_increase: String,
    /// Bonding curve progress as a `[0, 1]` fraction
    #[serde(default, deserialize_with = "lenient_string")]
    pub progress: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub liquidity: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One listing as returned by the token query endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub short_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub network_code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub show_status: String,
    /// Creation time, epoch milliseconds
    #[serde(default, deserialize_with = "lenient_string")]
    pub create_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_price: TokenPrice,
    /// Set locally by novelty detection, never by the API
    #[serde(default)]
    pub is_new: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenRecord {
    /// Lowercase dedup key, `None` when the record has no address
    pub fn canonical_address(&self) -> Option<String> {
        let trimmed = self.address.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// Case-insensitive network tag comparison
    pub fn is_on_network(&self, network: &str) -> bool {
        self.network_code.trim().eq_ignore_ascii_case(network.trim())
    }

    /// `NEW` for fresh listings, otherwise the upstream status upper-cased
    pub fn status_label(&self) -> String {
        if self.is_new {
            return NEW_STATUS.to_string();
        }
        let status = if self.show_status.is_empty() {
            &self.status
        } else {
            &self.show_status
        };
        status.to_uppercase()
    }

    /// Creation time as epoch milliseconds, if it parses
    pub fn created_at_ms(&self) -> Option<i64> {
        let raw = self.create_date.trim();
        raw.parse::<i64>()
            .ok()
            .or_else(|| raw.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v as i64))
    }

    /// Copy of this record with the novelty flag set
    pub fn marked(&self, is_new: bool) -> Self {
        Self {
            is_new,
            ..self.clone()
        }
    }
}

/// A listing observed for the first time, with its detection time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTokenEvent {
    /// The record as displayed when detected, with `is_new` set
    pub token: TokenRecord,
    /// Detection time, epoch milliseconds
    pub timestamp: i64,
}

impl NewTokenEvent {
    pub fn new(token: TokenRecord, timestamp: i64) -> Self {
        Self { token, timestamp }
    }
}

/// Accept a JSON string, number or bool as a string; null and absent become empty
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
