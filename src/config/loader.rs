//! Configuration Loader
//!
//! Loads and validates configuration from a TOML file. Every field has a
//! default, so a partial file (or none at all) is a valid configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::adapters::fourmeme::{FourMemeConfig, DEFAULT_API_URL};
use crate::adapters::storage::{JsonStateStore, DEFAULT_EVENT_LOG_FILE, DEFAULT_SEEN_FILE};
use crate::application::RefreshConfig;
use crate::domain::{FilterMode, Locale, SortMode, DEFAULT_MAX_LOG_ITEMS};
use crate::render::table::ADDRESS_PLACEHOLDER;

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "config/meme-radar.toml";

/// Shortest allowed refresh interval
pub const MIN_INTERVAL_MS: u64 = 250;

/// Largest page the listing API accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Most retries allowed after the first request
pub const MAX_RETRIES: u32 = 10;

/// Main configuration structure matching meme-radar.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSection,
    pub refresh: RefreshSection,
    pub display: DisplaySection,
    pub storage: StorageSection,
    pub logging: LoggingSection,
}

/// Listing API section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Token query endpoint
    pub base_url: String,
    /// Listings per request (1-100)
    pub page_size: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after the first attempt on 429/5xx
    pub max_retries: u32,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            page_size: 30,
            timeout_secs: 10,
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshSection {
    /// Time between refresh cycles
    pub interval_ms: u64,
    /// Only listings with this network tag are shown
    pub network: String,
}

impl Default for RefreshSection {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            network: "BSC".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub default_sort: SortMode,
    pub default_filter: FilterMode,
    pub locale: Locale,
    /// Event log link, `{address}` is replaced by the token address
    pub trade_url_template: String,
    /// Repaint check interval
    pub frame_interval_ms: u64,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            default_sort: SortMode::Hot,
            default_filter: FilterMode::All,
            locale: Locale::Zh,
            trade_url_template: "https://web3.binance.com/zh-CN/token/bsc/{address}".to_string(),
            frame_interval_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Directory holding the state files (`~` is expanded)
    pub data_dir: String,
    pub seen_file: String,
    pub event_log_file: String,
    /// Event log cap
    pub max_log_items: usize,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            seen_file: DEFAULT_SEEN_FILE.to_string(),
            event_log_file: DEFAULT_EVENT_LOG_FILE.to_string(),
            max_log_items: DEFAULT_MAX_LOG_ITEMS,
        }
    }
}

impl StorageSection {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir).into_owned())
    }

    pub fn store(&self) -> JsonStateStore {
        JsonStateStore::in_dir(&self.data_dir(), &self.seen_file, &self.event_log_file)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Log file used while the dashboard owns the terminal
    pub log_file: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: "logs/meme-radar.log".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration, falling back to defaults when the file is absent,
/// then apply environment overrides and validate
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        tracing::warn!("Config file {} not found, using defaults", path.display());
        Config::default()
    };
    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

fn parse_override<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::ValidationError(format!("{}={:?}: {}", key, value, e)))
}

impl Config {
    /// Apply environment overrides. `lookup` returns the variable's value
    /// if set; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("REFRESH_INTERVAL") {
            self.refresh.interval_ms = parse_override("REFRESH_INTERVAL", &v)?;
        }
        if let Some(v) = get("PAGE_SIZE") {
            self.api.page_size = parse_override("PAGE_SIZE", &v)?;
        }
        if let Some(v) = get("DEFAULT_SORT") {
            self.display.default_sort = parse_override("DEFAULT_SORT", &v)?;
        }
        if let Some(v) = get("DEFAULT_FILTER") {
            self.display.default_filter = parse_override("DEFAULT_FILTER", &v)?;
        }
        if let Some(v) = get("MEME_RADAR_API_URL") {
            self.api.base_url = v.trim().to_string();
        }
        Ok(())
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "base_url cannot be empty".to_string(),
            ));
        }

        if self.api.page_size == 0 || self.api.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "page_size must be 1-{}, got {}",
                MAX_PAGE_SIZE, self.api.page_size
            )));
        }

        if self.api.max_retries > MAX_RETRIES {
            return Err(ConfigError::ValidationError(format!(
                "max_retries must be <= {}, got {}",
                MAX_RETRIES, self.api.max_retries
            )));
        }

        if self.refresh.interval_ms < MIN_INTERVAL_MS {
            return Err(ConfigError::ValidationError(format!(
                "interval_ms must be >= {}, got {}",
                MIN_INTERVAL_MS, self.refresh.interval_ms
            )));
        }

        if self.refresh.network.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "network cannot be empty".to_string(),
            ));
        }

        if !self.display.trade_url_template.contains(ADDRESS_PLACEHOLDER) {
            return Err(ConfigError::ValidationError(format!(
                "trade_url_template must contain {}",
                ADDRESS_PLACEHOLDER
            )));
        }

        if self.display.frame_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "frame_interval_ms must be > 0".to_string(),
            ));
        }

        if self.storage.max_log_items == 0 {
            return Err(ConfigError::ValidationError(
                "max_log_items must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn api_client_config(&self) -> FourMemeConfig {
        FourMemeConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
            max_retries: self.api.max_retries,
        }
    }

    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            interval: Duration::from_millis(self.refresh.interval_ms),
            network: self.refresh.network.clone(),
            page_size: self.api.page_size,
            max_log_items: self.storage.max_log_items,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.display.frame_interval_ms)
    }
}
