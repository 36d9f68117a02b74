//! Query modes and display locale
//!
//! Sort and filter modes map one-to-one onto listing API query values.
//! Both cycle with wrap-around for keyboard selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModeParseError {
    #[error("Unknown sort mode: {0}")]
    UnknownSort(String),

    #[error("Unknown filter mode: {0}")]
    UnknownFilter(String),

    #[error("Unknown locale: {0}")]
    UnknownLocale(String),
}

/// Listing order requested from the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    Hot,
    TimeDesc,
    OrderDesc,
    ProgressDesc,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Hot,
        SortMode::TimeDesc,
        SortMode::OrderDesc,
        SortMode::ProgressDesc,
    ];

    /// Value sent as the `orderBy` query parameter
    pub fn as_query(self) -> &'static str {
        match self {
            SortMode::Hot => "Hot",
            SortMode::TimeDesc => "TimeDesc",
            SortMode::OrderDesc => "OrderDesc",
            SortMode::ProgressDesc => "ProgressDesc",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for SortMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_query().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModeParseError::UnknownSort(s.to_string()))
    }
}

/// Name filter requested from the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Chinese,
    Bsc,
}

impl FilterMode {
    pub const ALL: [FilterMode; 3] = [FilterMode::All, FilterMode::Chinese, FilterMode::Bsc];

    /// Mode identifier as used in config and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Chinese => "chinese",
            FilterMode::Bsc => "bsc",
        }
    }

    /// Value sent as the `tokenName` query parameter
    pub fn token_name(self) -> &'static str {
        match self {
            FilterMode::All => "",
            FilterMode::Chinese => "chinese",
            FilterMode::Bsc => "bsc",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModeParseError::UnknownFilter(s.to_string()))
    }
}

/// Display language for every label on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl FromStr for Locale {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "cn" => Ok(Locale::Zh),
            "en" | "en-us" => Ok(Locale::En),
            _ => Err(ModeParseError::UnknownLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Zh => f.write_str("zh"),
            Locale::En => f.write_str("en"),
        }
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: usize) -> T {
    let idx = all.iter().position(|m| *m == current).unwrap_or(0);
    all[(idx + step) % all.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_cycle_wraps() {
        assert_eq!(SortMode::Hot.next(), SortMode::TimeDesc);
        assert_eq!(SortMode::ProgressDesc.next(), SortMode::Hot);
        assert_eq!(SortMode::Hot.prev(), SortMode::ProgressDesc);
        assert_eq!(SortMode::TimeDesc.prev(), SortMode::Hot);
    }

    #[test]
    fn test_filter_cycle_wraps() {
        assert_eq!(FilterMode::All.next(), FilterMode::Chinese);
        assert_eq!(FilterMode::Bsc.next(), FilterMode::All);
        assert_eq!(FilterMode::All.prev(), FilterMode::Bsc);
    }

    #[test]
    fn test_query_values() {
        assert_eq!(SortMode::OrderDesc.as_query(), "OrderDesc");
        assert_eq!(FilterMode::All.token_name(), "");
        assert_eq!(FilterMode::Chinese.token_name(), "chinese");
        assert_eq!(FilterMode::Bsc.token_name(), "bsc");
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!("hot".parse::<SortMode>().unwrap(), SortMode::Hot);
        assert_eq!("ProgressDesc".parse::<SortMode>().unwrap(), SortMode::ProgressDesc);
        assert_eq!("BSC".parse::<FilterMode>().unwrap(), FilterMode::Bsc);
        assert!("newest".parse::<SortMode>().is_err());
        assert!("solana".parse::<FilterMode>().is_err());
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!("zh".parse::<Locale>().unwrap(), Locale::Zh);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&SortMode::TimeDesc).unwrap(), "\"TimeDesc\"");
        assert_eq!(serde_json::to_string(&FilterMode::Chinese).unwrap(), "\"chinese\"");
        assert_eq!(serde_json::from_str::<Locale>("\"en\"").unwrap(), Locale::En);
    }
}
