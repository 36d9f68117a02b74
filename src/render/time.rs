//! Clock and relative-time formatting

use chrono::{Local, TimeZone};

use crate::domain::Locale;

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2520;
const MINUTES_IN_MONTH: i64 = 43200;
const MINUTES_IN_TWO_MONTHS: i64 = 86400;

/// Placeholder for unparseable timestamps
pub const UNKNOWN_TIME: &str = "-";

/// Local wall-clock time `HH:MM:SS` for an epoch-millisecond timestamp
pub fn format_clock(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(t) => t.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// Coarse distance between two instants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distance {
    LessThanMinute,
    Minutes(i64),
    AboutHours(i64),
    Days(i64),
    AboutMonths(i64),
    Months(i64),
    AboutYears(i64),
    OverYears(i64),
    AlmostYears(i64),
}

impl Distance {
    /// Bucket an absolute distance in milliseconds
    pub fn from_millis(diff_ms: i64) -> Self {
        let seconds = diff_ms.abs() as f64 / 1000.0;
        let minutes = (seconds / 60.0).round() as i64;

        if minutes < 1 {
            Distance::LessThanMinute
        } else if minutes < 45 {
            Distance::Minutes(minutes)
        } else if minutes < 90 {
            Distance::AboutHours(1)
        } else if minutes < MINUTES_IN_DAY {
            Distance::AboutHours((minutes as f64 / 60.0).round() as i64)
        } else if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
            Distance::Days(1)
        } else if minutes < MINUTES_IN_MONTH {
            Distance::Days((minutes as f64 / MINUTES_IN_DAY as f64).round() as i64)
        } else if minutes < MINUTES_IN_TWO_MONTHS {
            Distance::AboutMonths((minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64)
        } else {
            let months = minutes / MINUTES_IN_MONTH;
            if months < 12 {
                return Distance::Months((minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64);
            }
            let years = months / 12;
            match months % 12 {
                0..=2 => Distance::AboutYears(years),
                3..=8 => Distance::OverYears(years),
                _ => Distance::AlmostYears(years + 1),
            }
        }
    }

    fn phrase(self, locale: Locale) -> String {
        match locale {
            Locale::En => match self {
                Distance::LessThanMinute => "less than a minute".to_string(),
                Distance::Minutes(n) => plural(n, "minute", ""),
                Distance::AboutHours(n) => plural(n, "hour", "about "),
                Distance::Days(n) => plural(n, "day", ""),
                Distance::AboutMonths(n) => plural(n, "month", "about "),
                Distance::Months(n) => plural(n, "month", ""),
                Distance::AboutYears(n) => plural(n, "year", "about "),
                Distance::OverYears(n) => plural(n, "year", "over "),
                Distance::AlmostYears(n) => plural(n, "year", "almost "),
            },
            Locale::Zh => match self {
                Distance::LessThanMinute => "不到 1 分钟".to_string(),
                Distance::Minutes(n) => format!("{} 分钟", n),
                Distance::AboutHours(n) => format!("大约 {} 小时", n),
                Distance::Days(n) => format!("{} 天", n),
                Distance::AboutMonths(n) => format!("大约 {} 个月", n),
                Distance::Months(n) => format!("{} 个月", n),
                Distance::AboutYears(n) => format!("大约 {} 年", n),
                Distance::OverYears(n) => format!("超过 {} 年", n),
                Distance::AlmostYears(n) => format!("将近 {} 年", n),
            },
        }
    }
}

fn plural(n: i64, unit: &str, prefix: &str) -> String {
    if n == 1 {
        format!("{}1 {}", prefix, unit)
    } else {
        format!("{}{} {}s", prefix, n, unit)
    }
}

/// Relative time of `then_ms` as seen from `now_ms`: "3 minutes ago",
/// "in 2 days", "3 分钟前"
pub fn format_relative(then_ms: i64, now_ms: i64, locale: Locale) -> String {
    let diff = now_ms.saturating_sub(then_ms);
    let phrase = Distance::from_millis(diff).phrase(locale);
    match (locale, diff >= 0) {
        (Locale::En, true) => format!("{} ago", phrase),
        (Locale::En, false) => format!("in {}", phrase),
        (Locale::Zh, true) => format!("{}前", phrase),
        (Locale::Zh, false) => format!("{}内", phrase),
    }
}

/// Relative time for an optional timestamp, `-` when absent
pub fn format_relative_opt(then_ms: Option<i64>, now_ms: i64, locale: Locale) -> String {
    match then_ms {
        Some(t) => format_relative(t, now_ms, locale),
        None => UNKNOWN_TIME.to_string(),
    }
}
