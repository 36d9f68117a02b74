//! Table Rendering
//!
//! Lays out listing rows into fixed-width columns joined by `" | "`. Every
//! row, the header included, is exactly `row_width()` columns wide whatever
//! mix of ASCII, CJK and emoji the cells contain.

use crate::domain::{Locale, NewTokenEvent, TokenRecord};

use super::frame::{Line, Style, Tone};
use super::labels::Labels;
use super::layout::{Align, TextLayout};
use super::numeric::{format_magnitude, format_percentage, format_price, format_progress};
use super::time::{format_clock, format_relative_opt};
use super::width::{HeuristicWidth, WidthClassifier};

/// Column separator
pub const SEPARATOR: &str = " | ";

/// Horizontal rule character under the header
pub const RULE_CHAR: char = '─';

/// Placeholder in trade URL templates
pub const ADDRESS_PLACEHOLDER: &str = "{address}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    Name,
    Symbol,
    Price,
    MarketCap,
    Volume,
    Progress,
    Change,
    Created,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: ColumnKey,
    pub width: usize,
    pub align: Align,
}

const fn col(key: ColumnKey, width: usize, align: Align) -> Column {
    Column { key, width, align }
}

/// Default column set, in header order
pub const COLUMNS: [Column; 9] = [
    col(ColumnKey::Name, 18, Align::Left),
    col(ColumnKey::Symbol, 8, Align::Left),
    col(ColumnKey::Price, 12, Align::Right),
    col(ColumnKey::MarketCap, 12, Align::Right),
    col(ColumnKey::Volume, 12, Align::Right),
    col(ColumnKey::Progress, 10, Align::Right),
    col(ColumnKey::Change, 10, Align::Right),
    col(ColumnKey::Created, 15, Align::Left),
    col(ColumnKey::Status, 8, Align::Left),
];

/// Replace control characters with spaces so upstream text cannot move
/// the cursor or break a row
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

pub struct TableRenderer<C = HeuristicWidth> {
    layout: TextLayout<C>,
    columns: Vec<Column>,
    locale: Locale,
    trade_url_template: String,
}

impl TableRenderer<HeuristicWidth> {
    pub fn new(locale: Locale, trade_url_template: impl Into<String>) -> Self {
        Self::with_layout(TextLayout::new(), locale, trade_url_template)
    }
}

impl<C: WidthClassifier> TableRenderer<C> {
    pub fn with_layout(layout: TextLayout<C>, locale: Locale, trade_url_template: impl Into<String>) -> Self {
        Self {
            layout,
            columns: COLUMNS.to_vec(),
            locale,
            trade_url_template: trade_url_template.into(),
        }
    }

    pub fn layout(&self) -> &TextLayout<C> {
        &self.layout
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn labels(&self) -> &'static Labels {
        Labels::for_locale(self.locale)
    }

    /// Total row width: column widths plus separators
    pub fn row_width(&self) -> usize {
        let cells: usize = self.columns.iter().map(|c| c.width).sum();
        cells + SEPARATOR.len() * self.columns.len().saturating_sub(1)
    }

    pub fn header_line(&self) -> Line {
        let headers = self.labels().headers;
        let cells = self.columns.iter().enumerate().map(|(i, column)| {
            let title = headers.get(i).copied().unwrap_or_default();
            self.layout.fit(title, column.width, column.align)
        });
        Line::styled(join_cells(cells), Style::default().bold())
    }

    pub fn rule_line(&self) -> Line {
        let rule: String = std::iter::repeat(RULE_CHAR).take(self.row_width()).collect();
        Line::styled(rule, Style::tone(Tone::Muted))
    }

    /// One fixed-width row. New listings are highlighted.
    pub fn token_row(&self, token: &TokenRecord, now_ms: i64) -> Line {
        let cells = self.columns.iter().map(|column| {
            let text = sanitize(&self.cell_text(column.key, token, now_ms));
            self.layout.fit(&text, column.width, column.align)
        });
        let style = if token.is_new {
            Style::tone(Tone::Positive)
        } else {
            Style::default()
        };
        Line::styled(join_cells(cells), style)
    }

    /// Header, rule, then one row per token (or an empty-state line)
    pub fn table_lines(&self, tokens: &[TokenRecord], now_ms: i64) -> Vec<Line> {
        let mut lines = Vec::with_capacity(tokens.len() + 2);
        lines.push(self.header_line());
        lines.push(self.rule_line());
        if tokens.is_empty() {
            lines.push(Line::styled(self.labels().empty, Style::tone(Tone::Muted)));
        } else {
            lines.extend(tokens.iter().map(|t| self.token_row(t, now_ms)));
        }
        lines
    }

    /// Event log section, newest first. Empty when there are no events.
    pub fn event_log_lines(&self, events: &[NewTokenEvent]) -> Vec<Line> {
        if events.is_empty() {
            return Vec::new();
        }
        let positive = Style::tone(Tone::Positive);
        let mut lines = Vec::with_capacity(events.len() + 1);
        lines.push(Line::styled(self.labels().log_heading(events.len()), positive.bold()));
        lines.extend(
            events
                .iter()
                .rev()
                .map(|event| Line::styled(self.event_line(event), positive)),
        );
        lines
    }

    /// `[HH:MM:SS] name (symbol) address → Trade: url`
    pub fn event_line(&self, event: &NewTokenEvent) -> String {
        let token = &event.token;
        sanitize(&format!(
            "[{}] {} ({}) {} → {}{}",
            format_clock(event.timestamp),
            display_name(token),
            token.symbol,
            token.address,
            self.labels().trade,
            self.trade_url(&token.address)
        ))
    }

    pub fn trade_url(&self, address: &str) -> String {
        self.trade_url_template.replace(ADDRESS_PLACEHOLDER, address)
    }

    fn cell_text(&self, key: ColumnKey, token: &TokenRecord, now_ms: i64) -> String {
        let price = &token.token_price;
        match key {
            ColumnKey::Name => display_name(token).to_string(),
            ColumnKey::Symbol => token.symbol.clone(),
            ColumnKey::Price => format_price(&price.price),
            ColumnKey::MarketCap => format_magnitude(&price.market_cap),
            ColumnKey::Volume => format_magnitude(&price.trading_usd),
            ColumnKey::Progress => format_progress(&price.progress),
            ColumnKey::Change => format_percentage(&price.day_increase),
            ColumnKey::Created => format_relative_opt(token.created_at_ms(), now_ms, self.locale),
            ColumnKey::Status => token.status_label(),
        }
    }
}

fn display_name(token: &TokenRecord) -> &str {
    if token.name.trim().is_empty() {
        &token.short_name
    } else {
        &token.name
    }
}

fn join_cells(cells: impl Iterator<Item = String>) -> String {
    cells.collect::<Vec<_>>().join(SEPARATOR)
}
