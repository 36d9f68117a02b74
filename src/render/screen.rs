//! Full-screen composition: header, mode controls, table and event log

use crate::domain::{FilterMode, NewTokenEvent, SortMode, TokenRecord};

use super::frame::{Frame, Line, Span, Style, Tone};
use super::table::{sanitize, TableRenderer};
use super::time::format_clock;
use super::width::WidthClassifier;

/// Everything needed to draw one frame
#[derive(Debug, Clone)]
pub struct ScreenInput<'a> {
    pub tokens: &'a [TokenRecord],
    pub event_log: &'a [NewTokenEvent],
    pub last_update_ms: Option<i64>,
    pub has_loaded_once: bool,
    pub is_loading: bool,
    pub transport_failures: u64,
    pub last_error: Option<&'a str>,
    pub active_sort: SortMode,
    pub selected_sort: SortMode,
    pub active_filter: FilterMode,
    pub selected_filter: FilterMode,
    pub now_ms: i64,
}

/// Style for a mode option: selected is green, active is bold
fn option_style(selected: bool, active: bool) -> Style {
    let style = if selected {
        Style::tone(Tone::Positive)
    } else {
        Style::default()
    };
    if active {
        style.bold()
    } else {
        style
    }
}

impl<C: WidthClassifier> TableRenderer<C> {
    pub fn render_screen(&self, input: &ScreenInput<'_>) -> Frame {
        let labels = self.labels();
        let mut lines = Vec::new();

        lines.push(Line::styled(labels.title, Style::tone(Tone::Title).bold()));
        lines.push(self.status_line(input));
        lines.push(Line::blank());

        let sorts = SortMode::ALL.map(|mode| {
            (
                labels.sort_mode(mode),
                option_style(mode == input.selected_sort, mode == input.active_sort),
            )
        });
        lines.push(controls_line(labels.sort, &sorts));

        let filters = FilterMode::ALL.map(|mode| {
            (
                labels.filter_mode(mode),
                option_style(mode == input.selected_filter, mode == input.active_filter),
            )
        });
        lines.push(controls_line(labels.filter, &filters));
        lines.push(Line::styled(labels.hint, Style::tone(Tone::Muted)));
        lines.push(Line::blank());

        if !input.has_loaded_once && input.is_loading {
            lines.push(Line::styled(labels.loading, Style::tone(Tone::Notice)));
        }

        lines.extend(self.table_lines(input.tokens, input.now_ms));

        let log = self.event_log_lines(input.event_log);
        if !log.is_empty() {
            lines.push(Line::blank());
            lines.extend(log);
        }

        Frame::new(lines)
    }

    fn status_line(&self, input: &ScreenInput<'_>) -> Line {
        let labels = self.labels();
        let clock = input
            .last_update_ms
            .map(format_clock)
            .unwrap_or_else(|| labels.never.to_string());

        let mut parts = vec![Span::styled(
            format!("{}{}", labels.last_update, clock),
            Style::tone(Tone::Notice),
        )];
        if input.transport_failures > 0 {
            let negative = Style::tone(Tone::Negative);
            parts.push(Span::plain(" | "));
            parts.push(Span::styled(
                format!("{}{}", labels.failures, input.transport_failures),
                negative,
            ));
            if let Some(err) = input.last_error {
                parts.push(Span::styled(format!(" ({})", sanitize(err)), negative));
            }
        }
        Line::new(parts)
    }
}

fn controls_line(title: &str, options: &[(&'static str, Style)]) -> Line {
    let mut parts = vec![Span::styled(title, Style::default().bold())];
    for (i, (label, style)) in options.iter().enumerate() {
        if i > 0 {
            parts.push(Span::plain(" | "));
        }
        parts.push(Span::styled(*label, *style));
    }
    Line::new(parts)
}
