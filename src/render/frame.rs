//! Styled line model handed to the display backend
//!
//! The renderer produces finished, fixed-width text; backends only map
//! `Tone` and `bold` onto their own colour scheme.

/// Semantic colour of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Default,
    Title,
    Muted,
    Link,
    Notice,
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub tone: Tone,
    pub bold: bool,
}

impl Style {
    pub fn tone(tone: Tone) -> Self {
        Self { tone, bold: false }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// One terminal line made of styled spans
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    /// Single-span line
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            spans: vec![Span::styled(text, style)],
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, Style::default())
    }

    /// Concatenated text without styling
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Full screen contents, top to bottom
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub lines: Vec<Line>,
}

impl Frame {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Plain text of every line joined with newlines
    pub fn to_plain_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_text_concatenates_spans() {
        let line = Line::new(vec![
            Span::plain("a "),
            Span::styled("b", Style::tone(Tone::Positive).bold()),
        ]);
        assert_eq!(line.text(), "a b");
        assert!(line.spans[1].style.bold);
    }

    #[test]
    fn test_frame_plain_text() {
        let frame = Frame::new(vec![Line::plain("one"), Line::blank(), Line::plain("two")]);
        assert_eq!(frame.to_plain_text(), "one\n\ntwo");
    }
}
