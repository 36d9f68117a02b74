//! Text Layout
//!
//! Measures, truncates and pads text to an exact number of terminal columns.
//! Every function that takes a target width returns a string whose display
//! width equals that target exactly; table column boundaries rely on it.
//!
//! Input is NFC-normalized first so that decomposed sequences (base letter +
//! combining mark) measure the same as their precomposed form.

use unicode_normalization::UnicodeNormalization;

use super::width::{HeuristicWidth, WidthClass, WidthClassifier};

/// Marker appended to truncated text
pub const ELLIPSIS: &str = "...";

/// Column alignment within a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Width-aware layout engine over a pluggable classifier
#[derive(Debug, Clone, Default)]
pub struct TextLayout<C = HeuristicWidth> {
    classifier: C,
}

impl TextLayout<HeuristicWidth> {
    pub fn new() -> Self {
        Self { classifier: HeuristicWidth }
    }
}

impl<C: WidthClassifier> TextLayout<C> {
    /// Build a layout engine around a custom classifier
    pub fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    /// NFC-normalize text
    pub fn normalize(&self, text: &str) -> String {
        text.nfc().collect()
    }

    /// Number of terminal columns `text` occupies
    pub fn display_width(&self, text: &str) -> usize {
        text.nfc().map(|ch| self.classifier.columns(ch)).sum()
    }

    /// Fit `text` into exactly `max_width` columns.
    ///
    /// Text that already fits is right-padded. Longer text keeps as many
    /// leading code points as fit in `max_width - 3` and ends with `...`.
    /// When a wide character straddles the cut, the result is one column
    /// short and gets padded back; nothing is ever trimmed after the cut.
    /// Targets narrower than the ellipsis are filled with dots.
    pub fn truncate(&self, text: &str, max_width: usize) -> String {
        let input = self.normalize(text);
        let width = self.width_of_normalized(&input);
        if width <= max_width {
            return pad_right(input, max_width - width);
        }

        let ellipsis_width = ELLIPSIS.len();
        if max_width < ellipsis_width {
            return ".".repeat(max_width);
        }

        let target = max_width - ellipsis_width;
        let mut out = String::with_capacity(input.len());
        let mut used = 0usize;
        for ch in input.chars() {
            let add = self.classifier.columns(ch);
            if used + add > target {
                break;
            }
            out.push(ch);
            used += add;
        }
        out.push_str(ELLIPSIS);

        let result_width = used + ellipsis_width;
        pad_right(out, max_width.saturating_sub(result_width))
    }

    /// Left-align `text` in a cell of `width` columns
    pub fn pad_end(&self, text: &str, width: usize) -> String {
        let input = self.normalize(text);
        let w = self.width_of_normalized(&input);
        if w > width {
            return self.truncate(&input, width);
        }
        pad_right(input, width - w)
    }

    /// Right-align `text` in a cell of `width` columns.
    /// Overlong text is truncated like `pad_end` (kept from the left).
    pub fn pad_start(&self, text: &str, width: usize) -> String {
        let input = self.normalize(text);
        let w = self.width_of_normalized(&input);
        if w > width {
            return self.truncate(&input, width);
        }
        let mut out = " ".repeat(width - w);
        out.push_str(&input);
        out
    }

    /// Pad or truncate according to `align`
    pub fn fit(&self, text: &str, width: usize, align: Align) -> String {
        match align {
            Align::Left => self.pad_end(text, width),
            Align::Right => self.pad_start(text, width),
        }
    }

    /// Classification of a single code point
    pub fn classify(&self, ch: char) -> WidthClass {
        self.classifier.classify(ch)
    }

    fn width_of_normalized(&self, text: &str) -> usize {
        text.chars().map(|ch| self.classifier.columns(ch)).sum()
    }
}

fn pad_right(mut text: String, spaces: usize) -> String {
    text.extend(std::iter::repeat(' ').take(spaces));
    text
}
