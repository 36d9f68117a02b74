//! Width Classification
//!
//! Maps a single code point to the number of terminal cells it occupies.
//! `HeuristicWidth` is the default: a small range table covering CJK,
//! Hangul, fullwidth forms and the main emoji block. It is an approximation
//! of terminal behaviour, not a full East-Asian-Width table: some symbol
//! ranges outside U+1F300..U+1FAFF report as narrow.
//!
//! `UnicodeWidth` wraps the `unicode-width` tables and can be plugged into
//! `TextLayout` wherever the heuristic is not accurate enough.

use unicode_width::UnicodeWidthChar;

/// Column class of a single code point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthClass {
    /// Occupies no cell (combining marks, joiners, variation selectors)
    Zero,
    /// One cell
    Narrow,
    /// Two cells
    Wide,
}

impl WidthClass {
    /// Number of terminal columns for this class
    pub fn columns(self) -> usize {
        match self {
            WidthClass::Zero => 0,
            WidthClass::Narrow => 1,
            WidthClass::Wide => 2,
        }
    }
}

/// Pluggable code point classifier used by `TextLayout`
pub trait WidthClassifier: Send + Sync {
    fn classify(&self, ch: char) -> WidthClass;

    /// Column width of a single code point
    fn columns(&self, ch: char) -> usize {
        self.classify(ch).columns()
    }
}

/// Range-table classifier matching common terminal rendering
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicWidth;

impl WidthClassifier for HeuristicWidth {
    fn classify(&self, ch: char) -> WidthClass {
        let cp = ch as u32;
        if is_zero_width(cp) {
            WidthClass::Zero
        } else if is_wide(cp) {
            WidthClass::Wide
        } else {
            WidthClass::Narrow
        }
    }
}

/// Classifier backed by the `unicode-width` East-Asian-Width tables
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWidth;

impl WidthClassifier for UnicodeWidth {
    fn classify(&self, ch: char) -> WidthClass {
        match UnicodeWidthChar::width(ch) {
            None | Some(0) => WidthClass::Zero,
            Some(1) => WidthClass::Narrow,
            Some(_) => WidthClass::Wide,
        }
    }
}

fn is_zero_width(cp: u32) -> bool {
    matches!(
        cp,
        0xFE00..=0xFE0F        // variation selectors
            | 0x200C | 0x200D  // ZWNJ / ZWJ
            | 0x0300..=0x036F  // combining diacritical marks
            | 0x1AB0..=0x1AFF
            | 0x1DC0..=0x1DFF
            | 0x20D0..=0x20FF
            | 0xFE20..=0xFE2F
    )
}

fn is_wide(cp: u32) -> bool {
    if cp >= 0x1100
        && (cp <= 0x115F // Hangul Jamo
            || cp == 0x2329
            || cp == 0x232A
            || ((0x2E80..=0xA4CF).contains(&cp) && cp != 0x303F) // CJK radicals .. Yi
            || (0xAC00..=0xD7A3).contains(&cp) // Hangul syllables
            || (0xF900..=0xFAFF).contains(&cp) // CJK compatibility ideographs
            || (0xFE10..=0xFE19).contains(&cp) // vertical forms
            || (0xFE30..=0xFE6F).contains(&cp) // CJK compatibility forms
            || (0xFF00..=0xFF60).contains(&cp) // fullwidth forms
            || (0xFFE0..=0xFFE6).contains(&cp))
    {
        return true;
    }
    (0x1F300..=0x1FAFF).contains(&cp)
}
