//! Render Layer - Unicode-aware fixed-width text output
//!
//! - `width`: per-code-point column classification (pluggable)
//! - `layout`: measure, truncate and pad to exact column widths
//! - `numeric`: price, magnitude, percentage and progress formatting
//! - `time`: clock and relative-time formatting
//! - `table`: listing table and event log lines
//! - `screen`: full frame composition
//! - `frame`: styled line model handed to display backends

pub mod width;
pub mod layout;
pub mod numeric;
pub mod time;
pub mod labels;
pub mod frame;
pub mod table;
pub mod screen;

pub use width::{HeuristicWidth, UnicodeWidth, WidthClass, WidthClassifier};
pub use layout::{Align, TextLayout, ELLIPSIS};
pub use numeric::{format_magnitude, format_percentage, format_price, format_progress, to_plain_decimal};
pub use frame::{Frame, Line, Span, Style, Tone};
pub use labels::Labels;
pub use table::{Column, ColumnKey, TableRenderer, COLUMNS, SEPARATOR};
pub use screen::ScreenInput;
