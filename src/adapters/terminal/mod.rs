//! Terminal Adapter
//!
//! Crossterm implementation of the DisplayPort plus keyboard input mapping.

mod painter;
mod input;

pub use painter::{install_panic_hook, restore_terminal, tone_color, TerminalDisplay};
pub use input::{map_key, InputReader};
