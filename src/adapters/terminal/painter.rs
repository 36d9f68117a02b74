//! Crossterm frame painter
//!
//! Owns the terminal while the dashboard runs: alternate screen, raw mode,
//! hidden cursor. Frames are painted line by line and only lines that
//! changed since the previous frame are rewritten.

use std::io::{self, stdout, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
    QueueableCommand,
};

use crate::ports::display::{DisplayError, DisplayPort};
use crate::render::frame::{Frame, Line, Tone};

/// Terminal colour for a semantic tone
pub fn tone_color(tone: Tone) -> Option<Color> {
    match tone {
        Tone::Default => None,
        Tone::Title => Some(Color::Cyan),
        Tone::Muted => Some(Color::DarkGrey),
        Tone::Link => Some(Color::Blue),
        Tone::Notice => Some(Color::Yellow),
        Tone::Positive => Some(Color::Green),
        Tone::Negative => Some(Color::Red),
    }
}

/// Put the terminal back into cooked mode on the main screen
pub fn restore_terminal() -> io::Result<()> {
    execute!(stdout(), Show, EnableLineWrap, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()
}

/// Install a panic hook that restores the terminal before the default
/// hook prints the panic message
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));
}

pub struct TerminalDisplay {
    out: Stdout,
    prev_lines: Vec<Line>,
    size: (u16, u16),
    active: bool,
}

impl TerminalDisplay {
    /// Enter the alternate screen and raw mode
    pub fn enter(title: &str) -> Result<Self, DisplayError> {
        let size = terminal::size().map_err(|e| DisplayError::Setup(e.to_string()))?;
        execute!(
            stdout(),
            EnterAlternateScreen,
            DisableLineWrap,
            Hide,
            Clear(ClearType::All),
            SetTitle(title)
        )
        .map_err(|e| DisplayError::Setup(e.to_string()))?;
        terminal::enable_raw_mode().map_err(|e| DisplayError::Setup(e.to_string()))?;

        Ok(Self {
            out: stdout(),
            prev_lines: Vec::new(),
            size,
            active: true,
        })
    }

    /// Restore the terminal. Called automatically on drop.
    pub fn leave(&mut self) -> Result<(), DisplayError> {
        if self.active {
            self.active = false;
            restore_terminal()?;
        }
        Ok(())
    }

    fn write_line(&mut self, row: u16, line: &Line) -> io::Result<()> {
        self.out.queue(MoveTo(0, row))?;
        for span in &line.spans {
            if let Some(color) = tone_color(span.style.tone) {
                self.out.queue(SetForegroundColor(color))?;
            }
            if span.style.bold {
                self.out.queue(SetAttribute(Attribute::Bold))?;
            }
            self.out.queue(Print(&span.text))?;
            self.out.queue(SetAttribute(Attribute::Reset))?;
            self.out.queue(ResetColor)?;
        }
        self.out.queue(Clear(ClearType::UntilNewLine))?;
        Ok(())
    }
}

impl DisplayPort for TerminalDisplay {
    fn paint(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        let size = terminal::size().unwrap_or(self.size);
        if size != self.size {
            self.size = size;
            self.prev_lines.clear();
            self.out.queue(Clear(ClearType::All))?;
        }

        let height = self.size.1 as usize;
        let visible = frame.lines.len().min(height);

        for (row, line) in frame.lines.iter().take(visible).enumerate() {
            if self.prev_lines.get(row) != Some(line) {
                self.write_line(row as u16, line)?;
            }
        }
        for row in visible..self.prev_lines.len().min(height) {
            self.out.queue(MoveTo(0, row as u16))?;
            self.out.queue(Clear(ClearType::CurrentLine))?;
        }

        self.out.flush()?;
        self.prev_lines = frame.lines[..visible].to_vec();
        Ok(())
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_colors() {
        assert_eq!(tone_color(Tone::Default), None);
        assert_eq!(tone_color(Tone::Positive), Some(Color::Green));
        assert_eq!(tone_color(Tone::Notice), Some(Color::Yellow));
        assert_eq!(tone_color(Tone::Title), Some(Color::Cyan));
    }
}
