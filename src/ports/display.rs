use thiserror::Error;

use crate::render::frame::Frame;

/// Display backend error type
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Terminal I/O error: {0}")]
    Io(String),

    #[error("Terminal setup failed: {0}")]
    Setup(String),
}

impl From<std::io::Error> for DisplayError {
    fn from(e: std::io::Error) -> Self {
        DisplayError::Io(e.to_string())
    }
}

/// Paints finished frames. Lines arrive already laid out to their final
/// width; a backend only applies colours.
pub trait DisplayPort: Send {
    fn paint(&mut self, frame: &Frame) -> Result<(), DisplayError>;
}
