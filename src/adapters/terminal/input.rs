//! Keyboard input
//!
//! Key events are read on a dedicated blocking thread and forwarded as
//! `InputAction`s, so terminal reads never stall the async runtime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::application::view::InputAction;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Map a key press to a dashboard action
pub fn map_key(key: KeyEvent) -> Option<InputAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(InputAction::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputAction::Quit),
        KeyCode::Left => Some(InputAction::SortPrev),
        KeyCode::Right => Some(InputAction::SortNext),
        KeyCode::Up => Some(InputAction::FilterPrev),
        KeyCode::Down => Some(InputAction::FilterNext),
        KeyCode::Enter => Some(InputAction::Confirm),
        _ => None,
    }
}

/// Background key reader. Stops when dropped or when the receiver closes.
pub struct InputReader {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputReader {
    pub fn spawn(tx: mpsc::Sender<InputAction>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();

        let handle = std::thread::spawn(move || {
            while !flag.load(Ordering::SeqCst) {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        tracing::warn!("Input poll failed: {}", e);
                        break;
                    }
                }
                let action = match event::read() {
                    Ok(Event::Key(key)) => map_key(key),
                    Ok(_) => None,
                    Err(e) => {
                        tracing::warn!("Input read failed: {}", e);
                        break;
                    }
                };
                if let Some(action) = action {
                    if tx.blocking_send(action).is_err() {
                        break;
                    }
                }
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(map_key(key(KeyCode::Left)), Some(InputAction::SortPrev));
        assert_eq!(map_key(key(KeyCode::Right)), Some(InputAction::SortNext));
        assert_eq!(map_key(key(KeyCode::Up)), Some(InputAction::FilterPrev));
        assert_eq!(map_key(key(KeyCode::Down)), Some(InputAction::FilterNext));
        assert_eq!(map_key(key(KeyCode::Enter)), Some(InputAction::Confirm));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_key(key(KeyCode::Char('q'))), Some(InputAction::Quit));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(InputAction::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Some(InputAction::Quit));
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(map_key(key(KeyCode::Char('c'))), None);
        assert_eq!(map_key(key(KeyCode::Tab)), None);
    }

    #[test]
    fn test_release_ignored() {
        let mut release = key(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release), None);
    }
}
