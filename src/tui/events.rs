//! Terminal input handling for the TUI.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input.
    Key(KeyEvent),
    /// No input within the tick rate; used to redraw relative times.
    Tick,
    /// Terminal resized.
    Resize(u16, u16),
}

/// Reads terminal events on a blocking thread and forwards them over a channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // crossterm's poll/read block, so keep them off the async workers.
        tokio::task::spawn_blocking(move || loop {
            let event = match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    // Windows reports both press and release.
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                    Ok(_) => continue,
                    Err(_) => break,
                },
                Ok(false) => Event::Tick,
                Err(_) => break,
            };
            if tx.send(event).is_err() {
                break;
            }
        });

        Self { rx }
    }

    /// Receive the next event.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Check if a key event is an unmodified character.
pub fn is_char(event: &KeyEvent, c: char) -> bool {
    event.code == KeyCode::Char(c)
        && (event.modifiers == KeyModifiers::NONE || event.modifiers == KeyModifiers::SHIFT)
}

/// Check if a key event should quit (q, Esc or Ctrl+C).
pub fn is_quit(event: &KeyEvent) -> bool {
    (event.code == KeyCode::Char('c') && event.modifiers == KeyModifiers::CONTROL)
        || is_char(event, 'q')
        || event.code == KeyCode::Esc
}

/// Check if a key event requests a manual refresh.
pub fn is_refresh(event: &KeyEvent) -> bool {
    is_char(event, 'r') || event.code == KeyCode::F(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_refresh_keys() {
        assert!(is_refresh(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE)));
        assert!(is_refresh(&KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE)));
        assert!(!is_refresh(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)));
    }
}
