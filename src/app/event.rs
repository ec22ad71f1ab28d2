//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and reads them on a blocking
//! worker that forwards them over a channel, so the main loop can `select!`
//! between input and animation frames.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

impl AppEvent {
    /// `None` for events the app ignores (focus, paste).
    pub fn from_crossterm(event: CtEvent) -> Option<Self> {
        match event {
            CtEvent::Key(k) => Some(AppEvent::Key(k)),
            CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
            CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Spawn the reader.  It polls with `poll_timeout` so it notices within that
/// time when the receiver is dropped.
pub fn spawn_event_reader(poll_timeout: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            match event::poll(poll_timeout) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    tracing::warn!("terminal poll failed: {err}");
                    break;
                }
            }
            let event = match event::read() {
                Ok(event) => event,
                Err(err) => {
                    tracing::debug!("terminal read failed: {err}");
                    continue;
                }
            };
            if let Some(app_event) = AppEvent::from_crossterm(event) {
                if tx.send(app_event).is_err() {
                    break; // receiver dropped
                }
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_from_crossterm_filters_unused_events() {
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(AppEvent::from_crossterm(CtEvent::Key(key)), Some(AppEvent::Key(key)));
        assert_eq!(
            AppEvent::from_crossterm(CtEvent::Resize(80, 24)),
            Some(AppEvent::Resize(80, 24))
        );
        assert_eq!(AppEvent::from_crossterm(CtEvent::FocusGained), None);
    }
}
