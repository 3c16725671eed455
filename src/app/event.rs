//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel so the main loop stays non-blocking.  Frame
//! ticks are not produced here; the main loop owns a frame interval.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

impl AppEvent {
    /// Map a raw crossterm event.  Key releases/repeats and focus/paste
    /// events are dropped.
    fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(k) if k.kind == KeyEventKind::Press => Some(AppEvent::Key(k)),
            CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
            CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel.
pub fn spawn_event_reader(poll_timeout: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || loop {
        // Poll with a timeout so a dropped receiver is noticed promptly.
        let has_event = event::poll(poll_timeout).unwrap_or(false);
        if has_event {
            let Ok(ev) = event::read() else {
                continue;
            };
            let Some(app_event) = AppEvent::from_crossterm(ev) else {
                continue;
            };
            if tx.send(app_event).is_err() {
                break; // receiver dropped
            }
        } else if tx.is_closed() {
            break;
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn only_key_presses_are_forwarded() {
        let press = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE);
        assert!(matches!(
            AppEvent::from_crossterm(CtEvent::Key(press)),
            Some(AppEvent::Key(_))
        ));
        let release = KeyEvent {
            code: KeyCode::Char('t'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(AppEvent::from_crossterm(CtEvent::Key(release)).is_none());
        assert!(AppEvent::from_crossterm(CtEvent::FocusGained).is_none());
        assert!(matches!(
            AppEvent::from_crossterm(CtEvent::Resize(80, 24)),
            Some(AppEvent::Resize(80, 24))
        ));
    }
}
