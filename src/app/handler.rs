//! Input handling: maps key/mouse events to engine input and actions.
//!
//! Every key and mouse event is first handed to the engine as raw input (so
//! the arbiter can see it); bound actions are applied afterwards.  Mouse
//! wheel notches become wheel deltas, and left-button press/drag/release is
//! treated as a touch gesture in units.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;
use crate::core::arbiter::{InputEvent, NavKey};
use crate::core::engine::InputOutcome;
use crate::core::gallery::SwipeDirection;

use super::state::{AppState, PendingPress};

/// Terminal key → arbiter key class.
pub fn nav_key(code: KeyCode) -> NavKey {
    match code {
        KeyCode::Up => NavKey::ArrowUp,
        KeyCode::Down => NavKey::ArrowDown,
        KeyCode::Left => NavKey::ArrowLeft,
        KeyCode::Right => NavKey::ArrowRight,
        KeyCode::PageUp => NavKey::PageUp,
        KeyCode::PageDown => NavKey::PageDown,
        KeyCode::Home => NavKey::Home,
        KeyCode::End => NavKey::End,
        KeyCode::Char(' ') => NavKey::Space,
        _ => NavKey::Other,
    }
}

fn report(state: &mut AppState, outcome: InputOutcome) {
    if outcome.cancelled_tour {
        state.status_message = Some("Tour stopped, you have control".into());
    }
}

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let action = state.config.match_key(key);
    let nav = match action {
        Some(Action::ScrollUp) => NavKey::ArrowUp,
        Some(Action::ScrollDown) => NavKey::ArrowDown,
        _ => nav_key(key.code),
    };
    let outcome = state.engine.handle_input(InputEvent::Key(nav), None);
    report(state, outcome);

    match action {
        Some(Action::StartTour) => {
            if state.engine.start_tour(now) {
                state.status_message = Some("Guided tour running, scroll to take over".into());
            }
        }
        Some(Action::NextImage) => {
            state.engine.swipe_active(SwipeDirection::Next);
        }
        Some(Action::PrevImage) => {
            state.engine.swipe_active(SwipeDirection::Prev);
        }
        Some(Action::Quit) => state.should_quit = true,
        Some(Action::ScrollUp | Action::ScrollDown) | None => {}
    }
}

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let x = f64::from(mouse.column) * state.config.cell_width;
    let y = f64::from(mouse.row) * state.config.cell_height;

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            let delta_y = state.config.wheel_step;
            let outcome = state.engine.handle_input(InputEvent::Wheel { delta_y }, None);
            report(state, outcome);
        }
        MouseEventKind::ScrollUp => {
            let delta_y = -state.config.wheel_step;
            let outcome = state.engine.handle_input(InputEvent::Wheel { delta_y }, None);
            report(state, outcome);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            let scroll_row = state.scroll_row();
            let hit = state
                .layout()
                .page_position(mouse.column, mouse.row)
                .map(|(col, row)| (col, scroll_row.saturating_add(row)));
            let gallery = hit.and_then(|(_, doc_row)| state.page.gallery_at(doc_row));
            let dot = hit.and_then(|(col, doc_row)| state.page.dot_at(col, doc_row));
            state.pending_press = Some(PendingPress {
                column: mouse.column,
                row: mouse.row,
                dot,
            });
            let outcome = state
                .engine
                .handle_input(InputEvent::TouchStart { x, y }, gallery);
            report(state, outcome);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let outcome = state.engine.handle_input(InputEvent::TouchMove { x, y }, None);
            report(state, outcome);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let outcome = state.engine.handle_input(InputEvent::TouchEnd { x, y }, None);
            report(state, outcome);
            let Some(press) = state.pending_press.take() else {
                return;
            };
            let stationary = press.column == mouse.column && press.row == mouse.row;
            if stationary && !outcome.handled_swipe {
                if let Some((key, index)) = press.dot {
                    state.engine.select_image(key, index);
                }
            }
        }
        _ => {}
    }
}
