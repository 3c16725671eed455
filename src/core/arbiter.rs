//! Interaction arbiter: decides whether raw input means "the user took
//! control" while the guided tour is running.
//!
//! Rules:
//! * wheel: `|delta_y| > 10`
//! * touch: a move after touch start with vertical displacement `> 30`
//! * keys: arrow up/down, page up/down, home, end, space
//!
//! The arbiter only listens while attached.  The per-touch tracker is
//! installed on touch start and torn down on touch end or detach.

/// Wheel deltas at or below this are trackpad noise.
pub const WHEEL_THRESHOLD: f64 = 10.0;
/// Vertical touch travel that counts as a scroll gesture.
pub const TOUCH_THRESHOLD: f64 = 30.0;

/// Keys the arbiter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Space,
    Other,
}

impl NavKey {
    /// Keys semantically tied to scrolling.
    pub fn is_scroll_key(self) -> bool {
        matches!(
            self,
            NavKey::ArrowUp
                | NavKey::ArrowDown
                | NavKey::PageUp
                | NavKey::PageDown
                | NavKey::Home
                | NavKey::End
                | NavKey::Space
        )
    }
}

/// Raw input events, positions in units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Wheel { delta_y: f64 },
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchEnd { x: f64, y: f64 },
    Key(NavKey),
}

#[derive(Debug, Clone, Copy)]
struct TouchTracker {
    start_y: f64,
}

#[derive(Debug, Default)]
pub struct InteractionArbiter {
    attached: bool,
    touch: Option<TouchTracker>,
}

impl InteractionArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// `true` while a per-touch move tracker is installed.
    #[cfg(test)]
    pub fn tracking_touch(&self) -> bool {
        self.touch.is_some()
    }

    pub fn attach(&mut self) {
        if !self.attached {
            tracing::trace!("arbiter attached");
        }
        self.attached = true;
    }

    pub fn detach(&mut self) {
        if self.attached {
            tracing::trace!("arbiter detached");
        }
        self.attached = false;
        self.touch = None;
    }

    /// Returns `true` when `event` is deliberate scroll intent.  Always
    /// `false` while detached.
    pub fn observe(&mut self, event: &InputEvent) -> bool {
        if !self.attached {
            return false;
        }
        match *event {
            InputEvent::Wheel { delta_y } => delta_y.abs() > WHEEL_THRESHOLD,
            InputEvent::TouchStart { y, .. } => {
                self.touch = Some(TouchTracker { start_y: y });
                false
            }
            InputEvent::TouchMove { y, .. } => match self.touch {
                Some(t) => (y - t.start_y).abs() > TOUCH_THRESHOLD,
                None => false,
            },
            InputEvent::TouchEnd { .. } => {
                self.touch = None;
                false
            }
            InputEvent::Key(key) => key.is_scroll_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached() -> InteractionArbiter {
        let mut a = InteractionArbiter::new();
        a.attach();
        a
    }

    #[test]
    fn wheel_threshold() {
        let mut a = attached();
        assert!(!a.observe(&InputEvent::Wheel { delta_y: 3.0 }));
        assert!(!a.observe(&InputEvent::Wheel { delta_y: -10.0 }));
        assert!(a.observe(&InputEvent::Wheel { delta_y: 50.0 }));
        assert!(a.observe(&InputEvent::Wheel { delta_y: -11.0 }));
    }

    #[test]
    fn touch_needs_vertical_travel() {
        let mut a = attached();
        assert!(!a.observe(&InputEvent::TouchStart { x: 0.0, y: 100.0 }));
        assert!(a.tracking_touch());
        // Horizontal travel (e.g. gallery swipe) does not count.
        assert!(!a.observe(&InputEvent::TouchMove { x: 90.0, y: 120.0 }));
        assert!(a.observe(&InputEvent::TouchMove { x: 90.0, y: 131.0 }));
        assert!(!a.observe(&InputEvent::TouchEnd { x: 90.0, y: 131.0 }));
        assert!(!a.tracking_touch());
    }

    #[test]
    fn move_without_start_is_ignored() {
        let mut a = attached();
        assert!(!a.observe(&InputEvent::TouchMove { x: 0.0, y: 500.0 }));
    }

    #[test]
    fn tap_does_not_cancel() {
        let mut a = attached();
        a.observe(&InputEvent::TouchStart { x: 10.0, y: 10.0 });
        assert!(!a.observe(&InputEvent::TouchMove { x: 11.0, y: 12.0 }));
        assert!(!a.observe(&InputEvent::TouchEnd { x: 11.0, y: 12.0 }));
    }

    #[test]
    fn only_scroll_keys_cancel() {
        let mut a = attached();
        for key in [
            NavKey::ArrowUp,
            NavKey::ArrowDown,
            NavKey::PageUp,
            NavKey::PageDown,
            NavKey::Home,
            NavKey::End,
            NavKey::Space,
        ] {
            assert!(a.observe(&InputEvent::Key(key)), "{key:?}");
        }
        for key in [NavKey::ArrowLeft, NavKey::ArrowRight, NavKey::Other] {
            assert!(!a.observe(&InputEvent::Key(key)), "{key:?}");
        }
    }

    #[test]
    fn detached_arbiter_ignores_everything() {
        let mut a = InteractionArbiter::new();
        assert!(!a.observe(&InputEvent::Wheel { delta_y: 500.0 }));
        assert!(!a.observe(&InputEvent::TouchStart { x: 0.0, y: 0.0 }));
        assert!(!a.tracking_touch());
    }

    #[test]
    fn detach_tears_down_touch_tracker() {
        let mut a = attached();
        a.observe(&InputEvent::TouchStart { x: 0.0, y: 0.0 });
        a.detach();
        assert!(!a.tracking_touch());
        a.attach();
        // The old gesture's start point is gone.
        assert!(!a.observe(&InputEvent::TouchMove { x: 0.0, y: 100.0 }));
    }
}
