//! Auto-scroll driver: the 30 second guided tour through the timeline.
//!
//! `Idle → Running → {Completed | Cancelled} → Idle`.
//!
//! Each frame linearly interpolates between the start and target offsets
//! and writes the result as an immediate positional set; the interpolation
//! is the smoothing.  Cancellation is cooperative: [`AutoScrollDriver::cancel`]
//! only raises a flag, and the next frame observes it and drops the session
//! without writing.

use std::time::{Duration, Instant};

pub const TOUR_DURATION: Duration = Duration::from_millis(30_000);

/// One run of the tour.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoScrollSession {
    pub start_scroll_y: f64,
    pub target_scroll_y: f64,
    pub start_time: Instant,
    pub duration: Duration,
    pub cancelled: bool,
}

impl AutoScrollSession {
    fn fraction(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    fn sample(&self, t: f64) -> f64 {
        self.start_scroll_y + (self.target_scroll_y - self.start_scroll_y) * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

/// Result of one frame callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// No session; nothing scheduled.
    Idle,
    /// Scroll position to set; another frame is wanted.
    Scroll(f64),
    /// Final write at `t = 1`; state is Idle afterwards.
    Completed(f64),
    /// Session was cancelled; nothing written.
    Cancelled,
}

impl FrameOutcome {
    /// Position to write, if any.
    pub fn write(&self) -> Option<f64> {
        match *self {
            FrameOutcome::Scroll(y) | FrameOutcome::Completed(y) => Some(y),
            FrameOutcome::Idle | FrameOutcome::Cancelled => None,
        }
    }
}

#[derive(Debug)]
pub struct AutoScrollDriver {
    session: Option<AutoScrollSession>,
    duration: Duration,
}

impl Default for AutoScrollDriver {
    fn default() -> Self {
        Self::new(TOUR_DURATION)
    }
}

impl AutoScrollDriver {
    pub fn new(duration: Duration) -> Self {
        Self {
            session: None,
            duration,
        }
    }

    /// Running means a session exists and has not been cancelled.
    pub fn state(&self) -> DriverState {
        match &self.session {
            Some(s) if !s.cancelled => DriverState::Running,
            _ => DriverState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == DriverState::Running
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&AutoScrollSession> {
        self.session.as_ref()
    }

    /// Start a session.  A no-op returning `false` while one is running.
    pub fn trigger(&mut self, now: Instant, start_scroll_y: f64, target_scroll_y: f64) -> bool {
        if self.is_running() {
            return false;
        }
        tracing::info!(
            from = start_scroll_y,
            to = target_scroll_y,
            "guided tour started"
        );
        self.session = Some(AutoScrollSession {
            start_scroll_y,
            target_scroll_y,
            start_time: now,
            duration: self.duration,
            cancelled: false,
        });
        true
    }

    /// Flag the active session; the next frame withdraws it.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if !session.cancelled {
                tracing::info!("guided tour cancelled by user input");
            }
            session.cancelled = true;
        }
    }

    /// Frame callback.
    pub fn on_frame(&mut self, now: Instant) -> FrameOutcome {
        let Some(session) = self.session.as_ref() else {
            return FrameOutcome::Idle;
        };
        if session.cancelled {
            self.session = None;
            return FrameOutcome::Cancelled;
        }
        let t = session.fraction(now);
        let y = session.sample(t);
        if t >= 1.0 {
            tracing::info!(y, "guided tour completed");
            self.session = None;
            FrameOutcome::Completed(y)
        } else {
            FrameOutcome::Scroll(y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn interpolates_linearly_then_completes() {
        let t0 = Instant::now();
        let mut d = AutoScrollDriver::default();
        assert!(d.trigger(t0, 100.0, 3100.0));
        assert_eq!(d.state(), DriverState::Running);

        assert_eq!(d.on_frame(t0 + ms(15_000)), FrameOutcome::Scroll(1600.0));
        assert_eq!(d.on_frame(t0 + ms(3_000)), FrameOutcome::Scroll(400.0));
        assert_eq!(d.on_frame(t0 + ms(30_000)), FrameOutcome::Completed(3100.0));
        assert_eq!(d.state(), DriverState::Idle);
        assert_eq!(d.on_frame(t0 + ms(30_016)), FrameOutcome::Idle);
    }

    #[test]
    fn trigger_is_idempotent_while_running() {
        let t0 = Instant::now();
        let mut d = AutoScrollDriver::default();
        assert!(d.trigger(t0, 0.0, 500.0));
        assert!(!d.trigger(t0 + ms(1), 250.0, 9000.0));
        let s = d.session().unwrap();
        assert_eq!(s.start_scroll_y, 0.0);
        assert_eq!(s.target_scroll_y, 500.0);
        assert_eq!(s.start_time, t0);
    }

    #[test]
    fn cancel_reads_idle_immediately_and_next_frame_writes_nothing() {
        let t0 = Instant::now();
        let mut d = AutoScrollDriver::default();
        d.trigger(t0, 0.0, 1000.0);
        assert!(matches!(d.on_frame(t0 + ms(16)), FrameOutcome::Scroll(_)));

        d.cancel();
        assert_eq!(d.state(), DriverState::Idle);
        assert!(d.session().unwrap().cancelled);

        let outcome = d.on_frame(t0 + ms(32));
        assert_eq!(outcome, FrameOutcome::Cancelled);
        assert_eq!(outcome.write(), None);
        assert!(d.session().is_none());
    }

    #[test]
    fn can_retrigger_after_cancel() {
        let t0 = Instant::now();
        let mut d = AutoScrollDriver::default();
        d.trigger(t0, 0.0, 1000.0);
        d.cancel();
        assert!(d.trigger(t0 + ms(10), 300.0, 1000.0));
        assert_eq!(d.session().unwrap().start_scroll_y, 300.0);
    }

    #[test]
    fn degenerate_geometry_completes_without_jump() {
        let t0 = Instant::now();
        let mut d = AutoScrollDriver::default();
        d.trigger(t0, 420.0, 420.0);
        assert_eq!(d.on_frame(t0 + ms(16)), FrameOutcome::Scroll(420.0));
        assert_eq!(d.on_frame(t0 + TOUR_DURATION), FrameOutcome::Completed(420.0));
    }

    #[test]
    fn zero_duration_finishes_on_first_frame() {
        let t0 = Instant::now();
        let mut d = AutoScrollDriver::new(Duration::ZERO);
        d.trigger(t0, 0.0, 80.0);
        assert_eq!(d.on_frame(t0), FrameOutcome::Completed(80.0));
    }
}
