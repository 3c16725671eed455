//! Progress calculator: normalized scroll progress through the narrative.
//!
//! `progress = clamp((start - section_top) / (start - end), 0, 1)` with
//! `start = viewport_height` and `end = -container_height`, i.e. 0 while the
//! container is still below the viewport and 1 once it has fully passed.
//!
//! Recomputation is throttled: events only mark the calculator dirty, and
//! the frame callback recomputes at most once per frame (and no more than
//! once per [`CONSTRAINED_INTERVAL`] on the constrained profile).  The dirty
//! mark survives skipped frames, so the last event of a burst always lands.

use std::time::{Duration, Instant};

use super::viewport::ViewportMetrics;

/// Minimum spacing between computations on the constrained profile.
pub const CONSTRAINED_INTERVAL: Duration = Duration::from_millis(20);

/// Pure progress formula.
pub fn compute_progress(metrics: &ViewportMetrics) -> f64 {
    let start = metrics.viewport_height;
    let end = -metrics.container_height;
    let span = start - end;
    if span <= 0.0 {
        return 0.0;
    }
    let raw = (start - metrics.section_top) / span;
    raw.clamp(0.0, 1.0)
}

/// Throttled progress calculator holding the last known value.
#[derive(Debug, Clone)]
pub struct ProgressCalculator {
    progress: f64,
    dirty: bool,
    constrained: bool,
    last_computed: Option<Instant>,
}

impl ProgressCalculator {
    pub fn new(constrained: bool) -> Self {
        Self {
            progress: 0.0,
            // First frame always computes.
            dirty: true,
            constrained,
            last_computed: None,
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[cfg(test)]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record a scroll or resize event.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Frame callback.  Returns `true` when progress was recomputed.
    ///
    /// With no metrics (container unmounted) the last value is retained and
    /// the calculator stays dirty so it settles once the container appears.
    pub fn on_frame(&mut self, now: Instant, metrics: Option<ViewportMetrics>) -> bool {
        if !self.dirty {
            return false;
        }
        if self.constrained {
            if let Some(last) = self.last_computed {
                if now.saturating_duration_since(last) < CONSTRAINED_INTERVAL {
                    return false;
                }
            }
        }
        let Some(metrics) = metrics else {
            return false;
        };
        self.progress = compute_progress(&metrics);
        self.dirty = false;
        self.last_computed = Some(now);
        true
    }
}
