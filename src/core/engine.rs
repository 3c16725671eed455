//! The timeline engine: the page-owned state object tying the viewport,
//! progress calculator, resolver, galleries, tour driver and arbiter
//! together.
//!
//! An engine is constructed when the page mounts and released when it
//! unmounts; dropping it detaches the arbiter and withdraws any tour.
//!
//! Per frame the stages run in data-dependency order: tour step (may write
//! scroll) → progress → active index → gallery indices.  Later stages
//! always read this frame's progress.

use std::time::{Duration, Instant};

use super::active_index;
use super::arbiter::{InputEvent, InteractionArbiter, NavKey};
use super::autoscroll::{AutoScrollDriver, DriverState, FrameOutcome, TOUR_DURATION};
use super::gallery::{GalleryBook, SwipeDirection, SwipeGesture};
use super::narrative::{EntryKey, Narrative};
use super::progress::ProgressCalculator;
use super::viewport::{ContainerBox, Viewport, ViewportMetrics};

/// Tunables supplied by the front end.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Further throttle progress to one computation per 20ms.
    pub constrained: bool,
    /// Extra distance past the container bottom the tour scrolls to.
    pub tour_padding: f64,
    pub tour_duration: Duration,
    /// Distance scrolled by an arrow key.
    pub line_step: f64,
}

/// Reference cell height the defaults are expressed in.
const DEFAULT_CELL: f64 = 16.0;

/// Below this distance the tour has nowhere to go.
const MIN_TOUR_DISTANCE: f64 = 1.0;

impl Default for EngineConfig {
    /// Two rows of padding and three rows per arrow key at a 16-unit cell.
    fn default() -> Self {
        Self {
            constrained: false,
            tour_padding: 2.0 * DEFAULT_CELL,
            tour_duration: TOUR_DURATION,
            line_step: 3.0 * DEFAULT_CELL,
        }
    }
}

/// Derived scroll state for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub progress: f64,
    pub active_index: usize,
}

/// Geometry of the page, re-supplied on every layout change.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub viewport_height: f64,
    pub document_height: f64,
    /// `None` while the narrative container is not mounted.
    pub container: Option<ContainerBox>,
}

/// What the engine did with an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputOutcome {
    /// The event cancelled a running tour.
    pub cancelled_tour: bool,
    /// The event was consumed as a gallery swipe.
    pub handled_swipe: bool,
}

#[derive(Debug, Clone, Copy)]
struct ActiveTouch {
    start: (f64, f64),
    last_y: f64,
    gallery: Option<EntryKey>,
}

pub struct JourneyEngine {
    narrative: Narrative,
    config: EngineConfig,
    viewport: Viewport,
    container: Option<ContainerBox>,
    progress: ProgressCalculator,
    scroll: ScrollState,
    galleries: GalleryBook,
    /// Effective image index per entry position, refreshed each frame.
    gallery_indices: Vec<usize>,
    driver: AutoScrollDriver,
    arbiter: InteractionArbiter,
    touch: Option<ActiveTouch>,
}

impl JourneyEngine {
    /// Mount the engine over `narrative` with the initial page layout.
    pub fn mount(narrative: Narrative, layout: PageLayout, config: EngineConfig) -> Self {
        let count = narrative.len();
        let mut engine = Self {
            progress: ProgressCalculator::new(config.constrained),
            driver: AutoScrollDriver::new(config.tour_duration),
            viewport: Viewport::new(layout.viewport_height, layout.document_height),
            container: layout.container,
            narrative,
            config,
            scroll: ScrollState {
                progress: 0.0,
                active_index: 0,
            },
            galleries: GalleryBook::new(),
            gallery_indices: vec![0; count],
            arbiter: InteractionArbiter::new(),
            touch: None,
        };
        engine.refresh_galleries();
        tracing::debug!(entries = count, "timeline engine mounted");
        engine
    }

    // ── accessors ───────────────────────────────────────────────

    pub fn narrative(&self) -> &Narrative {
        &self.narrative
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    pub fn tour_state(&self) -> DriverState {
        self.driver.state()
    }

    #[cfg(test)]
    pub fn tour_target(&self) -> Option<f64> {
        self.driver
            .session()
            .filter(|s| !s.cancelled)
            .map(|s| s.target_scroll_y)
    }

    #[cfg(test)]
    pub fn is_listening(&self) -> bool {
        self.arbiter.is_attached()
    }

    /// Image shown for the entry at `position`.
    pub fn gallery_index(&self, position: usize) -> usize {
        self.gallery_indices.get(position).copied().unwrap_or(0)
    }

    pub fn gallery_is_manual(&self, key: EntryKey) -> bool {
        self.galleries.is_manual(key)
    }

    // ── layout ──────────────────────────────────────────────────

    /// Resize / relayout.  Counts as a resize event for the calculator.
    pub fn set_layout(&mut self, layout: PageLayout) {
        self.viewport
            .resize(layout.viewport_height, layout.document_height);
        self.container = layout.container;
        self.progress.invalidate();
    }

    // ── frame ───────────────────────────────────────────────────

    /// Animation-frame callback.  Returns `true` while another frame is
    /// wanted for the tour.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        let outcome = self.driver.on_frame(now);
        if let Some(y) = outcome.write() {
            self.viewport.set_scroll_y(y);
            self.progress.invalidate();
        }
        if matches!(outcome, FrameOutcome::Completed(_) | FrameOutcome::Cancelled) {
            self.arbiter.detach();
        }

        let metrics = ViewportMetrics::read(&self.viewport, self.container.as_ref());
        if self.progress.on_frame(now, metrics) {
            let progress = self.progress.progress();
            self.scroll = ScrollState {
                progress,
                active_index: active_index::resolve(progress, self.narrative.len()),
            };
        }
        self.refresh_galleries();

        matches!(outcome, FrameOutcome::Scroll(_))
    }

    fn refresh_galleries(&mut self) {
        let progress = self.scroll.progress;
        for (position, entry) in self.narrative.entries().iter().enumerate() {
            let idx = self.galleries.effective_index(
                entry.sort_order,
                position,
                entry.image_count(),
                progress,
            );
            if let Some(slot) = self.gallery_indices.get_mut(position) {
                *slot = idx;
            }
        }
    }

    // ── tour ────────────────────────────────────────────────────

    /// Start the guided tour.  No-op while one is running or while the
    /// container is unmounted.  When the viewport already sits at the tour
    /// target the tour completes on the spot and `false` is returned.
    pub fn start_tour(&mut self, now: Instant) -> bool {
        if self.driver.is_running() {
            return false;
        }
        let Some(container) = self.container else {
            return false;
        };
        let start = self.viewport.scroll_y();
        let bottom = container.top + container.height + self.config.tour_padding;
        let target = (bottom - self.viewport.viewport_height()).clamp(0.0, self.viewport.max_scroll_y());
        if (target - start).abs() < MIN_TOUR_DISTANCE {
            self.scroll_to(target);
            tracing::debug!(to = target, "guided tour already at its target");
            return false;
        }
        let started = self.driver.trigger(now, start, target);
        if started {
            self.arbiter.attach();
        }
        started
    }

    // ── input ───────────────────────────────────────────────────

    /// Feed a raw input event.  `gallery` is the gallery under the event's
    /// position, if any (only consulted on touch start).
    pub fn handle_input(&mut self, event: InputEvent, gallery: Option<EntryKey>) -> InputOutcome {
        let mut outcome = InputOutcome::default();

        if self.driver.is_running() && self.arbiter.observe(&event) {
            self.driver.cancel();
            self.arbiter.detach();
            outcome.cancelled_tour = true;
        }

        match event {
            InputEvent::Wheel { delta_y } => self.scroll_by(delta_y),
            InputEvent::TouchStart { x, y } => {
                self.touch = Some(ActiveTouch {
                    start: (x, y),
                    last_y: y,
                    gallery,
                });
            }
            InputEvent::TouchMove { y, .. } => {
                if let Some(touch) = self.touch.as_mut() {
                    let dy = y - touch.last_y;
                    touch.last_y = y;
                    // Native touch scrolling: content follows the finger.
                    self.scroll_by(-dy);
                }
            }
            InputEvent::TouchEnd { x, y } => {
                if let Some(touch) = self.touch.take() {
                    if let Some(key) = touch.gallery {
                        let gesture = SwipeGesture::new(touch.start, (x, y));
                        if let Some(direction) = gesture.direction() {
                            outcome.handled_swipe = self.swipe(key, direction).is_some();
                        }
                    }
                }
            }
            InputEvent::Key(key) => self.apply_key(key),
        }
        outcome
    }

    fn apply_key(&mut self, key: NavKey) {
        let page = self.viewport.viewport_height() * 0.9;
        match key {
            NavKey::ArrowUp => self.scroll_by(-self.config.line_step),
            NavKey::ArrowDown => self.scroll_by(self.config.line_step),
            NavKey::PageUp => self.scroll_by(-page),
            NavKey::PageDown | NavKey::Space => self.scroll_by(page),
            NavKey::Home => self.scroll_to(0.0),
            NavKey::End => self.scroll_to(self.viewport.max_scroll_y()),
            NavKey::ArrowLeft | NavKey::ArrowRight | NavKey::Other => {}
        }
    }

    /// User-originated scroll; counts as a scroll event for the calculator.
    fn scroll_by(&mut self, dy: f64) {
        self.viewport.scroll_by(dy);
        self.progress.invalidate();
    }

    fn scroll_to(&mut self, y: f64) {
        self.viewport.set_scroll_y(y);
        self.progress.invalidate();
    }

    // ── galleries ───────────────────────────────────────────────

    /// Dot-indicator click.
    pub fn select_image(&mut self, key: EntryKey, index: usize) {
        let Some(position) = self.narrative.position_of(key) else {
            return;
        };
        let count = self.narrative.entries()[position].image_count();
        self.galleries.select_image(key, index, count);
        self.refresh_galleries();
    }

    /// Step the entry's gallery one image, wrapping.  Returns the new index.
    pub fn swipe(&mut self, key: EntryKey, direction: SwipeDirection) -> Option<usize> {
        let position = self.narrative.position_of(key)?;
        let count = self.narrative.entries()[position].image_count();
        let next = self
            .galleries
            .swipe(key, position, count, self.scroll.progress, direction);
        self.refresh_galleries();
        next
    }

    /// Step the gallery of the currently active entry.
    pub fn swipe_active(&mut self, direction: SwipeDirection) -> Option<usize> {
        let key = self.narrative.get(self.scroll.active_index)?.sort_order;
        self.swipe(key, direction)
    }

    /// Release listeners and withdraw any tour.  Also run on drop.
    pub fn unmount(&mut self) {
        self.driver.cancel();
        self.arbiter.detach();
        self.touch = None;
    }
}

impl Drop for JourneyEngine {
    fn drop(&mut self) {
        self.unmount();
        tracing::debug!("timeline engine unmounted");
    }
}
