//! Viewport model and the metrics read on every scroll/resize tick.
//!
//! All lengths are in abstract "units" (pixels in a browser; the terminal
//! front end converts cells to units).  The document scrolls vertically;
//! `scroll_y` is the document offset of the viewport's top edge.

/// Scrollable viewport over a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scroll_y: f64,
    viewport_height: f64,
    document_height: f64,
}

impl Viewport {
    pub fn new(viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_y: 0.0,
            viewport_height: viewport_height.max(0.0),
            document_height: document_height.max(0.0),
        }
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    #[cfg(test)]
    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    /// Largest valid scroll offset.
    pub fn max_scroll_y(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Immediate positional set (no easing), clamped to the scroll range.
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll_y());
    }

    pub fn scroll_by(&mut self, dy: f64) {
        self.set_scroll_y(self.scroll_y + dy);
    }

    /// Apply a resize; the current offset is re-clamped.
    pub fn resize(&mut self, viewport_height: f64, document_height: f64) {
        self.viewport_height = viewport_height.max(0.0);
        self.document_height = document_height.max(0.0);
        self.set_scroll_y(self.scroll_y);
    }
}

/// Document-space box of the narrative container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBox {
    /// Distance from the document top to the container's top edge.
    pub top: f64,
    pub height: f64,
}

/// Raw metrics handed to the progress calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    /// Container top edge relative to the viewport top (negative once
    /// scrolled past).
    pub section_top: f64,
    pub container_height: f64,
    pub viewport_height: f64,
}

impl ViewportMetrics {
    /// `None` when the container is not mounted.
    pub fn read(viewport: &Viewport, container: Option<&ContainerBox>) -> Option<Self> {
        let container = container?;
        Some(Self {
            section_top: container.top - viewport.scroll_y(),
            container_height: container.height,
            viewport_height: viewport.viewport_height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_is_clamped_to_document() {
        let mut v = Viewport::new(100.0, 350.0);
        v.set_scroll_y(1000.0);
        assert_eq!(v.scroll_y(), 250.0);
        v.scroll_by(-900.0);
        assert_eq!(v.scroll_y(), 0.0);
    }

    #[test]
    fn short_document_cannot_scroll() {
        let mut v = Viewport::new(100.0, 40.0);
        v.set_scroll_y(30.0);
        assert_eq!(v.scroll_y(), 0.0);
    }

    #[test]
    fn resize_reclamps_offset() {
        let mut v = Viewport::new(100.0, 500.0);
        v.set_scroll_y(400.0);
        v.resize(200.0, 500.0);
        assert_eq!(v.scroll_y(), 300.0);
    }

    #[test]
    fn metrics_track_section_top() {
        let mut v = Viewport::new(100.0, 1000.0);
        let c = ContainerBox { top: 300.0, height: 400.0 };
        v.set_scroll_y(350.0);
        let m = ViewportMetrics::read(&v, Some(&c)).unwrap();
        assert_eq!(m.section_top, -50.0);
        assert_eq!(m.container_height, 400.0);
        assert!(ViewportMetrics::read(&v, None).is_none());
    }
}
