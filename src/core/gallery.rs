//! Per-entry gallery cursor.
//!
//! Each entry's gallery either follows a slow, damped cyclic schedule
//! derived from global progress, or: once the user picks an image by
//! clicking a dot or swiping: stays latched on the manual index for the
//! rest of the session.  There is deliberately no way back to automatic
//! mode.
//!
//! The schedule constants (8, 2, 3) are tuning values and must be kept as-is.

use std::collections::HashMap;

use super::narrative::EntryKey;

/// Horizontal displacement a swipe must exceed.
pub const SWIPE_THRESHOLD: f64 = 50.0;

const PROGRESS_SCALE: f64 = 8.0;
const ENTRY_OFFSET: f64 = 2.0;
const DWELL: f64 = 3.0;

/// Automatic image index for an entry at `entry_position` in the narrative.
pub fn auto_index(progress: f64, entry_position: usize, image_count: usize) -> usize {
    if image_count == 0 {
        return 0;
    }
    let base = progress * PROGRESS_SCALE;
    let offset = base + entry_position as f64 * ENTRY_OFFSET;
    let cycle = offset.rem_euclid(image_count as f64 * DWELL);
    let slot = (cycle / DWELL).floor();
    if !slot.is_finite() || slot < 0.0 {
        return 0;
    }
    (slot as usize) % image_count
}

/// Scroll multiplier for a gallery of `image_count` images.
///
/// Not an input to [`auto_index`]; kept for layouts that size the gallery
/// band by image count.
pub fn scroll_multiplier(image_count: usize) -> f64 {
    if image_count > 1 {
        image_count as f64 * 1.5
    } else {
        1.0
    }
}

// ───────────────────────────────────────── swipe ─────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Toward a higher index (finger moves left).
    Next,
    /// Toward a lower index (finger moves right).
    Prev,
}

/// A completed touch gesture, start and end points in units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeGesture {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl SwipeGesture {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self { start, end }
    }

    /// `None` when the gesture is not a swipe (too short or vertical-dominant);
    /// such gestures must be left to native scrolling.
    pub fn direction(&self) -> Option<SwipeDirection> {
        let dx = self.end.0 - self.start.0;
        let dy = self.end.1 - self.start.1;
        if dx.abs() <= SWIPE_THRESHOLD || dx.abs() <= dy.abs() {
            return None;
        }
        if dx < 0.0 {
            Some(SwipeDirection::Next)
        } else {
            Some(SwipeDirection::Prev)
        }
    }
}

// ───────────────────────────────────────── cursor ────────────

/// Manual-override latches for every gallery, keyed by entry identity.
#[derive(Debug, Clone, Default)]
pub struct GalleryBook {
    manual: HashMap<EntryKey, usize>,
}

impl GalleryBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manual_index(&self, key: EntryKey) -> Option<usize> {
        self.manual.get(&key).copied()
    }

    pub fn is_manual(&self, key: EntryKey) -> bool {
        self.manual.contains_key(&key)
    }

    /// Image shown for the entry.  A stale manual index is clamped.
    pub fn effective_index(
        &self,
        key: EntryKey,
        entry_position: usize,
        image_count: usize,
        progress: f64,
    ) -> usize {
        if image_count == 0 {
            return 0;
        }
        match self.manual_index(key) {
            Some(idx) => idx.min(image_count - 1),
            None => auto_index(progress, entry_position, image_count),
        }
    }

    /// Latch the gallery on `index` (clamped into range).
    pub fn select_image(&mut self, key: EntryKey, index: usize, image_count: usize) {
        if image_count == 0 {
            return;
        }
        let index = index.min(image_count - 1);
        if self.manual.insert(key, index).is_none() {
            tracing::debug!(entry = key, index, "gallery switched to manual");
        }
    }

    /// Step one image from the current effective index, wrapping at the ends.
    /// Returns the new index.
    pub fn swipe(
        &mut self,
        key: EntryKey,
        entry_position: usize,
        image_count: usize,
        progress: f64,
        direction: SwipeDirection,
    ) -> Option<usize> {
        if image_count == 0 {
            return None;
        }
        let current = self.effective_index(key, entry_position, image_count, progress);
        let last = image_count - 1;
        let next = match direction {
            SwipeDirection::Next if current >= last => 0,
            SwipeDirection::Next => current + 1,
            SwipeDirection::Prev if current == 0 => last,
            SwipeDirection::Prev => current - 1,
        };
        self.select_image(key, next, image_count);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_index_cycles_slowly() {
        // Four images, first entry: slot changes every 3/8 of progress.
        assert_eq!(auto_index(0.0, 0, 4), 0);
        assert_eq!(auto_index(0.37, 0, 4), 0);
        assert_eq!(auto_index(0.38, 0, 4), 1);
        assert_eq!(auto_index(0.75, 0, 4), 2);
        assert_eq!(auto_index(1.0, 0, 4), 2);
    }

    #[test]
    fn auto_index_is_offset_per_entry() {
        // Entry 2 starts 4 units into the cycle → slot 1.
        assert_eq!(auto_index(0.0, 2, 3), 1);
        // Single image is always index 0.
        assert_eq!(auto_index(0.9, 5, 1), 0);
        assert_eq!(auto_index(0.9, 5, 0), 0);
    }

    #[test]
    fn scroll_multiplier_values() {
        assert_eq!(scroll_multiplier(0), 1.0);
        assert_eq!(scroll_multiplier(1), 1.0);
        assert_eq!(scroll_multiplier(4), 6.0);
    }

    #[test]
    fn manual_override_persists_across_progress_updates() {
        let mut book = GalleryBook::new();
        book.select_image(10, 2, 5);
        for step in 0..100 {
            let progress = step as f64 / 99.0;
            assert_eq!(book.effective_index(10, 3, 5, progress), 2);
        }
        assert!(book.is_manual(10));
        assert!(!book.is_manual(11));
    }

    #[test]
    fn select_image_clamps_out_of_range() {
        let mut book = GalleryBook::new();
        book.select_image(1, 9, 3);
        assert_eq!(book.manual_index(1), Some(2));
        book.select_image(2, 0, 0);
        assert_eq!(book.manual_index(2), None);
    }

    #[test]
    fn stale_manual_index_is_clamped_on_read() {
        let mut book = GalleryBook::new();
        book.select_image(1, 4, 5);
        assert_eq!(book.effective_index(1, 0, 2, 0.0), 1);
    }

    #[test]
    fn swipe_wraps_around() {
        let mut book = GalleryBook::new();
        book.select_image(1, 3, 4);
        assert_eq!(book.swipe(1, 0, 4, 0.0, SwipeDirection::Next), Some(0));
        assert_eq!(book.effective_index(1, 0, 4, 0.0), 0);

        assert_eq!(book.swipe(1, 0, 4, 0.0, SwipeDirection::Prev), Some(3));
        assert_eq!(book.effective_index(1, 0, 4, 0.0), 3);
    }

    #[test]
    fn swipe_starts_from_automatic_index() {
        let mut book = GalleryBook::new();
        // progress 0.5, position 0, 4 images → auto slot 1.
        assert_eq!(auto_index(0.5, 0, 4), 1);
        assert_eq!(book.swipe(7, 0, 4, 0.5, SwipeDirection::Next), Some(2));
        assert!(book.is_manual(7));
    }

    #[test]
    fn swipe_on_empty_gallery_is_ignored() {
        let mut book = GalleryBook::new();
        assert_eq!(book.swipe(1, 0, 0, 0.2, SwipeDirection::Next), None);
        assert!(!book.is_manual(1));
    }

    #[test]
    fn gesture_classification() {
        let left = SwipeGesture::new((200.0, 100.0), (120.0, 110.0));
        assert_eq!(left.direction(), Some(SwipeDirection::Next));
        let right = SwipeGesture::new((100.0, 100.0), (170.0, 90.0));
        assert_eq!(right.direction(), Some(SwipeDirection::Prev));
        // Exactly at threshold is not enough.
        let short = SwipeGesture::new((100.0, 0.0), (150.0, 0.0));
        assert_eq!(short.direction(), None);
    }

    #[test]
    fn vertical_dominant_gesture_is_rejected() {
        let g = SwipeGesture::new((100.0, 100.0), (40.0, 180.0));
        assert_eq!(g.direction(), None);
    }
}
