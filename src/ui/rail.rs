//! One-column progress rail drawn beside the page.

use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

use super::theme::Theme;

pub struct ProgressRail {
    pub progress: f64,
    pub touring: bool,
}

impl ProgressRail {
    /// Rows (from the top) that are filled for `height` rows.
    fn filled_rows(&self, height: u16) -> u16 {
        let p = self.progress.clamp(0.0, 1.0);
        (p * f64::from(height)).round() as u16
    }
}

impl Widget for ProgressRail {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let filled = self.filled_rows(area.height);
        let fill_style = if self.touring {
            Theme::tour_style()
        } else {
            Theme::title_style()
        };
        for dy in 0..area.height {
            let (glyph, style): (&str, Style) = if dy < filled {
                ("┃", fill_style)
            } else {
                ("│", Theme::muted_style())
            };
            buf.set_string(area.x, area.y + dy, glyph, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_tracks_progress() {
        let rail = |p| ProgressRail { progress: p, touring: false };
        assert_eq!(rail(0.0).filled_rows(20), 0);
        assert_eq!(rail(0.5).filled_rows(20), 10);
        assert_eq!(rail(1.7).filled_rows(20), 20);
    }
}
