//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout with the page pane, a progress rail and a bottom
/// status bar.
pub struct AppLayout {
    pub page_area: Rect,
    pub rail_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // page (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(10),   // page
                Constraint::Length(1), // progress rail
            ])
            .split(rows[0]);

        Self {
            page_area: cols[0],
            rail_area: cols[1],
            status_area: rows[1],
        }
    }

    /// Translate a terminal cell into page-relative coordinates.
    pub fn page_position(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        let a = self.page_area;
        if column >= a.x && column < a.x + a.width && row >= a.y && row < a.y + a.height {
            Some((column - a.x, row - a.y))
        } else {
            None
        }
    }
}
