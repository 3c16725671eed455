//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::Instant;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::engine::JourneyEngine;
use crate::core::narrative::{EntryKey, Narrative};
use crate::ui::layout::AppLayout;
use crate::ui::page::PageModel;

/// A left-button press that may still turn into a dot click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPress {
    pub column: u16,
    pub row: u16,
    pub dot: Option<(EntryKey, usize)>,
}

/// Top-level application state.
pub struct AppState {
    /// The mounted timeline engine; dropped with the state on exit.
    pub engine: JourneyEngine,
    /// Row geometry of the rendered document.
    pub page: PageModel,
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Full terminal area from the last resize.
    pub terminal_area: Rect,
    pub pending_press: Option<PendingPress>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(narrative: Narrative, config: AppConfig, terminal_area: Rect) -> Self {
        let page = PageModel::build(&narrative);
        let layout = AppLayout::from_area(terminal_area);
        let engine = JourneyEngine::mount(
            narrative,
            page.layout(layout.page_area.height, config.cell_height),
            config.engine_config(),
        );
        Self {
            engine,
            page,
            config,
            should_quit: false,
            status_message: None,
            terminal_area,
            pending_press: None,
            started_at: Instant::now(),
        }
    }

    pub fn layout(&self) -> AppLayout {
        AppLayout::from_area(self.terminal_area)
    }

    /// Re-supply geometry to the engine after a terminal resize.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_area = Rect::new(0, 0, width, height);
        let rows = self.layout().page_area.height;
        self.engine
            .set_layout(self.page.layout(rows, self.config.cell_height));
    }

    /// Document row at the top of the viewport.
    pub fn scroll_row(&self) -> u16 {
        crate::ui::page::scroll_row(self.engine.viewport().scroll_y(), self.config.cell_height)
    }
}
