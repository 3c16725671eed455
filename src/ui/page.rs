//! The journey page as a scrollable document of terminal rows.
//!
//! [`PageModel`] fixes the row geometry (intro, one card per entry, footer)
//! so the engine can be given document-space boxes and mouse positions can
//! be hit-tested against gallery rows.  [`PageWidget`] renders the visible
//! window of that document.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::core::engine::{JourneyEngine, PageLayout};
use crate::core::gallery;
use crate::core::narrative::{EntryKey, Narrative, NarrativeEntry};
use crate::core::viewport::ContainerBox;

use super::theme::Theme;

const INTRO_ROWS: u16 = 8;
const FOOTER_ROWS: u16 = 10;
/// Rows of a card besides its achievements: top border, organization,
/// image line, dots line, bottom border, gap.
const CARD_FIXED_ROWS: u16 = 6;
/// Column where card content starts (after `│ `).
const CONTENT_COL: u16 = 2;

// ───────────────────────────────────────── geometry ──────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRows {
    pub key: EntryKey,
    pub top: u16,
    pub height: u16,
    pub image_count: usize,
    /// Document row of the image line (dots follow on the next row).
    pub image_row: u16,
}

impl CardRows {
    pub fn dots_row(&self) -> u16 {
        self.image_row + 1
    }
}

/// Row-level layout of the whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct PageModel {
    pub cards: Vec<CardRows>,
    pub container_top: u16,
    pub container_rows: u16,
    pub document_rows: u16,
}

impl PageModel {
    pub fn build(narrative: &Narrative) -> Self {
        let mut cards = Vec::with_capacity(narrative.len());
        let mut row = INTRO_ROWS;
        for entry in narrative.entries() {
            let achievements = u16::try_from(entry.achievements.len()).unwrap_or(u16::MAX / 2);
            let height = CARD_FIXED_ROWS.saturating_add(achievements);
            cards.push(CardRows {
                key: entry.sort_order,
                top: row,
                height,
                image_count: entry.image_count(),
                image_row: row + 2 + achievements,
            });
            row = row.saturating_add(height);
        }
        Self {
            cards,
            container_top: INTRO_ROWS,
            container_rows: row - INTRO_ROWS,
            document_rows: row.saturating_add(FOOTER_ROWS),
        }
    }

    /// Document geometry in units for the engine.
    pub fn layout(&self, viewport_rows: u16, cell_height: f64) -> PageLayout {
        PageLayout {
            viewport_height: f64::from(viewport_rows) * cell_height,
            document_height: f64::from(self.document_rows) * cell_height,
            container: Some(ContainerBox {
                top: f64::from(self.container_top) * cell_height,
                height: f64::from(self.container_rows) * cell_height,
            }),
        }
    }

    fn card_at(&self, doc_row: u16) -> Option<&CardRows> {
        self.cards
            .iter()
            .find(|c| doc_row >= c.top && doc_row < c.top + c.height)
    }

    /// Gallery whose image or dots row contains `doc_row`.
    pub fn gallery_at(&self, doc_row: u16) -> Option<EntryKey> {
        self.card_at(doc_row)
            .filter(|c| c.image_count > 0 && (doc_row == c.image_row || doc_row == c.dots_row()))
            .map(|c| c.key)
    }

    /// Dot indicator under (`col`, `doc_row`); `col` is relative to the page.
    pub fn dot_at(&self, col: u16, doc_row: u16) -> Option<(EntryKey, usize)> {
        let card = self.card_at(doc_row)?;
        if doc_row != card.dots_row() || col < CONTENT_COL {
            return None;
        }
        // Dots are drawn two columns apart: "● ○ ○".
        let offset = col - CONTENT_COL;
        if offset % 2 != 0 {
            return None;
        }
        let index = usize::from(offset / 2);
        (index < card.image_count).then_some((card.key, index))
    }
}

/// Document row shown at the top of the viewport.
pub fn scroll_row(scroll_y: f64, cell_height: f64) -> u16 {
    if cell_height <= 0.0 {
        return 0;
    }
    (scroll_y / cell_height).round().clamp(0.0, f64::from(u16::MAX)) as u16
}

// ───────────────────────────────────────── widget ────────────

/// Renders the visible window of the page: created fresh each frame.
pub struct PageWidget<'a> {
    engine: &'a JourneyEngine,
    model: &'a PageModel,
    cell_height: f64,
}

impl<'a> PageWidget<'a> {
    pub fn new(engine: &'a JourneyEngine, model: &'a PageModel, cell_height: f64) -> Self {
        Self {
            engine,
            model,
            cell_height,
        }
    }

    fn intro_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::default(),
            Line::from(Span::styled("  Career journey", Theme::title_style())),
            Line::from(Span::styled(
                "  Roles, schools and projects, newest first.",
                Theme::muted_style(),
            )),
            Line::default(),
            Line::from(Span::styled(
                "  Scroll down, or press t for a relaxed guided tour.",
                Theme::muted_style(),
            )),
        ];
        lines.resize(usize::from(INTRO_ROWS), Line::default());
        lines
    }

    fn footer_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::default(),
            Line::from(Span::styled("  End of the journey, for now.", Theme::title_style())),
            Line::default(),
            Line::from(Span::styled(
                "  Projects, the contact form and the resume are served by `journey --serve`.",
                Theme::muted_style(),
            )),
            Line::from(Span::styled(
                "  Press Home to go back to the start.",
                Theme::muted_style(),
            )),
        ];
        lines.resize(usize::from(FOOTER_ROWS), Line::default());
        lines
    }

    fn card_lines(
        &self,
        entry: &NarrativeEntry,
        position: usize,
        active: bool,
        width: u16,
    ) -> Vec<Line<'static>> {
        let accent = Theme::token_color(&entry.color_token);
        let border = if active {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Theme::border_style()
        };
        let rule_len = usize::from(width.saturating_sub(6)).saturating_sub(entry.title.chars().count());
        let mut lines = Vec::new();

        lines.push(Line::from(vec![
            Span::styled("╭─ ", border),
            Span::styled(entry.title.clone(), Theme::entry_title_style(accent, active)),
            Span::styled(format!(" {}", "─".repeat(rule_len)), border),
        ]));
        lines.push(Line::from(vec![
            Span::styled("│ ", border),
            Span::styled(
                format!("{} · {}", entry.organization, entry.date_range),
                Theme::muted_style(),
            ),
        ]));
        for achievement in &entry.achievements {
            lines.push(Line::from(vec![
                Span::styled("│ ", border),
                Span::raw(format!(" • {achievement}")),
            ]));
        }

        let count = entry.image_count();
        if count == 0 {
            lines.push(Line::from(vec![
                Span::styled("│ ", border),
                Span::styled("▢ no images yet", Theme::muted_style()),
            ]));
            lines.push(Line::from(Span::styled("│ ", border)));
        } else {
            let current = self.engine.gallery_index(position);
            let name = entry.images[current]
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            let mode = if self.engine.gallery_is_manual(entry.sort_order) {
                "pinned"
            } else {
                "auto"
            };
            // Longer galleries get a wider film strip.
            let strip = "▭".repeat((gallery::scroll_multiplier(count) * 2.0) as usize);
            lines.push(Line::from(vec![
                Span::styled("│ ", border),
                Span::styled(format!("▣ {name} "), Style::default().fg(accent)),
                Span::styled(strip, Theme::muted_style()),
                Span::styled(format!("  {}/{count} · {mode}", current + 1), Theme::muted_style()),
            ]));
            let mut dots = vec![Span::styled("│ ", border)];
            for i in 0..count {
                let (glyph, style) = if i == current {
                    ("●", Style::default().fg(accent))
                } else {
                    ("○", Theme::muted_style())
                };
                dots.push(Span::styled(glyph, style));
                dots.push(Span::raw(" "));
            }
            lines.push(Line::from(dots));
        }

        lines.push(Line::from(Span::styled(
            format!("╰{}", "─".repeat(usize::from(width.saturating_sub(2)))),
            border,
        )));
        lines.push(Line::default());
        lines
    }
}

impl Widget for PageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let active = self.engine.scroll_state().active_index;
        let mut lines = self.intro_lines();
        for (position, entry) in self.engine.narrative().entries().iter().enumerate() {
            lines.extend(self.card_lines(entry, position, position == active, area.width));
        }
        if self.model.cards.is_empty() {
            lines.push(Line::from(Span::styled(
                "  Nothing on the timeline yet.",
                Theme::muted_style(),
            )));
        }
        lines.extend(self.footer_lines());

        let top = scroll_row(self.engine.viewport().scroll_y(), self.cell_height);
        Paragraph::new(lines).scroll((top, 0)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> PageModel {
        PageModel::build(&Narrative::sample())
    }

    #[test]
    fn cards_are_stacked_after_intro() {
        let m = model();
        assert_eq!(m.cards[0].top, INTRO_ROWS);
        for pair in m.cards.windows(2) {
            assert_eq!(pair[1].top, pair[0].top + pair[0].height);
        }
        let last = m.cards.last().unwrap();
        assert_eq!(m.container_top + m.container_rows, last.top + last.height);
        assert_eq!(m.document_rows, last.top + last.height + FOOTER_ROWS);
    }

    #[test]
    fn layout_converts_rows_to_units() {
        let m = model();
        let l = m.layout(30, 16.0);
        assert_eq!(l.viewport_height, 480.0);
        let c = l.container.unwrap();
        assert_eq!(c.top, f64::from(INTRO_ROWS) * 16.0);
        assert_eq!(c.height, f64::from(m.container_rows) * 16.0);
    }

    #[test]
    fn hit_testing_galleries_and_dots() {
        let m = model();
        // First sample entry: two achievements, three images.
        let card = m.cards[0];
        assert_eq!(card.image_row, card.top + 4);
        assert_eq!(m.gallery_at(card.image_row), Some(card.key));
        assert_eq!(m.gallery_at(card.top), None);

        let dots = card.dots_row();
        assert_eq!(m.dot_at(CONTENT_COL, dots), Some((card.key, 0)));
        assert_eq!(m.dot_at(CONTENT_COL + 4, dots), Some((card.key, 2)));
        assert_eq!(m.dot_at(CONTENT_COL + 1, dots), None);
        assert_eq!(m.dot_at(CONTENT_COL + 6, dots), None);
    }

    #[test]
    fn empty_gallery_is_not_a_swipe_target() {
        let m = model();
        let card = m.cards.iter().find(|c| c.image_count == 0).unwrap();
        assert_eq!(m.gallery_at(card.image_row), None);
        assert_eq!(m.dot_at(CONTENT_COL, card.dots_row()), None);
    }

    #[test]
    fn footer_fills_the_end_of_the_document() {
        use crate::core::arbiter::{InputEvent, NavKey};
        use crate::core::engine::{EngineConfig, JourneyEngine};

        let m = model();
        let mut engine = JourneyEngine::mount(Narrative::sample(), m.layout(23, 16.0), EngineConfig::default());
        engine.handle_input(InputEvent::Key(NavKey::End), None);

        let area = Rect::new(0, 0, 60, 23);
        let mut buf = Buffer::empty(area);
        PageWidget::new(&engine, &m, 16.0).render(area, &mut buf);
        let rows: Vec<String> = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect();
        // Last document row is the bottom of the viewport; the footer heading
        // sits FOOTER_ROWS - 1 rows above it.
        let heading = usize::from(area.height - FOOTER_ROWS + 1);
        assert!(rows[heading].contains("End of the journey"));
    }

    #[test]
    fn scroll_row_rounds_units() {
        assert_eq!(scroll_row(0.0, 16.0), 0);
        assert_eq!(scroll_row(25.0, 16.0), 2);
        assert_eq!(scroll_row(-5.0, 16.0), 0);
    }
}
