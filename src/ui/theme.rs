//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── timeline ───────────────────────────────────────────────

    /// Map an entry's opaque colour token to a terminal colour.
    /// Unknown tokens fall back to cyan.
    pub fn token_color(token: &str) -> Color {
        match token.trim().to_ascii_lowercase().as_str() {
            "red" | "rose" => Color::LightRed,
            "green" | "emerald" => Color::LightGreen,
            "yellow" | "amber" => Color::Yellow,
            "blue" | "indigo" => Color::LightBlue,
            "magenta" | "purple" | "violet" => Color::LightMagenta,
            "white" | "slate" => Color::White,
            _ => Color::Cyan,
        }
    }

    pub fn entry_title_style(accent: Color, active: bool) -> Style {
        let style = Style::default().fg(accent);
        if active {
            style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            style
        }
    }

    pub fn muted_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn tour_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_map_case_insensitively() {
        assert_eq!(Theme::token_color("Blue"), Color::LightBlue);
        assert_eq!(Theme::token_color(" amber "), Color::Yellow);
        assert_eq!(Theme::token_color("from-sky-500"), Color::Cyan);
    }
}
