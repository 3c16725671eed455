//! User configuration: keybindings, page tunables and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/journey/config.toml` (default `~/.config/journey/config.toml`).
//! Scroll keys (arrows, PgUp/PgDn, Home/End, Space) are fixed; only the
//! actions below can be rebound.

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::engine::EngineConfig;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the journey page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    StartTour,
    NextImage,
    PrevImage,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used when serialising).
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::StartTour,
        Action::NextImage,
        Action::PrevImage,
        Action::Quit,
    ];

    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::StartTour => "start_tour",
            Action::NextImage => "next_image",
            Action::PrevImage => "prev_image",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match (self.code, pretty) {
            (KeyCode::Char(' '), _) => "Space".into(),
            (KeyCode::Char(c), _) => c.to_string(),
            (KeyCode::Up, true) => "↑".into(),
            (KeyCode::Down, true) => "↓".into(),
            (KeyCode::Left, true) => "←".into(),
            (KeyCode::Right, true) => "→".into(),
            (KeyCode::Up, false) => "Up".into(),
            (KeyCode::Down, false) => "Down".into(),
            (KeyCode::Left, false) => "Left".into(),
            (KeyCode::Right, false) => "Right".into(),
            (KeyCode::Enter, _) => "Enter".into(),
            (KeyCode::Esc, _) => "Esc".into(),
            (KeyCode::Tab, _) => "Tab".into(),
            (KeyCode::F(n), _) => format!("F{n}"),
            (other, _) => format!("{other:?}"),
        });
        s
    }

    /// User-friendly display string (e.g. `"→"`, `"Ctrl+t"`).
    pub fn display(&self) -> String {
        self.render(true)
    }

    fn to_config_string(&self) -> String {
        self.render(false)
    }

    /// Parse a key string like `"Ctrl+t"`, `"Right"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration: keybindings and page tunables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Frame interval for animation ticks.
    pub frame_ms: u64,
    /// Constrained profile: progress recomputed at most every 20ms.
    pub constrained: bool,
    /// Units scrolled per mouse-wheel notch.
    pub wheel_step: f64,
    /// Units per terminal column / row.
    pub cell_width: f64,
    pub cell_height: f64,
    /// Rows of padding below the timeline at the end of the tour.
    pub tour_padding_rows: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            frame_ms: 16,
            constrained: false,
            wheel_step: 48.0,
            cell_width: 8.0,
            cell_height: 16.0,
            tour_padding_rows: 2,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(StartTour, vec![KeyBind::new(Char('t'), n), KeyBind::new(Enter, n)]);
        m.insert(NextImage, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(PrevImage, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action that matches a key event; the binding with the most
    /// modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: guided tour | {}/{}: images | wheel/drag: scroll | {}: quit",
            self.short_binding(Action::StartTour),
            self.short_binding(Action::PrevImage),
            self.short_binding(Action::NextImage),
            self.short_binding(Action::Quit),
        )
    }

    /// Engine tunables derived from the page settings.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            constrained: self.constrained,
            tour_padding: f64::from(self.tour_padding_rows) * self.cell_height,
            line_step: self.cell_height * 3.0,
            ..EngineConfig::default()
        }
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(_) => Self::default(),
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "frame_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.frame_ms = v.clamp(4, 100);
                    }
                    continue;
                }
                "constrained" => {
                    config.constrained = value == "true";
                    continue;
                }
                "wheel_step" => {
                    if let Ok(v) = value.parse::<f64>() {
                        config.wheel_step = v.max(1.0);
                    }
                    continue;
                }
                "cell_width" => {
                    if let Ok(v) = value.parse::<f64>() {
                        config.cell_width = v.max(1.0);
                    }
                    continue;
                }
                "cell_height" => {
                    if let Ok(v) = value.parse::<f64>() {
                        config.cell_height = v.max(1.0);
                    }
                    continue;
                }
                "tour_padding_rows" => {
                    if let Ok(v) = value.parse::<u16>() {
                        config.tour_padding_rows = v;
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# journey configuration".to_string(),
            String::new(),
            "# Page settings".to_string(),
            format!("frame_ms = {}", self.frame_ms),
            format!("constrained = {}", self.constrained),
            format!("wheel_step = {}", self.wheel_step),
            format!("cell_width = {}", self.cell_width),
            format!("cell_height = {}", self.cell_height),
            format!("tour_padding_rows = {}", self.tour_padding_rows),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/journey/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("journey").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_bindings_resolve() {
        let c = AppConfig::default();
        assert_eq!(c.match_key(key(KeyCode::Char('t'))), Some(Action::StartTour));
        assert_eq!(c.match_key(key(KeyCode::Right)), Some(Action::NextImage));
        assert_eq!(c.match_key(key(KeyCode::Up)), Some(Action::ScrollUp));
        assert_eq!(c.match_key(key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn parse_overrides_settings_and_bindings() {
        let c = AppConfig::parse_config(
            "# comment\nframe_ms = 500\nconstrained = true\nwheel_step = 24\nstart_tour = Ctrl+g, F5\nbogus = x\n",
        );
        assert_eq!(c.frame_ms, 100);
        assert!(c.constrained);
        assert_eq!(c.wheel_step, 24.0);
        let ctrl_g = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL);
        assert_eq!(c.match_key(ctrl_g), Some(Action::StartTour));
        assert_eq!(c.match_key(key(KeyCode::F(5))), Some(Action::StartTour));
        assert_eq!(c.match_key(key(KeyCode::Char('t'))), None);
    }

    #[test]
    fn serialise_then_parse_keeps_bindings() {
        let mut c = AppConfig::default();
        c.tour_padding_rows = 5;
        let back = AppConfig::parse_config(&c.serialise());
        assert_eq!(back.tour_padding_rows, 5);
        for action in Action::ALL {
            assert_eq!(back.bindings.get(action), c.bindings.get(action));
        }
    }

    #[test]
    fn engine_config_scales_by_cell_height() {
        let c = AppConfig::default();
        let e = c.engine_config();
        assert_eq!(e.tour_padding, 32.0);
        assert_eq!(e.line_step, 48.0);
        // Default page geometry and engine defaults agree.
        let d = EngineConfig::default();
        assert_eq!((e.tour_padding, e.line_step), (d.tour_padding, d.line_step));
    }
}
