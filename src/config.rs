//! User configuration: key bindings and dial tuning.
//!
//! Stored as a flat `key = value` text file at
//! `$XDG_CONFIG_HOME/dial-picker/config.toml` (default
//! `~/.config/dial-picker/config.toml`).  Unknown keys and malformed values
//! are skipped so a hand-edited file never prevents startup.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::dial::DialConfig;
use crate::core::render::Rgba;

/// Floor for friction and spring constants read from the file.
const MIN_DECAY: f32 = 0.05;

// ───────────────────────────────────────── actions ───────────

/// Everything a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Previous item.
    StepUp,
    /// Next item.
    StepDown,
    PageUp,
    PageDown,
    /// Print the centered item and exit.
    Select,
    ToggleHaptics,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::StepUp,
        Action::StepDown,
        Action::PageUp,
        Action::PageDown,
        Action::Select,
        Action::ToggleHaptics,
        Action::Quit,
    ];

    fn config_key(self) -> &'static str {
        match self {
            Action::StepUp => "step_up",
            Action::StepDown => "step_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Select => "select",
            Action::ToggleHaptics => "toggle_haptics",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

/// A key code plus the CTRL/ALT/SHIFT modifiers that must be held.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && self.modifiers & MODIFIER_MASK == event.modifiers & MODIFIER_MASK
    }
}

/// Config-file form, e.g. `Ctrl+c`, `PageDown`, `k`.
impl fmt::Display for KeyBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                f.write_str(name)?;
            }
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Up => f.write_str("Up"),
            KeyCode::Down => f.write_str("Down"),
            KeyCode::Left => f.write_str("Left"),
            KeyCode::Right => f.write_str("Right"),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Esc => f.write_str("Esc"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::Home => f.write_str("Home"),
            KeyCode::End => f.write_str("End"),
            KeyCode::PageUp => f.write_str("PageUp"),
            KeyCode::PageDown => f.write_str("PageDown"),
            KeyCode::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

impl FromStr for KeyBind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mods, key) = match s.rsplit_once('+') {
            // A lone "+" is the plus key itself.
            Some((mods, "")) => (mods.strip_suffix('+').unwrap_or(mods), "+"),
            Some((mods, key)) => (mods, key),
            None => ("", s),
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in mods.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "ctrl" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return Err(()),
            };
        }

        let code = match key.to_ascii_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            lower if lower.len() > 1 && lower.starts_with('f') => {
                KeyCode::F(lower[1..].parse().map_err(|_| ())?)
            }
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(()),
                }
            }
        };
        Ok(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration: key bindings plus the dial's look and feel.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub dial: DialConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            dial: Self::default_dial(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(StepUp, vec![KeyBind::new(KeyCode::Up, n), KeyBind::new(KeyCode::Char('k'), n)]);
        m.insert(StepDown, vec![KeyBind::new(KeyCode::Down, n), KeyBind::new(KeyCode::Char('j'), n)]);
        m.insert(PageUp, vec![KeyBind::new(KeyCode::PageUp, n)]);
        m.insert(PageDown, vec![KeyBind::new(KeyCode::PageDown, n)]);
        m.insert(Select, vec![KeyBind::new(KeyCode::Enter, n), KeyBind::new(KeyCode::Char(' '), n)]);
        m.insert(ToggleHaptics, vec![KeyBind::new(KeyCode::Char('h'), n)]);
        m.insert(Quit, vec![KeyBind::new(KeyCode::Char('q'), n), KeyBind::new(KeyCode::Esc, n)]);
        m
    }

    /// Dial defaults for a dark terminal: light text fading into a black
    /// background, with horizontal spacing in columns.
    pub fn default_dial() -> DialConfig {
        DialConfig {
            text_color: Rgba::new(0xe6, 0xe6, 0xe6, 255),
            gradient_edge_color: Rgba::BLACK,
            description_start_padding: 2.0,
            ..DialConfig::default()
        }
    }

    /// Action bound to `event`.  The binding with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, bind)| bind.matches(event))
            .max_by_key(|(_, bind)| bind.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    fn first_binding(&self, action: Action) -> String {
        match self.bindings.get(&action).and_then(|b| b.first()) {
            Some(bind) => bind.to_string(),
            None => "?".into(),
        }
    }

    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{} or drag: turn | {}: select | {}: haptics | {}: quit",
            self.first_binding(Action::StepUp),
            self.first_binding(Action::StepDown),
            self.first_binding(Action::Select),
            self.first_binding(Action::ToggleHaptics),
            self.first_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load from `path` (or the default location), falling back to defaults
    /// when the file is missing or unreadable.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "config loaded");
                Self::parse(&contents)
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), "no config ({err}), using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: Option<&Path>) -> anyhow::Result<()> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&path, self.serialise())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn parse(s: &str) -> Self {
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

            if config.apply_dial_setting(key, value) {
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "unknown config key");
                continue;
            };
            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| part.trim().trim_matches('"').parse().ok())
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    /// Apply one dial setting.  Returns `false` if `key` is not a dial key.
    fn apply_dial_setting(&mut self, key: &str, value: &str) -> bool {
        fn set<T: FromStr>(slot: &mut T, value: &str) {
            if let Ok(v) = value.parse() {
                *slot = v;
            }
        }
        fn set_color(slot: &mut Rgba, value: &str) {
            if let Some(c) = Rgba::parse_hex(value.trim_matches('"')) {
                *slot = c;
            }
        }

        let d = &mut self.dial;
        match key {
            "text_color" => set_color(&mut d.text_color, value),
            "gradient_edge_color" => set_color(&mut d.gradient_edge_color, value),
            "gradient_middle_color" => set_color(&mut d.gradient_middle_color, value),
            "gradient_view_window" => {
                set(&mut d.gradient_view_window, value);
                d.gradient_view_window = d.gradient_view_window.clamp(0.0, 1.0);
            }
            "text_size" => set(&mut d.text_size, value),
            "leading" => {
                set(&mut d.leading, value);
                // Keep this positive, every row position derives from it.
                d.leading = d.leading.max(1.0);
            }
            "description" => d.description = value.trim_matches('"').to_string(),
            "description_text_size" => set(&mut d.description_text_size, value),
            "description_start_padding" => set(&mut d.description_start_padding, value),
            // Zero here would leave the fling or the magnet running forever.
            "magnet_damping_ratio" => {
                set(&mut d.magnet_damping_ratio, value);
                d.magnet_damping_ratio = d.magnet_damping_ratio.max(MIN_DECAY);
            }
            "magnet_stiffness" => {
                set(&mut d.magnet_stiffness, value);
                d.magnet_stiffness = d.magnet_stiffness.max(MIN_DECAY);
            }
            "magnet_engage_speed" => set(&mut d.magnet_engage_speed, value),
            "friction" => {
                set(&mut d.friction, value);
                d.friction = d.friction.max(MIN_DECAY);
            }
            "max_fling_velocity" => set(&mut d.max_fling_velocity, value),
            "velocity_window_ms" => set(&mut d.velocity_window_ms, value),
            "tap_slop" => set(&mut d.tap_slop, value),
            "min_visible_change" => set(&mut d.min_visible_change, value),
            "haptic_feedback" => d.haptic_feedback = value == "true",
            _ => return false,
        }
        true
    }

    fn serialise(&self) -> String {
        let d = &self.dial;
        let mut lines = vec![
            "# dial-picker configuration".to_string(),
            String::new(),
            "# Look".to_string(),
            format!("text_color = {}", d.text_color.to_hex()),
            format!("gradient_edge_color = {}", d.gradient_edge_color.to_hex()),
            format!("gradient_middle_color = {}", d.gradient_middle_color.to_hex()),
            format!("gradient_view_window = {}", d.gradient_view_window),
            format!("text_size = {}", d.text_size),
            format!("leading = {}", d.leading),
            format!("description = \"{}\"", d.description),
            format!("description_text_size = {}", d.description_text_size),
            format!("description_start_padding = {}", d.description_start_padding),
            String::new(),
            "# Feel".to_string(),
            format!("magnet_damping_ratio = {}", d.magnet_damping_ratio),
            format!("magnet_stiffness = {}", d.magnet_stiffness),
            format!("magnet_engage_speed = {}", d.magnet_engage_speed),
            format!("friction = {}", d.friction),
            format!("max_fling_velocity = {}", d.max_fling_velocity),
            format!("velocity_window_ms = {}", d.velocity_window_ms),
            format!("tap_slop = {}", d.tap_slop),
            format!("min_visible_change = {}", d.min_visible_change),
            format!("haptic_feedback = {}", d.haptic_feedback),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(ToString::to_string).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let home = std::env::var_os("HOME").unwrap_or_else(|| ".".into());
            PathBuf::from(home).join(fallback)
        })
}

/// `$XDG_CONFIG_HOME/dial-picker/config.toml`.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
        .join(env!("CARGO_PKG_NAME"))
        .join("config.toml")
}

/// `$XDG_STATE_HOME/dial-picker/state`, where the last position is kept.
pub fn state_path() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state")
        .join(env!("CARGO_PKG_NAME"))
        .join("state")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_keybind_parse_and_display() {
        let bind: KeyBind = "Ctrl+Shift+PageDown".parse().unwrap();
        assert_eq!(bind.code, KeyCode::PageDown);
        assert_eq!(bind.modifiers, KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(bind.to_string(), "Ctrl+Shift+PageDown");

        assert_eq!("space".parse::<KeyBind>().unwrap().code, KeyCode::Char(' '));
        assert_eq!("F5".parse::<KeyBind>().unwrap().code, KeyCode::F(5));
        assert_eq!("Alt++".parse::<KeyBind>().unwrap().code, KeyCode::Char('+'));
        assert!("Hyper+x".parse::<KeyBind>().is_err());
        assert!("xyz".parse::<KeyBind>().is_err());
    }

    #[test]
    fn test_match_key_ignores_super() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Char('j'), KeyModifiers::SUPER)),
            Some(Action::StepDown)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_parse_reads_dial_values_and_bindings() {
        let config = AppConfig::parse(
            "# comment\n\
             [dial]\n\
             leading = 40\n\
             magnet_stiffness = 120.5\n\
             haptic_feedback = false\n\
             text_color = #ff8800\n\
             description = \"sec\"\n\
             velocity_window_ms = 250\n\
             step_down = n, Ctrl+n\n\
             nonsense = 3\n\
             friction = fast\n",
        );
        assert_eq!(config.dial.leading, 40.0);
        assert_eq!(config.dial.magnet_stiffness, 120.5);
        assert!(!config.dial.haptic_feedback);
        assert_eq!(config.dial.text_color, Rgba::new(0xff, 0x88, 0, 255));
        assert_eq!(config.dial.description, "sec");
        assert_eq!(config.dial.velocity_window_ms, 250);
        // Unparseable value keeps the default.
        assert_eq!(config.dial.friction, 1.0);
        assert_eq!(
            config.match_key(key(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(Action::StepDown)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('j'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_serialise_round_trip() {
        let mut config = AppConfig::default();
        config.dial.magnet_damping_ratio = 0.5;
        config.dial.gradient_middle_color = Rgba::new(1, 2, 3, 4);
        config.dial.description = "items".into();
        config
            .bindings
            .insert(Action::Select, vec![KeyBind::new(KeyCode::Tab, KeyModifiers::ALT)]);

        let reparsed = AppConfig::parse(&config.serialise());
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.dial.friction = 2.5;
        config.save(Some(path.as_path())).unwrap();

        assert_eq!(AppConfig::load(Some(path.as_path())).dial.friction, 2.5);
        assert_eq!(
            AppConfig::load(Some(dir.path().join("missing").as_path())),
            AppConfig::default()
        );
    }

    #[test]
    fn test_leading_is_kept_positive() {
        assert_eq!(AppConfig::parse("leading = -3").dial.leading, 1.0);
    }

    #[test]
    fn test_motion_decay_is_kept_positive() {
        let config = AppConfig::parse(
            "friction = 0\n\
             magnet_damping_ratio = -1\n\
             magnet_stiffness = 0\n",
        );
        assert_eq!(config.dial.friction, MIN_DECAY);
        assert_eq!(config.dial.magnet_damping_ratio, MIN_DECAY);
        assert_eq!(config.dial.magnet_stiffness, MIN_DECAY);
        assert_eq!(AppConfig::parse("friction = 0.5").dial.friction, 0.5);
    }
}
