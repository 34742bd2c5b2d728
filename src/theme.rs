use iced::Color;
use serde::{Deserialize, Serialize};

// ─── BRAND ──────────────────────────────────────────────────────

/// Mobilis green, used for primary actions and healthy readings.
pub const BRAND_GREEN: Color = hex(0x2d, 0xa8, 0x36);
/// Mobilis red, used for destructive actions and critical readings.
pub const BRAND_RED: Color = hex(0xd7, 0x24, 0x2d);

// ─── THEME MODE ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(self, ThemeMode::Light)
    }

    /// Translation key of the action that switches away from this mode.
    pub fn toggle_key(&self) -> &'static str {
        match self {
            ThemeMode::Light => "dark_mode",
            ThemeMode::Dark => "light_mode",
        }
    }

    pub fn iced_theme(&self) -> iced::Theme {
        match self {
            ThemeMode::Light => iced::Theme::Light,
            ThemeMode::Dark => iced::Theme::Dark,
        }
    }
}

// ─── PALETTE ────────────────────────────────────────────────────

/// All semantic colors the app uses for one mode.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub panel_bg: Color,
    pub sidebar_bg: Color,
    pub border: Color,
    pub grid: Color,
    pub label: Color,
    pub text: Color,
    pub bar_bg: Color,
    // Semantic
    pub accent: Color,
    pub green: Color,
    pub red: Color,
    pub yellow: Color,
    pub cyan: Color,
    pub magenta: Color,
    pub blue: Color,
}

pub fn build_palette(mode: ThemeMode) -> Palette {
    match mode {
        ThemeMode::Light => Palette {
            bg:         hex(0xf8, 0xfa, 0xfc),
            panel_bg:   hex(0xff, 0xff, 0xff),
            sidebar_bg: hex(0xf1, 0xf5, 0xf9),
            border:     hex(0xe2, 0xe8, 0xf0),
            grid:       Color::from_rgba(0.0, 0.0, 0.0, 0.06),
            label:      hex(0x64, 0x74, 0x8b),
            text:       hex(0x0f, 0x17, 0x2a),
            bar_bg:     hex(0xe2, 0xe8, 0xf0),
            accent:     BRAND_GREEN,
            green:      BRAND_GREEN,
            red:        BRAND_RED,
            yellow:     hex(0xea, 0xb3, 0x08),
            cyan:       hex(0x06, 0xb6, 0xd4),
            magenta:    hex(0x8b, 0x5c, 0xf6),
            blue:       hex(0x25, 0x63, 0xeb),
        },
        ThemeMode::Dark => Palette {
            bg:         hex(0x0f, 0x17, 0x2a),
            panel_bg:   hex(0x1e, 0x29, 0x3b),
            sidebar_bg: hex(0x02, 0x06, 0x17),
            border:     hex(0x33, 0x41, 0x55),
            grid:       Color::from_rgba(1.0, 1.0, 1.0, 0.06),
            label:      hex(0x94, 0xa3, 0xb8),
            text:       hex(0xf1, 0xf5, 0xf9),
            bar_bg:     hex(0x33, 0x41, 0x55),
            accent:     hex(0x4a, 0xc4, 0x53),
            green:      hex(0x4a, 0xc4, 0x53),
            red:        hex(0xef, 0x4a, 0x52),
            yellow:     hex(0xfa, 0xcc, 0x15),
            cyan:       hex(0x22, 0xd3, 0xee),
            magenta:    hex(0xa7, 0x8b, 0xfa),
            blue:       hex(0x60, 0xa5, 0xfa),
        },
    }
}

const fn hex(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Light.toggled().toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Dark.toggle_key(), "light_mode");
    }

    #[test]
    fn test_light_palette_uses_brand_colors() {
        let p = build_palette(ThemeMode::Light);
        assert_eq!(p.accent, BRAND_GREEN);
        assert_eq!(p.red, BRAND_RED);
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ThemeMode::Dark).unwrap(), r#""dark""#);
    }
}
