use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::task::Priority;

/// Color theme for the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub selection_bg: Color,
    /// Priority label colors
    pub low: Color,
    pub medium: Color,
    pub high: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            low: Color::Rgb(0x44, 0x88, 0xFF),
            medium: Color::Rgb(0xFF, 0xD7, 0x00),
            high: Color::Rgb(0xFF, 0x44, 0x44),
        }
    }
}

/// Parse a hex color string like "#FF4444"
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

impl Theme {
    /// Defaults with `[ui.colors]` overrides applied. Unknown keys and
    /// malformed values are skipped.
    pub fn from_colors(colors: &HashMap<String, String>) -> Self {
        let mut theme = Theme::default();
        for (key, value) in colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring malformed color");
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "highlight" => &mut theme.highlight,
                "dim" => &mut theme.dim,
                "red" => &mut theme.red,
                "selection_bg" => &mut theme.selection_bg,
                "low" => &mut theme.low,
                "medium" => &mut theme.medium,
                "high" => &mut theme.high,
                _ => continue,
            };
            *slot = color;
        }
        theme
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
        }
    }
}
