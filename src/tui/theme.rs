use ratatui::style::Color;

use crate::model::UiConfig;
use crate::timeline::DisplayKind;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    /// Row the playback cursor is on
    pub current_step: Color,
    /// Rows matched by the selected query
    pub matched: Color,
    /// Non-matched rows while query focus is active
    pub greyed: Color,
    /// Rows past the playback cursor
    pub future: Color,
    pub event: Color,
    pub query: Color,
    pub prompt_request: Color,
    pub prompt_request_incomplete: Color,
    pub prompt_completion: Color,
    pub other: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x14, 0x18),
            text: Color::Rgb(0xC8, 0xCC, 0xD4),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x6A, 0x70, 0x78),
            selection_bg: Color::Rgb(0x2A, 0x2F, 0x3A),
            selection_border: Color::Rgb(0xB3, 0x8C, 0x00),
            current_step: Color::Rgb(0xB3, 0x8C, 0x00),
            matched: Color::Rgb(0xE6, 0x7E, 0x22),
            greyed: Color::Rgb(0x5A, 0x5E, 0x66),
            future: Color::Rgb(0x8A, 0x90, 0x98),
            event: Color::Rgb(0x6B, 0xBF, 0x69),
            query: Color::Rgb(0x20, 0xA0, 0xB1),
            prompt_request: Color::Rgb(0x5B, 0x9B, 0xD5),
            prompt_request_incomplete: Color::Rgb(0xF1, 0x75, 0x75),
            prompt_completion: Color::Rgb(0x2C, 0x5A, 0xA0),
            other: Color::Rgb(0x9B, 0x7F, 0xC4),
        }
    }
}

/// Parse a hex color string like "#E67E22" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from viewer config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "dim" => theme.dim = color,
                    "selection_bg" => theme.selection_bg = color,
                    "selection_border" => theme.selection_border = color,
                    "current_step" => theme.current_step = color,
                    "matched" => theme.matched = color,
                    "greyed" => theme.greyed = color,
                    "future" => theme.future = color,
                    "event" => theme.event = color,
                    "query" => theme.query = color,
                    "prompt_request" => theme.prompt_request = color,
                    "prompt_request_incomplete" => theme.prompt_request_incomplete = color,
                    "prompt_completion" => theme.prompt_completion = color,
                    "other" => theme.other = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Base color for a timeline entry kind. Prompt requests without a
    /// resolvable completion use the incomplete variant.
    pub fn kind_color(&self, kind: DisplayKind, complete: bool) -> Color {
        match kind {
            DisplayKind::Event => self.event,
            DisplayKind::Query => self.query,
            DisplayKind::PromptRequest => {
                if complete {
                    self.prompt_request
                } else {
                    self.prompt_request_incomplete
                }
            }
            DisplayKind::PromptCompletion => self.prompt_completion,
            DisplayKind::Other => self.other,
        }
    }
}
