use ratatui::style::Color;

use super::{colors::hex_to_color, Theme};

pub struct TokyoNight;

impl Theme for TokyoNight {
    fn name(&self) -> &'static str {
        "Tokyo Night"
    }

    fn background(&self) -> Color {
        hex_to_color(0x1a1b26)
    }

    fn foreground(&self) -> Color {
        hex_to_color(0xc0caf5)
    }

    fn foreground_dim(&self) -> Color {
        hex_to_color(0x565f89)
    }

    fn surface(&self) -> Color {
        hex_to_color(0x24283b)
    }

    fn border(&self) -> Color {
        hex_to_color(0x414868)
    }

    fn selection(&self) -> Color {
        hex_to_color(0x364a82)
    }

    fn accent(&self) -> Color {
        hex_to_color(0x7aa2f7)
    }

    fn success(&self) -> Color {
        hex_to_color(0x9ece6a)
    }

    fn warning(&self) -> Color {
        hex_to_color(0xe0af68)
    }

    fn error(&self) -> Color {
        hex_to_color(0xf7768e)
    }
}

/// Terminal default colors, used when `display.color` is off or `NO_COLOR` is set.
pub struct Monochrome;

impl Theme for Monochrome {
    fn name(&self) -> &'static str {
        "Monochrome"
    }

    fn background(&self) -> Color {
        Color::Reset
    }

    fn foreground(&self) -> Color {
        Color::Reset
    }

    fn foreground_dim(&self) -> Color {
        Color::Reset
    }

    fn surface(&self) -> Color {
        Color::Reset
    }

    fn border(&self) -> Color {
        Color::Reset
    }

    fn selection(&self) -> Color {
        Color::Reset
    }

    fn accent(&self) -> Color {
        Color::Reset
    }

    fn success(&self) -> Color {
        Color::Reset
    }

    fn warning(&self) -> Color {
        Color::Reset
    }

    fn error(&self) -> Color {
        Color::Reset
    }
}
