//! Color palette and style helpers for the TUI

use ratatui::style::{Color, Modifier, Style};

/// Dark broadcast-style palette
pub struct Theme;

impl Theme {
    /// Background: deep slate
    pub const BACKGROUND: Color = Color::Rgb(0x10, 0x12, 0x18);

    /// Primary: signal teal
    pub const PRIMARY: Color = Color::Rgb(0x2d, 0xd4, 0xbf);

    /// Accent: amber
    pub const ACCENT: Color = Color::Rgb(0xfb, 0xbf, 0x24);

    /// Text: soft white
    pub const TEXT: Color = Color::Rgb(0xd8, 0xdc, 0xe4);

    /// Dim: muted slate
    pub const DIM: Color = Color::Rgb(0x4b, 0x52, 0x63);

    /// Success: green
    pub const SUCCESS: Color = Color::Rgb(0x34, 0xd3, 0x7b);

    /// Warning: orange
    pub const WARNING: Color = Color::Rgb(0xf9, 0x9a, 0x3c);

    /// Error: red
    pub const ERROR: Color = Color::Rgb(0xef, 0x44, 0x4f);

    /// Border color (dim teal)
    pub const BORDER: Color = Color::Rgb(0x1d, 0x6d, 0x64);

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Dimmed/muted text
    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Accent text (hints, markers)
    pub fn accent() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Panel title
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Highlighted list row (inverted)
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Active tab / selected category
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Keybinding hint
    pub fn keybind() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Unfocused border
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Text input content
    pub fn input() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Loading indicator
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::SLOW_BLINK)
    }

    /// Error text
    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    /// Success text
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Warning text
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    /// Status bar background
    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Color::Rgb(0x1a, 0x1d, 0x26))
    }
}
