//! Kanagawa Dragon theme module.
//!
//! Low-contrast, warm, dark palette carried over from the Kanagawa Dragon
//! scheme, with semantic colors for the life-calendar grid: weeks you have
//! lived, the week you are in, and the weeks still ahead.

use ratatui::style::Color;

pub mod colors {
    use super::Color;

    // === Background Colors ===
    /// Dragon Black - Primary background
    pub const BG_DARK: Color = Color::Rgb(0x18, 0x16, 0x16);
    /// Slightly lighter background for panels
    pub const BG_MEDIUM: Color = Color::Rgb(0x1D, 0x1C, 0x19);
    /// Background for highlighted/selected areas
    pub const BG_HIGHLIGHT: Color = Color::Rgb(0x28, 0x27, 0x27);

    // === Foreground Colors ===
    /// Old White - Primary text color
    pub const FG_PRIMARY: Color = Color::Rgb(0xC5, 0xC9, 0xC5);
    /// Dimmed text for secondary information
    pub const FG_DIM: Color = Color::Rgb(0x72, 0x71, 0x69);
    /// Very dim text for hints and placeholders
    pub const FG_HINT: Color = Color::Rgb(0x54, 0x54, 0x54);

    // === Accent Colors ===
    pub const RED: Color = Color::Rgb(0xC4, 0x74, 0x6E);
    pub const GREEN: Color = Color::Rgb(0x8A, 0x9A, 0x7B);
    pub const YELLOW: Color = Color::Rgb(0xC4, 0xB2, 0x8A);
    pub const BLUE: Color = Color::Rgb(0x8B, 0xA4, 0xB0);
    pub const PURPLE: Color = Color::Rgb(0x95, 0x7F, 0xB8);

    // === UI Element Colors ===
    pub const BORDER: Color = Color::Rgb(0x72, 0x71, 0x69);
    pub const BORDER_DIM: Color = Color::Rgb(0x3A, 0x3A, 0x3A);
    pub const BORDER_ACCENT: Color = BLUE;

    // === Calendar Colors ===
    /// Weeks (and days, hours, minutes) already lived
    pub const CELL_PAST: Color = Color::Rgb(0x2D, 0xB3, 0xA4);
    /// The bucket containing "now"
    pub const CELL_CURRENT: Color = Color::Rgb(0xE6, 0xC3, 0x5C);
    /// Time not yet reached
    pub const CELL_FUTURE: Color = Color::Rgb(0x3C, 0x3A, 0x38);
    /// Pre-birth and post-death phantom rows
    pub const CELL_PHANTOM: Color = Color::Rgb(0x40, 0x33, 0x55);
    /// Divider above the first life year
    pub const BIRTH_LINE: Color = GREEN;
    /// Divider below the last life year
    pub const DEATH_LINE: Color = RED;
    /// Particle ambience
    pub const PARTICLE_SAND: Color = Color::Rgb(0x9B, 0x8E, 0x74);
}

/// Semantic styling helpers
pub mod styles {
    use super::colors;
    use ratatui::style::{Modifier, Style};

    pub fn text() -> Style {
        Style::default().fg(colors::FG_PRIMARY)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(colors::FG_DIM)
    }

    pub fn text_hint() -> Style {
        Style::default().fg(colors::FG_HINT)
    }

    pub fn warning() -> Style {
        Style::default().fg(colors::YELLOW)
    }

    pub fn error() -> Style {
        Style::default().fg(colors::RED)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(colors::FG_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_accent() -> Style {
        Style::default()
            .fg(colors::PURPLE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(colors::BORDER)
    }

    pub fn border_dim() -> Style {
        Style::default().fg(colors::BORDER_DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(colors::BORDER_ACCENT)
    }

    /// Inline preference field while it is being edited
    pub fn field_editing() -> Style {
        Style::default()
            .fg(colors::FG_PRIMARY)
            .bg(colors::BG_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn field_value() -> Style {
        Style::default().fg(colors::BLUE)
    }
}
