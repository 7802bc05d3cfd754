use ratatui::style::{Color, Modifier, Style};
use rosterboard_core::MagnetColor;

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const SECONDARY: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

// Magnet faces, matching the exported image
const MAGNET_WHITE: Color = Color::Rgb(245, 245, 245);
const MAGNET_YELLOW: Color = Color::Rgb(250, 220, 90);
const MAGNET_TEXT: Color = Color::Rgb(20, 20, 20);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        muted_style()
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

/// The armed staff member's pool entry.
pub fn armed_style() -> Style {
    Style::default()
        .fg(SECONDARY)
        .add_modifier(Modifier::BOLD)
}

pub fn magnet_style(color: MagnetColor) -> Style {
    let bg = match color {
        MagnetColor::White => MAGNET_WHITE,
        MagnetColor::Yellow => MAGNET_YELLOW,
    };
    Style::default().bg(bg).fg(MAGNET_TEXT)
}

pub fn cursor_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD)
}
