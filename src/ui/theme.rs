//! Centralized theming for the burnmail TUI
//!
//! A `Theme` is built once from the configured variant and handed to the
//! render thread; every widget takes it by reference.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

use crate::config::ThemeVariant;

/// Pink and cyan accents over the terminal's own background
#[allow(dead_code)]
mod burn {
    use super::Color;

    pub const PINK: Color = Color::Rgb(255, 107, 157); // #ff6b9d - title, dialogs
    pub const CYAN: Color = Color::Rgb(0, 217, 255); // #00d9ff - headers, keys, focus
    pub const GREEN: Color = Color::Rgb(0, 255, 135); // #00ff87 - status line
    pub const GRAY: Color = Color::Rgb(136, 136, 136); // #888888 - help text
    pub const DIM: Color = Color::Rgb(85, 85, 85); // #555555 - separators
    pub const LIGHT: Color = Color::Rgb(204, 204, 204); // #cccccc - descriptions
    pub const SELECTED_FG: Color = Color::Indexed(229);
    pub const SELECTED_BG: Color = Color::Indexed(57);
    pub const SPINNER: Color = Color::Indexed(205);
}

/// Catppuccin Mocha color palette for the Modern theme
#[allow(dead_code)]
mod catppuccin {
    use super::Color;

    // Background layers (darkest to lightest)
    pub const BASE: Color = Color::Rgb(30, 30, 46); // #1e1e2e - main background
    pub const MANTLE: Color = Color::Rgb(24, 24, 37); // #181825 - status bar, panels
    pub const SURFACE0: Color = Color::Rgb(49, 50, 68); // #313244 - borders
    pub const SURFACE1: Color = Color::Rgb(69, 71, 90); // #45475a - selection

    // Text colors
    pub const TEXT: Color = Color::Rgb(205, 214, 244); // #cdd6f4 - primary
    pub const SUBTEXT1: Color = Color::Rgb(186, 194, 222); // #bac2de - secondary
    pub const OVERLAY0: Color = Color::Rgb(108, 112, 134); // #6c7086 - muted/disabled

    // Accent colors
    pub const LAVENDER: Color = Color::Rgb(180, 190, 254); // #b4befe - focused borders
    pub const BLUE: Color = Color::Rgb(137, 180, 250); // #89b4fa - links, accent
    pub const GREEN: Color = Color::Rgb(166, 227, 161); // #a6e3a1 - success
    pub const YELLOW: Color = Color::Rgb(249, 226, 175); // #f9e2af - keys
    pub const PEACH: Color = Color::Rgb(250, 179, 135); // #fab387 - bulk selection
    pub const RED: Color = Color::Rgb(243, 139, 168); // #f38ba8 - errors
    pub const MAUVE: Color = Color::Rgb(203, 166, 247); // #cba6f7 - title, unread
}

/// UI symbols - centralized for consistency
pub mod symbols {
    pub const UNREAD: &str = "●";
    pub const READ: &str = " ";
    pub const BULLET: &str = "▸";
    pub const SEPARATOR: &str = "─";
    pub const AUTO_REFRESH: &str = "↻";
    pub const WARNING: &str = "⚠";
}

/// Colors that vary by theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    bg_main: Color,
    bg_selection: Color,
    bg_status: Color,
    bg_error: Color,
    fg_primary: Color,
    fg_secondary: Color,
    fg_muted: Color,
    fg_title: Color,
    fg_accent: Color,
    fg_key: Color,
    fg_status: Color,
    fg_selection: Color,
    fg_marked: Color,
    fg_spinner: Color,
    border: Color,
    border_focused: Color,
}

impl Palette {
    fn burn() -> Self {
        Self {
            bg_main: Color::Reset,
            bg_selection: burn::SELECTED_BG,
            bg_status: Color::Reset,
            bg_error: Color::Red,
            fg_primary: Color::Reset,
            fg_secondary: burn::LIGHT,
            fg_muted: burn::GRAY,
            fg_title: burn::PINK,
            fg_accent: burn::CYAN,
            fg_key: burn::CYAN,
            fg_status: burn::GREEN,
            fg_selection: burn::SELECTED_FG,
            fg_marked: burn::PINK,
            fg_spinner: burn::SPINNER,
            border: burn::DIM,
            border_focused: burn::CYAN,
        }
    }

    fn modern() -> Self {
        Self {
            bg_main: catppuccin::BASE,
            bg_selection: catppuccin::SURFACE1,
            bg_status: catppuccin::MANTLE,
            bg_error: catppuccin::RED,
            fg_primary: catppuccin::TEXT,
            fg_secondary: catppuccin::SUBTEXT1,
            fg_muted: catppuccin::OVERLAY0,
            fg_title: catppuccin::MAUVE,
            fg_accent: catppuccin::BLUE,
            fg_key: catppuccin::YELLOW,
            fg_status: catppuccin::GREEN,
            fg_selection: catppuccin::TEXT,
            fg_marked: catppuccin::PEACH,
            fg_spinner: catppuccin::MAUVE,
            border: catppuccin::SURFACE0,
            border_focused: catppuccin::LAVENDER,
        }
    }

    fn high_contrast() -> Self {
        Self {
            bg_main: Color::Black,
            bg_selection: Color::White,
            bg_status: Color::Black,
            bg_error: Color::Red,
            fg_primary: Color::White,
            fg_secondary: Color::White,
            fg_muted: Color::Gray,
            fg_title: Color::LightYellow,
            fg_accent: Color::LightCyan,
            fg_key: Color::LightYellow,
            fg_status: Color::LightGreen,
            fg_selection: Color::Black,
            fg_marked: Color::LightMagenta,
            fg_spinner: Color::LightYellow,
            border: Color::White,
            border_focused: Color::LightCyan,
        }
    }
}

/// Pre-composed styles for common UI elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    variant: ThemeVariant,
    palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        let palette = match variant {
            ThemeVariant::Burn => Palette::burn(),
            ThemeVariant::Modern => Palette::modern(),
            ThemeVariant::HighContrast => Palette::high_contrast(),
        };
        Self { variant, palette }
    }

    // === Borders ===

    /// Border type for popups and modals (rounded for RGB themes)
    pub fn popup_border_type(&self) -> BorderType {
        match self.variant {
            ThemeVariant::Modern | ThemeVariant::Burn => BorderType::Rounded,
            ThemeVariant::HighContrast => BorderType::Double,
        }
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.palette.border)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.palette.border_focused)
    }

    /// Border of the confirmation dialog
    pub fn border_dialog(&self) -> Style {
        Style::default().fg(self.palette.fg_title)
    }

    // === Text Styles ===

    /// Normal text (with main background)
    pub fn text(&self) -> Style {
        Style::default()
            .fg(self.palette.fg_primary)
            .bg(self.palette.bg_main)
    }

    /// Secondary/read text
    pub fn text_secondary(&self) -> Style {
        self.text().fg(self.palette.fg_secondary)
    }

    /// Muted/disabled text
    pub fn text_muted(&self) -> Style {
        self.text().fg(self.palette.fg_muted)
    }

    /// Unread/bold text
    pub fn text_unread(&self) -> Style {
        self.text().add_modifier(Modifier::BOLD)
    }

    pub fn text_accent(&self) -> Style {
        self.text().fg(self.palette.fg_accent)
    }

    /// Rows marked for bulk deletion
    pub fn text_marked(&self) -> Style {
        self.text().fg(self.palette.fg_marked)
    }

    pub fn title(&self) -> Style {
        self.text()
            .fg(self.palette.fg_title)
            .add_modifier(Modifier::BOLD)
    }

    /// Field labels, table headers and help section headings
    pub fn header(&self) -> Style {
        self.text()
            .fg(self.palette.fg_accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn spinner(&self) -> Style {
        self.text().fg(self.palette.fg_spinner)
    }

    // === Selection Styles ===

    /// Base style for the cursor row
    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.palette.bg_selection)
            .fg(self.palette.fg_selection)
    }

    // === Status Bar ===

    pub fn status_bar(&self) -> Style {
        Style::default()
            .bg(self.palette.bg_status)
            .fg(self.palette.fg_primary)
    }

    pub fn status_message(&self) -> Style {
        self.status_bar().fg(self.palette.fg_status)
    }

    pub fn status_error(&self) -> Style {
        self.status_bar()
            .fg(self.palette.bg_error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_bar(&self) -> Style {
        Style::default()
            .bg(self.palette.bg_error)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    // === Help Bar ===

    pub fn help_key(&self) -> Style {
        self.text().fg(self.palette.fg_key)
    }

    pub fn help_desc(&self) -> Style {
        self.text().fg(self.palette.fg_muted)
    }

    pub fn separator(&self) -> Style {
        self.text().fg(self.palette.border)
    }
}
