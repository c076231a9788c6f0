//! # Theme System
//!
//! Colors for the gallery's own chrome: sidebar, preview frame, hints and
//! the help overlay. Components draw plain text and are never themed.
//!
//! ## Built-in Themes
//!
//! - **Catppuccin Mocha** (default)
//! - **Catppuccin Macchiato**
//! - **Catppuccin Frappe**
//! - **Dracula**
//! - **Nord**
//! - **Gruvbox Dark**
//! - **Tokyo Night**

use ratatui::style::{Color, Modifier, Style};

/// All colors used by the gallery, grouped by semantic role.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Name accepted by `--theme` and the config file.
    pub name: &'static str,

    /// Screen background behind every pane.
    pub bg: Color,
    /// Primary text color (entry names, component output).
    pub fg: Color,
    /// Muted text (hints, indicators, footer).
    pub fg_dim: Color,

    /// Focused borders and titles.
    pub accent: Color,
    /// Group rows and the help overlay headings.
    pub secondary: Color,
    /// Unfocused borders.
    pub border: Color,

    /// Finished-session marker.
    pub success: Color,
    /// Faulted-session text.
    pub error: Color,

    /// Cursor row in the list.
    pub selection_fg: Color,
    pub selection_bg: Color,
}

impl Theme {
    /// All built-in themes in display order.
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }

    /// Background fill for the whole screen.
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.accent } else { self.border })
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn group_style(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }
}

// ---------------------------------------------------------------------------
// Built-in theme definitions
// ---------------------------------------------------------------------------

static BUILT_IN_THEMES: [Theme; 7] = [
    // 0 - Catppuccin Mocha (default)
    Theme {
        name: "Catppuccin Mocha",
        bg: Color::Rgb(30, 30, 46),            // base
        fg: Color::Rgb(205, 214, 244),         // text
        fg_dim: Color::Rgb(108, 112, 134),     // overlay0
        accent: Color::Rgb(137, 180, 250),     // blue
        secondary: Color::Rgb(249, 226, 175),  // yellow
        border: Color::Rgb(88, 91, 112),       // surface2
        success: Color::Rgb(166, 227, 161),    // green
        error: Color::Rgb(243, 139, 168),      // red
        selection_fg: Color::Rgb(30, 30, 46),  // base
        selection_bg: Color::Rgb(137, 180, 250), // blue
    },
    // 1 - Catppuccin Macchiato
    Theme {
        name: "Catppuccin Macchiato",
        bg: Color::Rgb(36, 39, 58),
        fg: Color::Rgb(202, 211, 245),
        fg_dim: Color::Rgb(110, 115, 141),
        accent: Color::Rgb(138, 173, 244),
        secondary: Color::Rgb(238, 212, 159),
        border: Color::Rgb(91, 96, 120),
        success: Color::Rgb(166, 218, 149),
        error: Color::Rgb(237, 135, 150),
        selection_fg: Color::Rgb(36, 39, 58),
        selection_bg: Color::Rgb(138, 173, 244),
    },
    // 2 - Catppuccin Frappe
    Theme {
        name: "Catppuccin Frappe",
        bg: Color::Rgb(48, 52, 70),
        fg: Color::Rgb(198, 208, 245),
        fg_dim: Color::Rgb(115, 121, 148),
        accent: Color::Rgb(140, 170, 238),
        secondary: Color::Rgb(229, 200, 144),
        border: Color::Rgb(98, 104, 128),
        success: Color::Rgb(166, 209, 137),
        error: Color::Rgb(231, 130, 132),
        selection_fg: Color::Rgb(48, 52, 70),
        selection_bg: Color::Rgb(140, 170, 238),
    },
    // 3 - Dracula
    Theme {
        name: "Dracula",
        bg: Color::Rgb(40, 42, 54),
        fg: Color::Rgb(248, 248, 242),
        fg_dim: Color::Rgb(98, 114, 164),
        accent: Color::Rgb(139, 233, 253),    // cyan
        secondary: Color::Rgb(241, 250, 140), // yellow
        border: Color::Rgb(68, 71, 90),
        success: Color::Rgb(80, 250, 123),
        error: Color::Rgb(255, 85, 85),
        selection_fg: Color::Rgb(40, 42, 54),
        selection_bg: Color::Rgb(189, 147, 249), // purple
    },
    // 4 - Nord
    Theme {
        name: "Nord",
        bg: Color::Rgb(46, 52, 64),
        fg: Color::Rgb(216, 222, 233),
        fg_dim: Color::Rgb(76, 86, 106),
        accent: Color::Rgb(136, 192, 208),    // frost
        secondary: Color::Rgb(235, 203, 139), // yellow
        border: Color::Rgb(67, 76, 94),
        success: Color::Rgb(163, 190, 140),
        error: Color::Rgb(191, 97, 106),
        selection_fg: Color::Rgb(46, 52, 64),
        selection_bg: Color::Rgb(136, 192, 208),
    },
    // 5 - Gruvbox Dark
    Theme {
        name: "Gruvbox Dark",
        bg: Color::Rgb(40, 40, 40),
        fg: Color::Rgb(235, 219, 178),
        fg_dim: Color::Rgb(146, 131, 116),
        accent: Color::Rgb(131, 165, 152),   // blue
        secondary: Color::Rgb(250, 189, 47), // yellow
        border: Color::Rgb(80, 73, 69),
        success: Color::Rgb(184, 187, 38),
        error: Color::Rgb(251, 73, 52),
        selection_fg: Color::Rgb(40, 40, 40),
        selection_bg: Color::Rgb(131, 165, 152),
    },
    // 6 - Tokyo Night
    Theme {
        name: "Tokyo Night",
        bg: Color::Rgb(26, 27, 38),
        fg: Color::Rgb(169, 177, 214),
        fg_dim: Color::Rgb(86, 95, 137),
        accent: Color::Rgb(122, 162, 247),    // blue
        secondary: Color::Rgb(224, 175, 104), // yellow
        border: Color::Rgb(41, 46, 66),
        success: Color::Rgb(115, 218, 202),
        error: Color::Rgb(247, 118, 142),
        selection_fg: Color::Rgb(26, 27, 38),
        selection_bg: Color::Rgb(122, 162, 247),
    },
];
