//! Built-in color themes for the player screen.

use ratatui::style::{Color, Style};

pub const DEFAULT_THEME: &str = "Catppuccin Mocha";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    /// Time label, slider fill and the active toggle.
    pub highlight: Color,
    /// Borders, help text and the empty part of the slider.
    pub dimmed: Color,
    pub error: Color,
}

impl Theme {
    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.highlight).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.dimmed).bg(self.background)
    }
}

impl Default for Theme {
    fn default() -> Self {
        catppuccin_mocha()
    }
}

// Helper function to convert hex RGB to Color::Rgb
const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(r, g, b)
}

/// Catppuccin Mocha theme
///
/// Based on [Catppuccin](https://github.com/catppuccin/catppuccin)
pub fn catppuccin_mocha() -> Theme {
    Theme {
        background: rgb(30, 30, 46), // #1e1e2e
        foreground: rgb(205, 214, 244), // #cdd6f4
        highlight: rgb(203, 166, 247), // #cba6f7 (mauve)
        dimmed: rgb(108, 112, 134), // #6c7086 (overlay0)
        error: rgb(243, 139, 168), // #f38ba8 (red)
    }
}

/// Gruvbox Dark theme
///
/// Based on [Gruvbox](https://github.com/morhetz/gruvbox)
pub fn gruvbox_dark() -> Theme {
    Theme {
        background: rgb(40, 40, 40), // #282828
        foreground: rgb(235, 219, 178), // #ebdbb2
        highlight: rgb(254, 128, 25), // #fe8019 (orange)
        dimmed: rgb(146, 131, 116), // #928374 (gray)
        error: rgb(251, 73, 52), // #fb4934 (red)
    }
}

/// Nord theme
///
/// Based on [Nord](https://www.nordtheme.com/)
pub fn nord() -> Theme {
    Theme {
        background: rgb(46, 52, 64), // #2E3440 (nord0)
        foreground: rgb(216, 222, 233), // #D8DEE9 (nord4)
        highlight: rgb(136, 192, 208), // #88C0D0 (nord8 - frost)
        dimmed: rgb(76, 86, 106), // #4C566A (nord3)
        error: rgb(191, 97, 106), // #BF616A (nord11)
    }
}

/// Tokyo Night theme
pub fn tokyo_night() -> Theme {
    Theme {
        background: rgb(26, 27, 38), // #1a1b26
        foreground: rgb(192, 202, 245), // #c0caf5
        highlight: rgb(187, 154, 247), // #bb9af7 (magenta)
        dimmed: rgb(86, 95, 137), // #565f89 (comment)
        error: rgb(247, 118, 142), // #f7768e (red)
    }
}

/// Solarized Light theme
pub fn solarized_light() -> Theme {
    Theme {
        background: rgb(253, 246, 227), // #FDF6E3 (base3)
        foreground: rgb(101, 123, 131), // #657B83 (base00)
        highlight: rgb(38, 139, 210), // #268bd2 (blue)
        dimmed: rgb(147, 161, 161), // #93a1a1 (base1)
        error: rgb(220, 50, 47), // #dc322f (red)
    }
}

/// Look a built-in theme up by its display name.
pub fn by_name(name: &str) -> Option<Theme> {
    match name {
        "Catppuccin Mocha" => Some(catppuccin_mocha()),
        "Gruvbox Dark" => Some(gruvbox_dark()),
        "Nord" => Some(nord()),
        "Solarized Light" => Some(solarized_light()),
        "Tokyo Night" => Some(tokyo_night()),
        _ => None,
    }
}

/// Get a list of all available theme names
pub fn list() -> &'static [&'static str] {
    &[
        "Catppuccin Mocha",
        "Gruvbox Dark",
        "Nord",
        "Solarized Light",
        "Tokyo Night",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_theme_resolves() {
        for name in list() {
            assert!(by_name(name).is_some(), "{name}");
        }
        assert_eq!(by_name(DEFAULT_THEME), Some(Theme::default()));
    }

    #[test]
    fn unknown_theme_is_none() {
        assert_eq!(by_name("Hot Dog Stand"), None);
    }
}
