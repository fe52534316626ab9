//! Terminal theme detection and color definitions

use ratatui::style::Color;

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color (day numbers, body text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (selected tab, today, keybinding keys)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (weekday header, hints, "+N more")
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Month and agenda date headings
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    /// Background of cells inside an active drag selection
    pub fn selection(self) -> Color {
        match self {
            Self::Dark => Color::Indexed(24),
            Self::Light => Color::Indexed(153),
        }
    }

    /// Background of timed event chips
    pub fn chip(self) -> Color {
        match self {
            Self::Dark => Color::Indexed(237),
            Self::Light => Color::Indexed(254),
        }
    }

    /// Text drawn on top of an event colour
    pub fn on_event(self) -> Color {
        Color::White
    }

    /// Map an event colour token (e.g. "bg-blue-500") to a terminal colour.
    /// Unknown tokens fall back to the accent colour.
    pub fn event_color(self, token: &str) -> Color {
        let hue = token
            .trim()
            .trim_start_matches("bg-")
            .split('-')
            .next()
            .unwrap_or_default();
        match (self, hue) {
            (Self::Dark, "blue") => Color::Indexed(33),
            (Self::Light, "blue") => Color::Indexed(26),
            (Self::Dark, "purple" | "violet") => Color::Indexed(99),
            (Self::Light, "purple" | "violet") => Color::Indexed(91),
            (Self::Dark, "green" | "emerald") => Color::Indexed(35),
            (Self::Light, "green" | "emerald") => Color::Indexed(28),
            (Self::Dark, "orange" | "amber") => Color::Indexed(208),
            (Self::Light, "orange" | "amber") => Color::Indexed(166),
            (Self::Dark, "pink" | "rose") => Color::Indexed(205),
            (Self::Light, "pink" | "rose") => Color::Indexed(162),
            (Self::Dark, "red") => Color::Indexed(196),
            (Self::Light, "red") => Color::Indexed(160),
            (Self::Dark, "yellow") => Color::Indexed(178),
            (Self::Light, "yellow") => Color::Indexed(136),
            (Self::Dark, "teal" | "cyan") => Color::Indexed(37),
            (Self::Light, "teal" | "cyan") => Color::Indexed(30),
            (Self::Dark, "gray" | "slate") => Color::Indexed(244),
            (Self::Light, "gray" | "slate") => Color::Indexed(240),
            _ => self.accent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_colors() {
        let t = Theme::Dark;
        assert_eq!(t.text(), Color::White);
        assert_eq!(t.accent(), Color::Cyan);
        assert_eq!(t.muted(), Color::DarkGray);
        assert_eq!(t.date(), Color::Yellow);
        assert_eq!(t.error(), Color::Red);
    }

    #[test]
    fn test_light_theme_colors() {
        let t = Theme::Light;
        assert_eq!(t.text(), Color::Black);
        assert_eq!(t.accent(), Color::Indexed(25));
        assert_eq!(t.muted(), Color::Gray);
        assert_eq!(t.date(), Color::Indexed(130));
        assert_eq!(t.error(), Color::Indexed(124));
    }

    #[test]
    fn test_default_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }

    // ========== event_color tests ==========

    #[test]
    fn test_palette_tokens_are_distinct() {
        let t = Theme::Dark;
        let colors: Vec<Color> = crate::types::DEFAULT_PALETTE
            .iter()
            .map(|token| t.event_color(token))
            .collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_shade_suffix_ignored() {
        let t = Theme::Light;
        assert_eq!(t.event_color("bg-green-300"), t.event_color("bg-green-700"));
        assert_eq!(t.event_color("green"), t.event_color("bg-green-500"));
    }

    #[test]
    fn test_unknown_token_falls_back_to_accent() {
        assert_eq!(Theme::Dark.event_color("#ff00ff"), Theme::Dark.accent());
        assert_eq!(Theme::Light.event_color(""), Theme::Light.accent());
    }
}
