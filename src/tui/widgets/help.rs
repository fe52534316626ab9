//! Help popup widget - keyboard and mouse reference

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const POPUP_WIDTH: u16 = 50;

const NAVIGATION: &[(&str, &str)] = &[
    ("Tab / 1-2", "Month / Agenda view"),
    ("Up/Down or j/k", "Scroll"),
    ("PgUp / PgDn", "Scroll a page"),
    ("Left/Right or p/n", "Previous / next month"),
    ("t", "Jump to today"),
];

const CALENDAR: &[(&str, &str)] = &[
    ("Click event", "Open event"),
    ("Click \"+N more\"", "List the whole day"),
    ("Drag over days", "Select a range"),
    ("c", "Toggle compact cells"),
    ("r", "Reload events"),
];

const GENERAL: &[(&str, &str)] = &[("q / Esc", "Close popup or quit"), ("?", "Toggle help")];

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Borders, three headed sections and the close hint
    fn height() -> u16 {
        let rows = NAVIGATION.len() + CALENDAR.len() + GENERAL.len();
        (2 + 3 * 3 + rows + 2) as u16
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let height = Self::height();
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: height.min(area.height),
        }
    }

    fn section(&self, title: &'static str, width: u16, bindings: &[(&'static str, &'static str)]) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(self.theme.date())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "─".repeat(width as usize),
                Style::default().fg(self.theme.muted()),
            )),
        ];
        lines.extend(
            bindings
                .iter()
                .map(|(key, desc)| keybinding_line(key, desc, self.theme)),
        );
        lines.push(Line::default());
        lines
    }
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let title = format!(" gridcal v{} ", VERSION);
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::default()];
        lines.extend(self.section("Navigation", inner.width, NAVIGATION));
        lines.extend(self.section("Calendar", inner.width, CALENDAR));
        lines.extend(self.section("General", inner.width, GENERAL));
        lines.push(
            Line::from(Span::styled(
                "Press ? to close",
                Style::default().fg(self.theme.muted()),
            ))
            .alignment(Alignment::Center),
        );

        Paragraph::new(lines).render(inner, buf);
    }
}

fn keybinding_line(key: &'static str, desc: &'static str, theme: Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<20}", key), Style::default().fg(theme.accent())),
        Span::styled(desc, Style::default().fg(theme.text())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_popup_centered_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup_area = HelpPopup::centered_area(area);

        assert_eq!(popup_area.width, POPUP_WIDTH);
        assert_eq!(popup_area.height, HelpPopup::height());
        assert_eq!(popup_area.x, (100 - POPUP_WIDTH) / 2);
        assert_eq!(popup_area.y, (50 - HelpPopup::height()) / 2);
    }

    #[test]
    fn test_help_popup_small_terminal() {
        let area = Rect::new(0, 0, 30, 10);
        let popup_area = HelpPopup::centered_area(area);

        assert_eq!(popup_area.width, 30);
        assert_eq!(popup_area.height, 10);
    }

    #[test]
    fn test_help_popup_lists_calendar_keys() {
        let area = Rect::new(0, 0, 60, 40);
        let popup_area = HelpPopup::centered_area(area);
        let mut buf = Buffer::empty(area);
        HelpPopup::default().render(popup_area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("gridcal v"));
        assert!(content.contains("Select a range"));
        assert!(content.contains("Toggle compact cells"));
    }
}
