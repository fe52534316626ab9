//! Tab bar widget for view navigation

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::tui::theme::Theme;

/// Available tabs in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Month,
    Agenda,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Self::Month => "Month",
            Self::Agenda => "Agenda",
        }
    }

    pub fn all() -> &'static [Tab] {
        &[Tab::Month, Tab::Agenda]
    }

    /// Get the next tab (wrapping)
    pub fn next(self) -> Self {
        match self {
            Self::Month => Self::Agenda,
            Self::Agenda => Self::Month,
        }
    }

    /// Get the previous tab (wrapping)
    pub fn prev(self) -> Self {
        self.next()
    }

    /// Get tab from number key (1-2)
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Month),
            2 => Some(Self::Agenda),
            _ => None,
        }
    }
}

/// Tab bar widget, with the focused month label on the left
pub struct TabBar<'a> {
    selected: Tab,
    title: &'a str,
    theme: Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(selected: Tab, title: &'a str, theme: Theme) -> Self {
        Self {
            selected,
            title,
            theme,
        }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        buf.set_stringn(
            area.x + 1,
            area.y,
            self.title,
            (area.width as usize).saturating_sub(1),
            Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD),
        );

        // Tabs are right-aligned
        let labels: Vec<String> = Tab::all()
            .iter()
            .map(|tab| {
                if *tab == self.selected {
                    format!("[{}]", tab.label())
                } else {
                    tab.label().to_string()
                }
            })
            .collect();
        let total_width: u16 = labels.iter().map(|l| l.len() as u16 + 2).sum();

        let mut x = area.x + area.width.saturating_sub(total_width);
        for (tab, display) in Tab::all().iter().zip(&labels) {
            let style = if *tab == self.selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted())
            };
            if x + display.len() as u16 > area.x + area.width {
                break;
            }
            buf.set_string(x, area.y, display, style);
            x += display.len() as u16 + 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_labels() {
        assert_eq!(Tab::Month.label(), "Month");
        assert_eq!(Tab::Agenda.label(), "Agenda");
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Month.next(), Tab::Agenda);
        assert_eq!(Tab::Agenda.next(), Tab::Month);
        assert_eq!(Tab::Month.prev(), Tab::Agenda);
    }

    #[test]
    fn test_tab_default() {
        assert_eq!(Tab::default(), Tab::Month);
    }

    #[test]
    fn test_tab_from_number() {
        assert_eq!(Tab::from_number(1), Some(Tab::Month));
        assert_eq!(Tab::from_number(2), Some(Tab::Agenda));
        assert_eq!(Tab::from_number(0), None);
        assert_eq!(Tab::from_number(3), None);
    }

    #[test]
    fn test_tab_bar_renders_title_and_selection() {
        let area = Rect::new(0, 0, 50, 1);
        let mut buf = Buffer::empty(area);
        TabBar::new(Tab::Agenda, "March 2025", Theme::Dark).render(area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("March 2025"));
        assert!(content.contains("[Agenda]"));
        assert!(content.contains("Month"));
    }
}
