//! Agenda view: events grouped by day, growing as the list scrolls

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::time_label;
use crate::services::AgendaPage;
use crate::tui::theme::Theme;

/// Rows in the rendered list: a heading per day, a row per event, a blank
/// row between days and one footer row
pub fn line_count(page: &AgendaPage<'_>) -> usize {
    let days = page.days.len();
    let events: usize = page.days.iter().map(|day| day.events.len()).sum();
    days + events + days.saturating_sub(1) + 1
}

pub struct AgendaView<'a> {
    page: &'a AgendaPage<'a>,
    scroll: usize,
    today: NaiveDate,
    theme: Theme,
}

impl<'a> AgendaView<'a> {
    pub fn new(page: &'a AgendaPage<'a>, scroll: usize, today: NaiveDate, theme: Theme) -> Self {
        Self {
            page,
            scroll,
            today,
            theme,
        }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let mut lines = Vec::with_capacity(line_count(self.page));
        for (i, day) in self.page.days.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            let mut heading = Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD);
            if day.date == self.today {
                heading = heading.fg(self.theme.accent());
            }
            lines.push(Line::from(Span::styled(
                format!(" {}", day.date.format("%a %b %-d %Y")),
                heading,
            )));
            for event in &day.events {
                lines.push(Line::from(vec![
                    Span::raw("   "),
                    Span::styled("● ", Style::default().fg(self.theme.event_color(&event.color))),
                    Span::styled(format!("{:<26}", time_label(event)), Style::default().fg(self.theme.muted())),
                    Span::styled(event.title.as_str(), Style::default().fg(self.theme.text())),
                ]));
            }
        }

        let footer = if self.page.total == 0 {
            " No events".to_string()
        } else if self.page.has_more {
            format!(" Showing {} of {} events, scroll for more", self.page.shown, self.page.total)
        } else {
            format!(" {} events", self.page.total)
        };
        lines.push(Line::from(Span::styled(footer, Style::default().fg(self.theme.muted()))));
        lines
    }
}

impl Widget for AgendaView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let scroll = self.scroll.min(u16::MAX as usize) as u16;
        Paragraph::new(self.lines()).scroll((scroll, 0)).render(area, buf);
    }
}
