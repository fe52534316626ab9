//! Bottom sheet listing every event of one day

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::time_label;
use crate::tui::theme::Theme;
use crate::types::CalendarEvent;

/// Borders plus the hint line
const CHROME_ROWS: u16 = 3;

pub struct DayListSheet<'a> {
    date: NaiveDate,
    events: &'a [&'a CalendarEvent],
    selected: usize,
    theme: Theme,
}

impl<'a> DayListSheet<'a> {
    pub fn new(date: NaiveDate, events: &'a [&'a CalendarEvent], selected: usize, theme: Theme) -> Self {
        Self {
            date,
            events,
            selected,
            theme,
        }
    }

    /// Sheet anchored to the bottom, at most two thirds of the screen
    pub fn area(full: Rect, count: usize) -> Rect {
        let wanted = (count.max(1) as u16).saturating_add(CHROME_ROWS);
        let height = wanted.min((full.height * 2 / 3).max(CHROME_ROWS + 1)).min(full.height);
        Rect {
            x: full.x,
            y: full.y + full.height - height,
            width: full.width,
            height,
        }
    }

    fn visible_rows(area: Rect) -> usize {
        area.height.saturating_sub(CHROME_ROWS) as usize
    }

    /// First listed entry, keeping the selection on screen
    fn scroll_offset(area: Rect, selected: usize) -> usize {
        let rows = Self::visible_rows(area).max(1);
        selected.saturating_sub(rows - 1)
    }

    /// Entry index under screen row `y`
    pub fn entry_at(area: Rect, count: usize, selected: usize, y: u16) -> Option<usize> {
        let first_row = area.y + 1;
        if y < first_row {
            return None;
        }
        let line = (y - first_row) as usize;
        if line >= Self::visible_rows(area) {
            return None;
        }
        let index = Self::scroll_offset(area, selected) + line;
        (index < count).then_some(index)
    }
}

impl Widget for DayListSheet<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let title = format!(" {} ", self.date.format("%A, %B %-d %Y"));
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Self::visible_rows(area);
        let offset = Self::scroll_offset(area, self.selected);
        let mut lines: Vec<Line> = Vec::with_capacity(rows + 1);

        if self.events.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No events",
                Style::default().fg(self.theme.muted()),
            )));
        }
        for (index, event) in self.events.iter().enumerate().skip(offset).take(rows) {
            let selected = index == self.selected;
            let marker = if selected { "▸ " } else { "  " };
            let title_style = if selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.text())
            };
            lines.push(Line::from(vec![
                Span::styled(marker, title_style),
                Span::styled("● ", Style::default().fg(self.theme.event_color(&event.color))),
                Span::styled(format!("{:<16}", time_label(event)), Style::default().fg(self.theme.muted())),
                Span::styled(event.title.clone(), title_style),
            ]));
        }
        while lines.len() < rows {
            lines.push(Line::default());
        }

        let hint = Line::from(vec![
            Span::styled("Enter", Style::default().fg(self.theme.muted()).add_modifier(Modifier::BOLD)),
            Span::styled(" Open  ", Style::default().fg(self.theme.muted())),
            Span::styled("a", Style::default().fg(self.theme.muted()).add_modifier(Modifier::BOLD)),
            Span::styled(" New event  ", Style::default().fg(self.theme.muted())),
            Span::styled("Esc", Style::default().fg(self.theme.muted()).add_modifier(Modifier::BOLD)),
            Span::styled(" Close", Style::default().fg(self.theme.muted())),
        ])
        .alignment(Alignment::Center);
        lines.push(hint);

        Paragraph::new(lines).render(inner, buf);
    }
}
