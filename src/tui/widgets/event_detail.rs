//! Event detail popup

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::time_label;
use crate::tui::theme::Theme;
use crate::types::CalendarEvent;

const POPUP_WIDTH: u16 = 56;
const POPUP_HEIGHT: u16 = 12;

pub struct EventDetailPopup<'a> {
    event: &'a CalendarEvent,
    theme: Theme,
}

impl<'a> EventDetailPopup<'a> {
    pub fn new(event: &'a CalendarEvent, theme: Theme) -> Self {
        Self { event, theme }
    }

    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }
}

impl Widget for EventDetailPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let color = self.theme.event_color(&self.event.color);
        let block = Block::default()
            .title(format!(" {} ", self.event.title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = Style::default().fg(self.theme.muted());
        let mut lines = vec![
            Line::default(),
            Line::from(vec![
                Span::styled("  When   ", label),
                Span::styled(time_label(self.event), Style::default().fg(self.theme.text())),
            ]),
            Line::from(vec![
                Span::styled("  Colour ", label),
                Span::styled("● ", Style::default().fg(color)),
                Span::styled(self.event.color.clone(), Style::default().fg(self.theme.text())),
            ]),
            Line::default(),
        ];
        if self.event.description.is_empty() {
            lines.push(Line::from(Span::styled("  No description", label)));
        } else {
            lines.extend(
                self.event
                    .description
                    .lines()
                    .map(|text| Line::from(Span::styled(format!("  {text}"), Style::default().fg(self.theme.text())))),
            );
        }

        let body = Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        };
        Paragraph::new(lines).wrap(Wrap { trim: false }).render(body, buf);

        if inner.height > 0 {
            let hint = Line::from(vec![
                Span::styled("Esc", label.add_modifier(Modifier::BOLD)),
                Span::styled(" Close", label),
            ]);
            Paragraph::new(hint).alignment(Alignment::Center).render(
                Rect {
                    y: inner.y + inner.height - 1,
                    height: 1,
                    ..inner
                },
                buf,
            );
        }
    }
}
