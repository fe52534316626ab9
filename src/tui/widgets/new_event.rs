//! Confirmation shown after a drag selection commits

use chrono::Datelike;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;
use crate::types::DateRange;

const POPUP_WIDTH: u16 = 44;
const POPUP_HEIGHT: u16 = 7;

pub struct NewEventPopup {
    range: DateRange,
    theme: Theme,
}

impl NewEventPopup {
    pub fn new(range: DateRange, theme: Theme) -> Self {
        Self { range, theme }
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

/// "Mar 4 2025" or "Mar 3 - Mar 7 2025 (5 days)"
pub fn range_label(range: &DateRange) -> String {
    let first = range.first_date();
    let last = range.last_date();
    if first == last {
        first.format("%a %b %-d %Y").to_string()
    } else if first.year() == last.year() {
        format!(
            "{} - {} ({} days)",
            first.format("%b %-d"),
            last.format("%b %-d %Y"),
            range.days()
        )
    } else {
        format!(
            "{} - {} ({} days)",
            first.format("%b %-d %Y"),
            last.format("%b %-d %Y"),
            range.days()
        )
    }
}

impl Widget for NewEventPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(" New event ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.date()));
        let inner = block.inner(area);
        block.render(area, buf);

        let muted = Style::default().fg(self.theme.muted());
        let lines = vec![
            Line::default(),
            Line::from(Span::styled(
                range_label(&self.range),
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("Esc", muted.add_modifier(Modifier::BOLD)),
                Span::styled(" Close", muted),
            ]),
        ];
        Paragraph::new(lines).alignment(Alignment::Center).render(inner, buf);
    }
}
