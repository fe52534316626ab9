//! Scrollable stack of month cards.
//!
//! Content is a vertical strip of months, each a label row, a weekday
//! row, its week rows and a blank gap. [`GridMetrics`] gives the height of
//! every piece so rendering, hit-testing and scroll compensation all agree
//! on where a month starts.

use chrono::{Datelike, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::calendar::{build_month_grid, build_month_layout, CellLayout, DragSelector, MonthKey, Slot, WeekLayout};
use crate::tui::theme::Theme;
use crate::types::CalendarEvent;

/// Month label + weekday names
pub const MONTH_HEADER_ROWS: usize = 2;
/// Blank rows after each month
pub const MONTH_GAP_ROWS: usize = 1;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const DOT: char = '●';

/// Row sizes for the current display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMetrics {
    pub compact: bool,
    /// Visible slots per cell (wide mode)
    pub budget: usize,
}

impl GridMetrics {
    /// Date line, then slots and a "+N more" line (wide) or a dot line
    /// (compact)
    pub fn week_height(self) -> usize {
        if self.compact {
            2
        } else {
            self.budget + 2
        }
    }

    pub fn month_height(self, key: MonthKey) -> usize {
        MONTH_HEADER_ROWS + week_count(key) * self.week_height() + MONTH_GAP_ROWS
    }

    pub fn content_height(self, months: &[MonthKey]) -> usize {
        months.iter().map(|&key| self.month_height(key)).sum()
    }

    /// Content row where `key` starts
    pub fn month_top(self, months: &[MonthKey], key: MonthKey) -> Option<usize> {
        let mut top = 0;
        for &month in months {
            if month == key {
                return Some(top);
            }
            top += self.month_height(month);
        }
        None
    }

    /// Month containing content row `row`, with the row's offset into it
    pub fn month_at(self, months: &[MonthKey], row: usize) -> Option<(MonthKey, usize)> {
        let mut top = 0;
        for &month in months {
            let height = self.month_height(month);
            if row < top + height {
                return Some((month, row - top));
            }
            top += height;
        }
        None
    }
}

fn week_count(key: MonthKey) -> usize {
    build_month_grid(key.year, key.month0 as i32).len()
}

/// Left edge of column `col` (0..=7)
pub fn column_x(area: Rect, col: usize) -> u16 {
    area.x + (area.width as usize * col / 7) as u16
}

pub fn column_width(area: Rect, col: usize) -> u16 {
    column_x(area, col + 1) - column_x(area, col)
}

pub fn column_at(area: Rect, x: u16) -> Option<usize> {
    if x < area.x || x >= area.x + area.width {
        return None;
    }
    (0..7).find(|&col| x < column_x(area, col + 1))
}

/// What a screen position points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Cell(NaiveDate),
    Event { date: NaiveDate, id: String },
    More(NaiveDate),
}

impl Hit {
    pub fn date(&self) -> NaiveDate {
        match self {
            Hit::Cell(date) | Hit::More(date) => *date,
            Hit::Event { date, .. } => *date,
        }
    }
}

/// Where a line of month content falls
enum LineKind {
    Label,
    Weekdays,
    Week { index: usize, line: usize },
    Gap,
}

fn line_kind(metrics: GridMetrics, key: MonthKey, row_in_month: usize) -> LineKind {
    match row_in_month {
        0 => LineKind::Label,
        1 => LineKind::Weekdays,
        r => {
            let r = r - MONTH_HEADER_ROWS;
            let index = r / metrics.week_height();
            if index < week_count(key) {
                LineKind::Week {
                    index,
                    line: r % metrics.week_height(),
                }
            } else {
                LineKind::Gap
            }
        }
    }
}

/// Resolve a screen position to a date cell, event or overflow marker
pub fn hit_test(
    events: &[CalendarEvent],
    months: &[MonthKey],
    metrics: GridMetrics,
    area: Rect,
    scroll: usize,
    x: u16,
    y: u16,
) -> Option<Hit> {
    if y < area.y || y >= area.y + area.height {
        return None;
    }
    let col = column_at(area, x)?;
    let (key, row_in_month) = metrics.month_at(months, scroll + (y - area.y) as usize)?;

    let LineKind::Week { index, line } = line_kind(metrics, key, row_in_month) else {
        return None;
    };
    let date = build_month_grid(key.year, key.month0 as i32).get(index)?[col]?;

    if metrics.compact || line == 0 {
        return Some(Hit::Cell(date));
    }

    let layout = build_month_layout(events, key, metrics.budget);
    let cell = layout.cell(date)?;
    if line == metrics.budget + 1 {
        return Some(if cell.budget.hidden > 0 {
            Hit::More(date)
        } else {
            Hit::Cell(date)
        });
    }

    match cell.slots().get(line - 1).and_then(Slot::event) {
        Some(event) => Some(Hit::Event {
            date,
            id: event.id.clone(),
        }),
        None => Some(Hit::Cell(date)),
    }
}

/// Month grid widget
pub struct MonthView<'a> {
    events: &'a [CalendarEvent],
    months: &'a [MonthKey],
    metrics: GridMetrics,
    scroll: usize,
    today: NaiveDate,
    drag: &'a DragSelector,
    theme: Theme,
}

impl<'a> MonthView<'a> {
    pub fn new(
        events: &'a [CalendarEvent],
        months: &'a [MonthKey],
        metrics: GridMetrics,
        scroll: usize,
        today: NaiveDate,
        drag: &'a DragSelector,
    ) -> Self {
        Self {
            events,
            months,
            metrics,
            scroll,
            today,
            drag,
            theme: Theme::default(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn render_label(&self, key: MonthKey, area: Rect, y: u16, buf: &mut Buffer) {
        let style = Style::default().fg(self.theme.date()).add_modifier(Modifier::BOLD);
        buf.set_stringn(area.x + 1, y, key.label(), area.width as usize, style);
    }

    fn render_weekdays(&self, area: Rect, y: u16, buf: &mut Buffer) {
        for (col, name) in WEEKDAYS.iter().enumerate() {
            let width = column_width(area, col) as usize;
            let text = if width >= 4 { *name } else { &name[..1] };
            buf.set_stringn(column_x(area, col), y, text, width, Style::default().fg(self.theme.muted()));
        }
    }

    fn render_week_line(&self, week: &WeekLayout<'_>, line: usize, area: Rect, y: u16, buf: &mut Buffer) {
        for (col, cell) in week.cells.iter().enumerate() {
            let Some(cell) = cell else {
                continue;
            };
            let x = column_x(area, col);
            let width = column_width(area, col);
            let next_blank = col == 6 || week.cells[col + 1].is_none();

            if self.drag.is_in_range(cell.date) {
                buf.set_style(Rect::new(x, y, width, 1), Style::default().bg(self.theme.selection()));
            }

            if line == 0 {
                self.render_day_number(cell, x, y, buf);
            } else if self.metrics.compact {
                self.render_dots(cell, x, width, y, buf);
            } else if line == self.metrics.budget + 1 {
                if cell.budget.hidden > 0 {
                    let text = format!("+{} more", cell.budget.hidden);
                    buf.set_stringn(x, y, text, width as usize, Style::default().fg(self.theme.muted()));
                }
            } else if let Some(slot) = cell.slots().get(line - 1) {
                self.render_slot(*slot, x, width, next_blank, y, buf);
            }
        }
    }

    fn render_day_number(&self, cell: &CellLayout<'_>, x: u16, y: u16, buf: &mut Buffer) {
        let mut style = Style::default().fg(self.theme.text());
        if cell.date == self.today {
            style = style
                .fg(self.theme.accent())
                .add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        buf.set_string(x, y, format!("{:>2}", cell.date.day()), style);
    }

    fn render_dots(&self, cell: &CellLayout<'_>, x: u16, width: u16, y: u16, buf: &mut Buffer) {
        let summary = cell.compact_summary();
        let limit = x + width.saturating_sub(1);
        let mut cx = x;
        for token in &summary.dots {
            if cx >= limit {
                break;
            }
            buf.set_string(cx, y, DOT.to_string(), Style::default().fg(self.theme.event_color(token)));
            cx += 1;
        }
        if summary.overflow > 0 && cx < limit {
            let text = format!("+{}", summary.overflow);
            buf.set_stringn(cx, y, text, (limit - cx) as usize, Style::default().fg(self.theme.muted()));
        }
    }

    fn render_slot(&self, slot: Slot<'_>, x: u16, width: u16, next_blank: bool, y: u16, buf: &mut Buffer) {
        // One column of gutter unless a bar runs on into the next cell
        let inner = width.saturating_sub(1);
        match slot {
            Slot::Gap => {}
            Slot::Bar(segment) => {
                let runs_on = segment.span > 1 && !next_blank;
                let fill = if runs_on { width } else { inner };
                let style = Style::default()
                    .bg(self.theme.event_color(&segment.event.color))
                    .fg(self.theme.on_event());
                buf.set_style(Rect::new(x, y, fill, 1), style);
                if segment.labeled {
                    buf.set_stringn(x, y, &segment.event.title, fill as usize, style);
                }
            }
            Slot::AllDay(event) => {
                let style = Style::default()
                    .bg(self.theme.event_color(&event.color))
                    .fg(self.theme.on_event());
                buf.set_style(Rect::new(x, y, inner, 1), style);
                buf.set_stringn(x, y, &event.title, inner as usize, style);
            }
            Slot::Timed(event) => {
                let style = Style::default().bg(self.theme.chip()).fg(self.theme.text());
                buf.set_style(Rect::new(x, y, inner, 1), style);
                let text = format!("{} {}", event.start.format("%H:%M"), event.title);
                buf.set_stringn(x, y, text, inner as usize, style);
            }
        }
    }
}

impl Widget for MonthView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 14 || area.height == 0 {
            return;
        }
        let view_end = self.scroll + area.height as usize;

        let mut top = 0;
        for &key in self.months {
            let height = self.metrics.month_height(key);
            let bottom = top + height;
            if bottom <= self.scroll {
                top = bottom;
                continue;
            }
            if top >= view_end {
                break;
            }

            let layout = build_month_layout(self.events, key, self.metrics.budget);
            for row in top.max(self.scroll)..bottom.min(view_end) {
                let y = area.y + (row - self.scroll) as u16;
                match line_kind(self.metrics, key, row - top) {
                    LineKind::Label => self.render_label(key, area, y, buf),
                    LineKind::Weekdays => self.render_weekdays(area, y, buf),
                    LineKind::Week { index, line } => {
                        // Layout drops all-padding rows, the grid never has any
                        if let Some(week) = layout.weeks.get(index) {
                            self.render_week_line(week, line, area, y, buf);
                        }
                    }
                    LineKind::Gap => {}
                }
            }
            top = bottom;
        }
    }
}
