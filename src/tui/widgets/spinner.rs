//! Loading screen: a week row with a marker walking across it, plus the
//! directory being read

use std::path::Path;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::services::RefreshSignal;
use crate::tui::theme::Theme;

const WEEKDAY_INITIALS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];
const CELL_WIDTH: u16 = 3;
const MARKER: &str = "●";
const IDLE: &str = "·";

/// What the app is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingStage {
    /// First load of the event directory
    Loading,
    /// Reload triggered by a refresh signal
    Reloading(RefreshSignal),
}

impl LoadingStage {
    pub fn message(self) -> &'static str {
        match self {
            Self::Loading => "Loading events",
            Self::Reloading(RefreshSignal::Changed) => "Event files changed, reloading",
            Self::Reloading(RefreshSignal::Manual) => "Reloading events",
        }
    }
}

/// Loading screen widget
pub struct Spinner<'a> {
    frame: usize,
    stage: LoadingStage,
    source: Option<&'a Path>,
    theme: Theme,
}

impl<'a> Spinner<'a> {
    pub fn new(frame: usize, stage: LoadingStage, theme: Theme) -> Self {
        Self {
            frame,
            stage,
            source: None,
            theme,
        }
    }

    /// Directory shown under the message
    pub fn with_source(mut self, source: Option<&'a Path>) -> Self {
        self.source = source;
        self
    }

    /// Weekday column the marker sits on
    pub fn marker_column(&self) -> usize {
        self.frame % WEEKDAY_INITIALS.len()
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % WEEKDAY_INITIALS.len()
    }
}

/// Keep the end of `text`, which for a path is the informative part
fn keep_tail(text: &str, max: usize) -> String {
    let len = text.chars().count();
    if len <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let tail: String = text.chars().skip(len - (max - 1)).collect();
    format!("…{}", tail)
}

fn centered_x(area: Rect, width: usize) -> u16 {
    area.x + area.width.saturating_sub(width as u16) / 2
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let row_width = CELL_WIDTH * WEEKDAY_INITIALS.len() as u16;
        if area.height < 4 || area.width < row_width {
            return;
        }

        let top = area.y + area.height.saturating_sub(4) / 2;
        let left = area.x + (area.width - row_width) / 2;
        let marker = self.marker_column();
        let muted = Style::default().fg(self.theme.muted());

        for (col, initial) in WEEKDAY_INITIALS.iter().enumerate() {
            let x = left + col as u16 * CELL_WIDTH + 1;
            buf.set_string(x, top, initial, muted);
            let (glyph, style) = if col == marker {
                (MARKER, Style::default().fg(self.theme.accent()))
            } else {
                (IDLE, muted)
            };
            buf.set_string(x, top + 1, glyph, style);
        }

        let message = self.stage.message();
        buf.set_stringn(
            centered_x(area, message.len()),
            top + 2,
            message,
            area.width as usize,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );

        if let Some(source) = self.source {
            let path = keep_tail(&source.display().to_string(), area.width as usize);
            buf.set_string(centered_x(area, path.chars().count()), top + 3, &path, muted);
        }
    }
}
