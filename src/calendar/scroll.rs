//! Lazily extended window of rendered months.
//!
//! Scrolling near the top prepends earlier months and near the bottom
//! appends later ones. A prepend moves existing content down, so it is a
//! two-phase operation: [`ScrollWindow::on_scroll`] records the content
//! height before the mutation and enters `Extending`, and
//! [`ScrollWindow::commit_measurement`] takes the height after layout and
//! returns the compensated offset. Scroll updates arriving in between are
//! ignored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::month_grid::MonthKey;

/// Window sizing and trigger distances, in content units (terminal rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Months rendered before the current one at start
    pub before: u32,
    /// Months rendered after the current one at start
    pub after: u32,
    /// Months added per extension
    pub chunk: u32,
    /// Distance from an edge that triggers an extension
    pub threshold: usize,
    /// Added to the initial offset so the top trigger does not fire at once
    pub initial_nudge: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            before: 2,
            after: 2,
            chunk: 1,
            threshold: 2,
            initial_nudge: 1,
        }
    }
}

/// Viewport position reported by the front end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top of the content
    pub offset: usize,
    /// Visible height
    pub viewport: usize,
    /// Full content height; `None` if layout has not settled
    pub content: Option<usize>,
}

/// Months added by one scroll update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extension {
    pub prepended: Vec<MonthKey>,
    pub appended: Vec<MonthKey>,
}

impl Extension {
    pub fn is_empty(&self) -> bool {
        self.prepended.is_empty() && self.appended.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Idle,
    /// A prepend is waiting for its post-layout measurement
    Extending {
        offset: usize,
        height_before: Option<usize>,
    },
}

/// Chronologically sorted, duplicate-free month keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayWindow {
    months: Vec<MonthKey>,
}

impl DisplayWindow {
    /// `before` months before `center` through `after` months after it
    pub fn around(center: MonthKey, before: u32, after: u32) -> Self {
        Self {
            months: (-(before as i32)..=after as i32)
                .map(|delta| center.offset(delta))
                .collect(),
        }
    }

    pub fn months(&self) -> &[MonthKey] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn first(&self) -> Option<MonthKey> {
        self.months.first().copied()
    }

    pub fn last(&self) -> Option<MonthKey> {
        self.months.last().copied()
    }

    pub fn contains(&self, key: MonthKey) -> bool {
        self.months.binary_search(&key).is_ok()
    }

    pub fn position(&self, key: MonthKey) -> Option<usize> {
        self.months.binary_search(&key).ok()
    }

    /// `chunk` months before the first one, skipping any already present
    fn extend_front(&mut self, chunk: u32) -> Vec<MonthKey> {
        let Some(first) = self.first() else {
            return Vec::new();
        };
        let added: Vec<MonthKey> = (1..=chunk as i32)
            .rev()
            .map(|delta| first.offset(-delta))
            .filter(|key| !self.contains(*key))
            .collect();
        let mut months = added.clone();
        months.append(&mut self.months);
        self.months = months;
        added
    }

    /// `chunk` months after the last one, skipping any already present
    fn extend_back(&mut self, chunk: u32) -> Vec<MonthKey> {
        let Some(last) = self.last() else {
            return Vec::new();
        };
        let added: Vec<MonthKey> = (1..=chunk as i32)
            .map(|delta| last.offset(delta))
            .filter(|key| !self.contains(*key))
            .collect();
        self.months.extend(added.iter().copied());
        added
    }
}

#[derive(Debug, Clone)]
pub struct ScrollWindow {
    window: DisplayWindow,
    state: WindowState,
    config: WindowConfig,
}

impl ScrollWindow {
    /// Start with the configured span around `today`'s month
    pub fn new(config: WindowConfig, today: NaiveDate) -> Self {
        let window = DisplayWindow::around(MonthKey::from_date(today), config.before, config.after);
        log::debug!(
            "event=window_init first={:?} last={:?} months={}",
            window.first(),
            window.last(),
            window.len()
        );
        Self {
            window,
            state: WindowState::Idle,
            config,
        }
    }

    pub fn window(&self) -> &DisplayWindow {
        &self.window
    }

    pub fn months(&self) -> &[MonthKey] {
        self.window.months()
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn is_extending(&self) -> bool {
        matches!(self.state, WindowState::Extending { .. })
    }

    /// Offset that brings a month starting at `month_top` into view on
    /// first display
    pub fn initial_offset(&self, month_top: usize) -> usize {
        month_top + self.config.initial_nudge
    }

    /// React to a viewport update.
    ///
    /// Near the top, earlier months are prepended and the window waits in
    /// `Extending` for [`commit_measurement`](Self::commit_measurement).
    /// Near the bottom, later months are appended immediately.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Extension {
        let mut extension = Extension::default();
        if self.is_extending() || self.window.is_empty() {
            return extension;
        }

        if metrics.offset < self.config.threshold {
            extension.prepended = self.window.extend_front(self.config.chunk);
            if !extension.prepended.is_empty() {
                self.state = WindowState::Extending {
                    offset: metrics.offset,
                    height_before: metrics.content,
                };
                log::info!(
                    "event=window_prepend added={} first={:?}",
                    extension.prepended.len(),
                    self.window.first()
                );
            }
        }

        if let Some(content) = metrics.content {
            let below = content.saturating_sub(metrics.offset + metrics.viewport);
            if below < self.config.threshold {
                extension.appended = self.window.extend_back(self.config.chunk);
                if !extension.appended.is_empty() {
                    log::info!(
                        "event=window_append added={} last={:?}",
                        extension.appended.len(),
                        self.window.last()
                    );
                }
            }
        }

        extension
    }

    /// Finish a pending prepend with the content height measured after
    /// layout. Returns the offset that keeps the previous content in
    /// place, or `None` when nothing was pending or either height is
    /// unknown (the view then jumps by the inserted height).
    pub fn commit_measurement(&mut self, height_after: Option<usize>) -> Option<usize> {
        let WindowState::Extending { offset, height_before } = self.state else {
            return None;
        };
        self.state = WindowState::Idle;

        match (height_before, height_after) {
            (Some(before), Some(after)) => {
                let delta = after.saturating_sub(before);
                log::debug!("event=scroll_compensate delta={} offset={}", delta, offset + delta);
                Some(offset + delta)
            }
            _ => {
                log::warn!("event=scroll_compensate_skipped reason=unmeasured");
                None
            }
        }
    }

    /// Grow the window one month at a time until it holds `key`.
    /// Used by month navigation, which repositions the viewport itself.
    pub fn ensure_contains(&mut self, key: MonthKey) -> Extension {
        let mut extension = Extension::default();
        loop {
            match (self.window.first(), self.window.last()) {
                (Some(first), _) if key < first => extension.prepended.extend(self.window.extend_front(1)),
                (_, Some(last)) if key > last => extension.appended.extend(self.window.extend_back(1)),
                _ => break,
            }
        }
        extension.prepended.reverse();
        if !extension.is_empty() {
            log::info!(
                "event=window_jump target={} prepended={} appended={}",
                key,
                extension.prepended.len(),
                extension.appended.len()
            );
        }
        extension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn key(y: i32, month0: i32) -> MonthKey {
        MonthKey::new(y, month0)
    }

    fn window() -> ScrollWindow {
        ScrollWindow::new(WindowConfig::default(), d(2025, 3, 15))
    }

    fn near_top(content: usize) -> ScrollMetrics {
        ScrollMetrics {
            offset: 0,
            viewport: 20,
            content: Some(content),
        }
    }

    fn middle(content: usize) -> ScrollMetrics {
        ScrollMetrics {
            offset: 50,
            viewport: 20,
            content: Some(content),
        }
    }

    fn is_sorted_unique(months: &[MonthKey]) -> bool {
        months.windows(2).all(|w| w[0] < w[1])
    }

    // ========== initial window tests ==========

    #[test]
    fn test_initial_window_spans_around_today() {
        let sw = window();
        assert_eq!(
            sw.months(),
            &[key(2025, 0), key(2025, 1), key(2025, 2), key(2025, 3), key(2025, 4)]
        );
        assert_eq!(sw.state(), WindowState::Idle);
    }

    #[test]
    fn test_initial_window_crosses_year_boundary() {
        let sw = ScrollWindow::new(WindowConfig::default(), d(2025, 1, 10));
        assert_eq!(sw.window().first(), Some(key(2024, 10)));
        assert_eq!(sw.window().last(), Some(key(2025, 2)));
    }

    #[test]
    fn test_initial_offset_adds_nudge() {
        assert_eq!(window().initial_offset(40), 41);
    }

    // ========== top extension tests ==========

    #[test]
    fn test_top_extension_prepends_chunk() {
        let mut sw = window();
        let ext = sw.on_scroll(near_top(200));

        assert_eq!(ext.prepended, vec![key(2024, 11)]);
        assert!(ext.appended.is_empty());
        assert_eq!(sw.window().first(), Some(key(2024, 11)));
        assert!(sw.is_extending());
        assert!(is_sorted_unique(sw.months()));
    }

    #[test]
    fn test_top_extension_with_larger_chunk() {
        let config = WindowConfig {
            chunk: 3,
            ..WindowConfig::default()
        };
        let mut sw = ScrollWindow::new(config, d(2025, 3, 15));
        let ext = sw.on_scroll(near_top(200));

        assert_eq!(ext.prepended, vec![key(2024, 9), key(2024, 10), key(2024, 11)]);
        assert_eq!(sw.months()[3], key(2025, 0));
    }

    #[test]
    fn test_scroll_ignored_while_extending() {
        let mut sw = window();
        sw.on_scroll(near_top(200));
        let len = sw.window().len();

        let ext = sw.on_scroll(near_top(200));
        assert!(ext.is_empty());
        assert_eq!(sw.window().len(), len);
    }

    #[test]
    fn test_commit_compensates_by_height_delta() {
        let mut sw = window();
        sw.on_scroll(ScrollMetrics {
            offset: 1,
            viewport: 20,
            content: Some(200),
        });

        assert_eq!(sw.commit_measurement(Some(240)), Some(41));
        assert_eq!(sw.state(), WindowState::Idle);
    }

    #[test]
    fn test_commit_without_measurement_skips_compensation() {
        let mut sw = window();
        sw.on_scroll(near_top(200));

        assert_eq!(sw.commit_measurement(None), None);
        assert!(!sw.is_extending());
    }

    #[test]
    fn test_commit_when_idle_is_noop() {
        let mut sw = window();
        assert_eq!(sw.commit_measurement(Some(100)), None);
    }

    #[test]
    fn test_unmeasured_content_still_prepends() {
        let mut sw = window();
        let ext = sw.on_scroll(ScrollMetrics {
            offset: 0,
            viewport: 20,
            content: None,
        });
        assert_eq!(ext.prepended.len(), 1);
        assert_eq!(sw.commit_measurement(Some(300)), None);
    }

    // ========== bottom extension tests ==========

    #[test]
    fn test_bottom_extension_appends_without_extending_state() {
        let mut sw = window();
        let ext = sw.on_scroll(ScrollMetrics {
            offset: 180,
            viewport: 20,
            content: Some(201),
        });

        assert_eq!(ext.appended, vec![key(2025, 5)]);
        assert!(!sw.is_extending());
    }

    #[test]
    fn test_no_extension_in_middle() {
        let mut sw = window();
        assert!(sw.on_scroll(middle(200)).is_empty());
        assert_eq!(sw.window().len(), 5);
    }

    #[test]
    fn test_repeated_extensions_stay_duplicate_free() {
        let mut sw = window();
        for _ in 0..6 {
            sw.on_scroll(near_top(200));
            sw.commit_measurement(Some(230));
            sw.on_scroll(ScrollMetrics {
                offset: 190,
                viewport: 20,
                content: Some(200),
            });
        }
        assert!(is_sorted_unique(sw.months()));
        assert_eq!(sw.window().len(), 17);
    }

    // ========== ensure_contains tests ==========

    #[test]
    fn test_ensure_contains_grows_toward_target() {
        let mut sw = window();
        let ext = sw.ensure_contains(key(2024, 9));

        assert_eq!(ext.prepended, vec![key(2024, 9), key(2024, 10), key(2024, 11)]);
        assert!(sw.window().contains(key(2024, 9)));
        assert!(is_sorted_unique(sw.months()));

        assert!(sw.ensure_contains(key(2025, 2)).is_empty());

        let ext = sw.ensure_contains(key(2025, 6));
        assert_eq!(ext.appended, vec![key(2025, 5), key(2025, 6)]);
    }
}
