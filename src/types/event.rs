//! Calendar event types and the raw → display mapping

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{GridcalError, Result};

/// Fallback colours assigned by position when an event carries none
pub const DEFAULT_PALETTE: [&str; 5] = [
    "bg-blue-500",
    "bg-purple-500",
    "bg-green-500",
    "bg-orange-500",
    "bg-pink-500",
];

/// Colour overrides keyed by event id, owned by the caller
pub type ColorOverrides = HashMap<String, String>;

/// Event record as stored in an event source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCalendarEvent {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `YYYY-MM-DD` for all-day events, an offset datetime otherwise
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    /// Epoch milliseconds (preferred over `start` for timed events)
    #[serde(default)]
    pub start_timestamp: Option<i64>,
    #[serde(default)]
    pub end_timestamp: Option<i64>,
    #[serde(default)]
    pub all_day: Option<bool>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A calendar event in local wall-clock time.
///
/// For all-day events `end` is inclusive: the last included day at
/// 23:59:59.999.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    /// Opaque display token (e.g. "bg-blue-500")
    pub color: String,
}

impl CalendarEvent {
    /// Map a raw record into a display event.
    ///
    /// `index` picks the palette colour when neither an override nor the
    /// record itself provides one.
    pub fn from_raw(raw: &RawCalendarEvent, index: usize, overrides: &ColorOverrides) -> Result<Self> {
        let color = resolve_color(raw, index, overrides);
        let title = raw.title.clone().unwrap_or_else(|| "Untitled".to_string());
        let description = raw.description.clone().unwrap_or_default();
        let all_day = raw.all_day.unwrap_or(false);

        let (start, end) = if all_day {
            let start_date = all_day_date(raw.start.as_deref(), raw.start_timestamp)
                .ok_or_else(|| invalid(raw, "unparsable all-day start"))?;
            let end_exclusive = all_day_date(raw.end.as_deref(), raw.end_timestamp)
                .ok_or_else(|| invalid(raw, "unparsable all-day end"))?;

            let start = start_date.and_time(NaiveTime::MIN);
            let end = end_exclusive
                .and_time(NaiveTime::MIN)
                .checked_sub_signed(Duration::milliseconds(1))
                .ok_or_else(|| invalid(raw, "all-day end out of range"))?;
            // Exclusive end on or before start collapses to a zero-width event
            (start, end.max(start))
        } else {
            let start = timed_instant(raw.start.as_deref(), raw.start_timestamp)
                .ok_or_else(|| invalid(raw, "unparsable start"))?;
            let end = timed_instant(raw.end.as_deref(), raw.end_timestamp)
                .ok_or_else(|| invalid(raw, "unparsable end"))?;
            (start, end)
        };

        Ok(Self {
            id: raw.id.clone(),
            title,
            description,
            start,
            end,
            all_day,
            color,
        })
    }

    /// End instant clamped so it never precedes the start
    pub fn effective_end(&self) -> NaiveDateTime {
        self.end.max(self.start)
    }

    /// Local date of the start instant
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Local date of the (clamped) end instant
    pub fn end_date(&self) -> NaiveDate {
        self.effective_end().date()
    }

    /// All-day event whose start and end fall on different dates
    pub fn is_multi_day(&self) -> bool {
        self.all_day && self.end_date() > self.start_date()
    }

    /// Whether the event's date interval touches `[from, to]` (inclusive)
    pub fn overlaps_dates(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start_date() <= to && self.end_date() >= from
    }

    /// Whether the event's date interval contains `date`
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.overlaps_dates(date, date)
    }
}

fn invalid(raw: &RawCalendarEvent, reason: &str) -> GridcalError {
    GridcalError::InvalidEvent {
        id: raw.id.clone(),
        reason: reason.to_string(),
    }
}

fn resolve_color(raw: &RawCalendarEvent, index: usize, overrides: &ColorOverrides) -> String {
    if let Some(color) = overrides.get(&raw.id) {
        return color.clone();
    }
    match raw.color.as_deref().map(str::trim) {
        Some(color) if !color.is_empty() => color.to_string(),
        _ => DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()].to_string(),
    }
}

/// Trailing `[Area/City]` zone id appended by some servers
fn zone_suffix() -> &'static Regex {
    static ZONE_SUFFIX: OnceLock<Regex> = OnceLock::new();
    ZONE_SUFFIX.get_or_init(|| Regex::new(r"\[[^\]]*\]\s*$").expect("valid regex"))
}

fn local_from_millis(ms: i64) -> Option<NaiveDateTime> {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.naive_local())
}

/// Resolve an all-day boundary: the date string is trusted as-is, the
/// timestamp is truncated to its local date.
fn all_day_date(text: Option<&str>, timestamp: Option<i64>) -> Option<NaiveDate> {
    match text {
        Some(text) => parse_date_or_datetime(text).map(|dt| dt.date()),
        None => timestamp.and_then(local_from_millis).map(|dt| dt.date()),
    }
}

fn timed_instant(text: Option<&str>, timestamp: Option<i64>) -> Option<NaiveDateTime> {
    match timestamp {
        Some(ms) => local_from_millis(ms),
        None => text.and_then(parse_date_or_datetime),
    }
}

/// Parse the date formats event sources emit into local wall-clock time.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 (with or without seconds), an optional
/// bracketed zone id suffix, and naive `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_date_or_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = zone_suffix().replace(text.trim(), "");
    let s = trimmed.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for fmt in ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Local).naive_local());
        }
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    None
}

/// Midnight at the start of `date`
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable millisecond of `date` (23:59:59.999)
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn raw_all_day(id: &str, start: &str, end: &str) -> RawCalendarEvent {
        RawCalendarEvent {
            id: id.to_string(),
            title: Some("Trip".to_string()),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            all_day: Some(true),
            ..Default::default()
        }
    }

    // ========== from_raw tests ==========

    #[test]
    fn test_all_day_exclusive_end_becomes_inclusive() {
        let raw = raw_all_day("a", "2025-03-01", "2025-03-04");
        let event = CalendarEvent::from_raw(&raw, 0, &ColorOverrides::new()).unwrap();

        assert_eq!(event.start, start_of_day(d(2025, 3, 1)));
        assert_eq!(event.end, end_of_day(d(2025, 3, 3)));
        assert!(event.is_multi_day());
    }

    #[test]
    fn test_all_day_single_day() {
        let raw = raw_all_day("a", "2025-03-02", "2025-03-03");
        let event = CalendarEvent::from_raw(&raw, 0, &ColorOverrides::new()).unwrap();

        assert_eq!(event.start_date(), d(2025, 3, 2));
        assert_eq!(event.end_date(), d(2025, 3, 2));
        assert!(!event.is_multi_day());
    }

    #[test]
    fn test_all_day_degenerate_end_clamped_to_start() {
        // start == exclusive end would put the inclusive end a millisecond before start
        let raw = raw_all_day("b", "2025-03-02", "2025-03-02");
        let event = CalendarEvent::from_raw(&raw, 0, &ColorOverrides::new()).unwrap();

        assert_eq!(event.start, event.end);
        assert_eq!(event.start_date(), d(2025, 3, 2));
    }

    #[test]
    fn test_timed_from_rfc3339_strings() {
        let raw = RawCalendarEvent {
            id: "t".to_string(),
            start: Some("2025-03-05T09:00:00".to_string()),
            end: Some("2025-03-05T10:30:00".to_string()),
            ..Default::default()
        };
        let event = CalendarEvent::from_raw(&raw, 0, &ColorOverrides::new()).unwrap();

        assert!(!event.all_day);
        assert_eq!(event.title, "Untitled");
        assert_eq!(event.description, "");
        assert_eq!(event.start.format("%H:%M").to_string(), "09:00");
        assert_eq!(event.end.format("%H:%M").to_string(), "10:30");
    }

    #[test]
    fn test_timed_prefers_timestamps() {
        let start_ms = Local
            .with_ymd_and_hms(2025, 3, 5, 14, 0, 0)
            .single()
            .unwrap()
            .timestamp_millis();
        let raw = RawCalendarEvent {
            id: "t".to_string(),
            start: Some("garbage".to_string()),
            end: Some("garbage".to_string()),
            start_timestamp: Some(start_ms),
            end_timestamp: Some(start_ms + 3_600_000),
            ..Default::default()
        };
        let event = CalendarEvent::from_raw(&raw, 0, &ColorOverrides::new()).unwrap();

        assert_eq!(event.start.format("%H:%M").to_string(), "14:00");
        assert_eq!(event.end.format("%H:%M").to_string(), "15:00");
    }

    #[test]
    fn test_invalid_dates_rejected() {
        let raw = RawCalendarEvent {
            id: "bad".to_string(),
            start: Some("not a date".to_string()),
            ..Default::default()
        };
        let err = CalendarEvent::from_raw(&raw, 0, &ColorOverrides::new()).unwrap_err();
        assert!(matches!(err, GridcalError::InvalidEvent { ref id, .. } if id == "bad"));
    }

    #[test]
    fn test_all_day_end_at_earliest_date_rejected() {
        let raw = raw_all_day("edge", "-262143-01-01", "-262143-01-01");
        let err = CalendarEvent::from_raw(&raw, 0, &ColorOverrides::new()).unwrap_err();
        assert!(matches!(
            err,
            GridcalError::InvalidEvent { ref id, ref reason } if id == "edge" && reason.contains("out of range")
        ));
    }

    // ========== colour resolution tests ==========

    #[test]
    fn test_palette_fallback_cycles_by_index() {
        let raw = raw_all_day("a", "2025-03-01", "2025-03-02");
        let overrides = ColorOverrides::new();

        let first = CalendarEvent::from_raw(&raw, 0, &overrides).unwrap();
        let sixth = CalendarEvent::from_raw(&raw, 5, &overrides).unwrap();
        let third = CalendarEvent::from_raw(&raw, 2, &overrides).unwrap();

        assert_eq!(first.color, "bg-blue-500");
        assert_eq!(sixth.color, "bg-blue-500");
        assert_eq!(third.color, "bg-green-500");
    }

    #[test]
    fn test_blank_server_color_ignored() {
        let mut raw = raw_all_day("a", "2025-03-01", "2025-03-02");
        raw.color = Some("   ".to_string());
        let event = CalendarEvent::from_raw(&raw, 1, &ColorOverrides::new()).unwrap();
        assert_eq!(event.color, "bg-purple-500");
    }

    #[test]
    fn test_override_wins_over_server_color() {
        let mut raw = raw_all_day("a", "2025-03-01", "2025-03-02");
        raw.color = Some("bg-teal-500".to_string());

        let mut overrides = ColorOverrides::new();
        assert_eq!(
            CalendarEvent::from_raw(&raw, 0, &overrides).unwrap().color,
            "bg-teal-500"
        );

        overrides.insert("a".to_string(), "bg-red-500".to_string());
        assert_eq!(
            CalendarEvent::from_raw(&raw, 0, &overrides).unwrap().color,
            "bg-red-500"
        );
    }

    // ========== parse_date_or_datetime tests ==========

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_date_or_datetime("2025-11-07"),
            Some(start_of_day(d(2025, 11, 7)))
        );
    }

    #[test]
    fn test_parse_offset_without_seconds_and_zone_suffix() {
        let parsed = parse_date_or_datetime("2016-11-29T17:00+09:00[Asia/Seoul]");
        let expected = DateTime::parse_from_rfc3339("2016-11-29T17:00:00+09:00")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parsed, Some(expected));
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert_eq!(parse_date_or_datetime(""), None);
        assert_eq!(parse_date_or_datetime("[Asia/Seoul]"), None);
        assert_eq!(parse_date_or_datetime("tomorrow"), None);
    }

    // ========== clamping tests ==========

    #[test]
    fn test_effective_end_clamps_reversed_interval() {
        let event = CalendarEvent {
            id: "r".to_string(),
            title: "Reversed".to_string(),
            description: String::new(),
            start: start_of_day(d(2025, 3, 5)),
            end: start_of_day(d(2025, 3, 1)),
            all_day: true,
            color: "bg-blue-500".to_string(),
        };
        assert_eq!(event.effective_end(), event.start);
        assert_eq!(event.end_date(), d(2025, 3, 5));
        assert!(!event.is_multi_day());
    }

    #[test]
    fn test_end_of_day_is_last_millisecond() {
        let eod = end_of_day(d(2025, 3, 10));
        assert_eq!(eod.format("%H:%M:%S%.3f").to_string(), "23:59:59.999");
    }
}
