//! TUI widgets

pub mod agenda;
pub mod day_list;
pub mod event_detail;
pub mod help;
pub mod month_view;
pub mod new_event;
pub mod spinner;
pub mod tabs;

use crate::types::CalendarEvent;

/// Short "when" text for lists and popups
pub fn time_label(event: &CalendarEvent) -> String {
    if event.all_day {
        if event.is_multi_day() {
            format!("{} - {}", event.start.format("%b %-d"), event.end_date().format("%b %-d"))
        } else {
            "All day".to_string()
        }
    } else if event.start_date() == event.end_date() {
        format!("{} - {}", event.start.format("%H:%M"), event.effective_end().format("%H:%M"))
    } else {
        format!(
            "{} - {}",
            event.start.format("%b %-d %H:%M"),
            event.effective_end().format("%b %-d %H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{end_of_day, start_of_day};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn event(start: chrono::NaiveDateTime, end: chrono::NaiveDateTime, all_day: bool) -> CalendarEvent {
        CalendarEvent {
            id: "e".into(),
            title: "E".into(),
            description: String::new(),
            start,
            end,
            all_day,
            color: String::new(),
        }
    }

    #[test]
    fn test_time_label_variants() {
        let day = d(2025, 3, 4);
        assert_eq!(time_label(&event(start_of_day(day), end_of_day(day), true)), "All day");
        assert_eq!(
            time_label(&event(start_of_day(day), end_of_day(d(2025, 3, 6)), true)),
            "Mar 4 - Mar 6"
        );
        assert_eq!(
            time_label(&event(day.and_hms_opt(9, 0, 0).unwrap(), day.and_hms_opt(9, 30, 0).unwrap(), false)),
            "09:00 - 09:30"
        );
        assert_eq!(
            time_label(&event(
                day.and_hms_opt(22, 0, 0).unwrap(),
                d(2025, 3, 5).and_hms_opt(2, 0, 0).unwrap(),
                false
            )),
            "Mar 4 22:00 - Mar 5 02:00"
        );
    }
}
