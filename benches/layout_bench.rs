//! Criterion benchmarks for month layout

use chrono::{Duration, NaiveDate};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use gridcal::calendar::{build_month_layout, MonthKey, DEFAULT_MAX_VISIBLE};
use gridcal::services::event_loader::map_events;
use gridcal::types::{end_of_day, start_of_day, CalendarEvent, ColorOverrides, RawCalendarEvent};

/// A year of synthetic events: daily meetings, frequent all-day items and
/// overlapping multi-day spans
fn synthetic_events(count: usize) -> Vec<CalendarEvent> {
    let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
    (0..count)
        .map(|i| {
            let first = base + Duration::days((i * 7 % 365) as i64);
            let id = format!("e{i}");
            match i % 4 {
                0 => {
                    let last = first + Duration::days((i % 9) as i64 + 1);
                    CalendarEvent {
                        id,
                        title: format!("Span {i}"),
                        description: String::new(),
                        start: start_of_day(first),
                        end: end_of_day(last),
                        all_day: true,
                        color: "bg-blue-500".into(),
                    }
                }
                1 => CalendarEvent {
                    id,
                    title: format!("Holiday {i}"),
                    description: String::new(),
                    start: start_of_day(first),
                    end: end_of_day(first),
                    all_day: true,
                    color: "bg-green-500".into(),
                },
                _ => {
                    let start = first.and_hms_opt(8 + (i % 10) as u32, 0, 0).unwrap_or_default();
                    CalendarEvent {
                        id,
                        title: format!("Meeting {i}"),
                        description: String::new(),
                        start,
                        end: start + Duration::minutes(45),
                        all_day: false,
                        color: "bg-orange-500".into(),
                    }
                }
            }
        })
        .collect()
}

fn bench_month_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for count in [100usize, 1_000, 10_000] {
        let events = synthetic_events(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("build_month_layout", count), &events, |b, events| {
            b.iter(|| build_month_layout(black_box(events), MonthKey::new(2025, 5), DEFAULT_MAX_VISIBLE));
        });
    }

    group.finish();
}

fn bench_scroll_window_of_months(c: &mut Criterion) {
    let events = synthetic_events(2_000);
    let months: Vec<MonthKey> = (0..12).map(|m| MonthKey::new(2025, m)).collect();

    let mut group = c.benchmark_group("layout");
    group.bench_function("twelve_months", |b| {
        b.iter(|| {
            for &key in &months {
                black_box(build_month_layout(&events, key, DEFAULT_MAX_VISIBLE));
            }
        });
    });
    group.finish();
}

fn bench_map_events(c: &mut Criterion) {
    let records: Vec<RawCalendarEvent> = (0..5_000)
        .map(|i| RawCalendarEvent {
            id: format!("r{i}"),
            title: Some(format!("Record {i}")),
            start: Some(format!("2025-03-{:02}T09:00:00+00:00", i % 28 + 1)),
            end: Some(format!("2025-03-{:02}T10:00:00+00:00", i % 28 + 1)),
            ..RawCalendarEvent::default()
        })
        .collect();
    let overrides = ColorOverrides::new();

    let mut group = c.benchmark_group("loader");
    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("map_events", |b| {
        b.iter(|| map_events(black_box(&records), &overrides));
    });
    group.finish();
}

criterion_group!(benches, bench_month_layout, bench_scroll_window_of_months, bench_map_events);
criterion_main!(benches);
