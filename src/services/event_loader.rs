//! Event source: a directory of JSON files, each an array of raw events.
//!
//! Files are read in parallel under a shared lock, merged in path order
//! and deduplicated by id (the first occurrence wins). Records whose dates
//! cannot be resolved are skipped, never surfaced to the grid.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use rayon::prelude::*;

use crate::types::{CalendarEvent, ColorOverrides, LoadWarning, RawCalendarEvent, Result};

/// Result of loading the event directory
#[derive(Debug, Default)]
pub struct LoadedEvents {
    pub events: Vec<CalendarEvent>,
    pub warnings: Vec<LoadWarning>,
}

pub struct EventLoaderService {
    events_dir: PathBuf,
    overrides: ColorOverrides,
}

impl EventLoaderService {
    pub fn new(events_dir: PathBuf, overrides: ColorOverrides) -> Self {
        Self { events_dir, overrides }
    }

    pub fn events_dir(&self) -> &Path {
        &self.events_dir
    }

    /// `*.json` files in the events directory, sorted by path
    pub fn collect_files(&self) -> Vec<PathBuf> {
        let pattern = self.events_dir.join("*.json");
        let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
            .map(|paths| paths.filter_map(|e| e.ok()).collect())
            .unwrap_or_default();
        files.sort();
        files
    }

    /// Load, merge, deduplicate and map every event.
    ///
    /// A missing directory is an empty calendar. Unreadable files and
    /// unmappable records become warnings.
    pub fn load(&self) -> Result<LoadedEvents> {
        if !self.events_dir.exists() {
            log::info!("event=load_skip reason=missing_dir dir={}", self.events_dir.display());
            return Ok(LoadedEvents::default());
        }

        let files = self.collect_files();
        let per_file: Vec<std::result::Result<Vec<RawCalendarEvent>, LoadWarning>> =
            files.par_iter().map(|path| read_event_file(path)).collect();

        let mut warnings = Vec::new();
        let mut raw = Vec::new();
        for result in per_file {
            match result {
                Ok(records) => raw.extend(records),
                Err(warning) => {
                    log::warn!("event=load_file_failed detail={:?}", warning);
                    warnings.push(warning);
                }
            }
        }

        let raw = dedup_by_id(raw);
        let (events, skipped) = map_events(&raw, &self.overrides);
        if skipped > 0 {
            warnings.push(LoadWarning::SkippedEvents(skipped));
        }

        log::info!(
            "event=load_done files={} events={} skipped={} dir={}",
            files.len(),
            events.len(),
            skipped,
            self.events_dir.display()
        );
        Ok(LoadedEvents { events, warnings })
    }
}

/// Read one file under a shared lock so a concurrent writer never yields
/// a torn read
fn read_event_file(path: &Path) -> std::result::Result<Vec<RawCalendarEvent>, LoadWarning> {
    let file = File::open(path)
        .map_err(|e| LoadWarning::LoadFailed(format!("Failed to open {}: {}", path.display(), e)))?;

    file.lock_shared().map_err(|e| {
        LoadWarning::LoadFailed(format!("Failed to acquire read lock on {}: {}", path.display(), e))
    })?;

    let mut content = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut content);
    let _ = file.unlock();
    read.map_err(|e| LoadWarning::LoadFailed(format!("Failed to read {}: {}", path.display(), e)))?;

    serde_json::from_str(&content)
        .map_err(|e| LoadWarning::Corrupted(format!("Corrupted event file {}: {}", path.display(), e)))
}

/// Keep the first record for each id
pub fn dedup_by_id(records: Vec<RawCalendarEvent>) -> Vec<RawCalendarEvent> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect()
}

/// Map raw records, skipping the ones that fail. Returns the events and
/// the number skipped.
pub fn map_events(records: &[RawCalendarEvent], overrides: &ColorOverrides) -> (Vec<CalendarEvent>, usize) {
    let mut skipped = 0;
    let events = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match CalendarEvent::from_raw(record, index, overrides) {
            Ok(event) => Some(event),
            Err(e) => {
                log::warn!("event=event_skipped id={} reason={}", record.id, e);
                skipped += 1;
                None
            }
        })
        .collect();
    (events, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn raw(id: &str, start: &str, end: &str, all_day: bool) -> RawCalendarEvent {
        RawCalendarEvent {
            id: id.to_string(),
            title: Some(format!("Event {id}")),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            all_day: Some(all_day),
            ..RawCalendarEvent::default()
        }
    }

    fn write_json(dir: &Path, name: &str, records: &[RawCalendarEvent]) {
        fs::write(dir.join(name), serde_json::to_string(records).unwrap()).unwrap();
    }

    fn create_test_service() -> (EventLoaderService, TempDir) {
        let temp = TempDir::new().unwrap();
        let service = EventLoaderService::new(temp.path().to_path_buf(), ColorOverrides::new());
        (service, temp)
    }

    // ========== dedup_by_id tests ==========

    #[test]
    fn test_dedup_keeps_first() {
        let records = vec![
            raw("a", "2025-03-01", "2025-03-02", true),
            raw("b", "2025-03-05", "2025-03-06", true),
            RawCalendarEvent {
                title: Some("Second copy".into()),
                ..raw("a", "2025-03-01", "2025-03-02", true)
            },
        ];
        let deduped = dedup_by_id(records);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title.as_deref(), Some("Event a"));
    }

    // ========== map_events tests ==========

    #[test]
    fn test_map_events_skips_unparsable() {
        let records = vec![
            raw("ok", "2025-03-01", "2025-03-02", true),
            raw("bad", "yesterday", "today", true),
        ];
        let (events, skipped) = map_events(&records, &ColorOverrides::new());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "ok");
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_map_events_palette_by_position() {
        let records = vec![
            raw("a", "2025-03-01", "2025-03-02", true),
            raw("b", "2025-03-01", "2025-03-02", true),
        ];
        let (events, _) = map_events(&records, &ColorOverrides::new());
        assert_eq!(events[0].color, "bg-blue-500");
        assert_eq!(events[1].color, "bg-purple-500");
    }

    // ========== load tests ==========

    #[test]
    fn test_missing_dir_is_empty_calendar() {
        let temp = TempDir::new().unwrap();
        let service = EventLoaderService::new(temp.path().join("nope"), ColorOverrides::new());
        let loaded = service.load().unwrap();
        assert!(loaded.events.is_empty());
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_load_merges_files_in_path_order() {
        let (service, temp) = create_test_service();
        write_json(
            temp.path(),
            "a_personal.json",
            &[raw("shared", "2025-03-01", "2025-03-02", true)],
        );
        write_json(
            temp.path(),
            "b_team.json",
            &[
                RawCalendarEvent {
                    title: Some("Team copy".into()),
                    ..raw("shared", "2025-03-01", "2025-03-02", true)
                },
                raw("standup", "2025-03-03T09:00:00+00:00", "2025-03-03T09:15:00+00:00", false),
            ],
        );
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let loaded = service.load().unwrap();
        assert_eq!(loaded.events.len(), 2);
        let shared = loaded.events.iter().find(|e| e.id == "shared").unwrap();
        assert_eq!(shared.title, "Event shared");
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_corrupted_file_becomes_warning() {
        let (service, temp) = create_test_service();
        write_json(temp.path(), "good.json", &[raw("a", "2025-03-01", "2025-03-02", true)]);
        fs::write(temp.path().join("bad.json"), "[{ broken").unwrap();

        let loaded = service.load().unwrap();
        assert_eq!(loaded.events.len(), 1);
        assert!(matches!(loaded.warnings.as_slice(), [LoadWarning::Corrupted(_)]));
    }

    #[test]
    fn test_skipped_records_reported() {
        let (service, temp) = create_test_service();
        write_json(
            temp.path(),
            "cal.json",
            &[
                raw("a", "2025-03-01", "2025-03-02", true),
                raw("b", "", "", false),
            ],
        );

        let loaded = service.load().unwrap();
        assert_eq!(loaded.events.len(), 1);
        assert_eq!(loaded.warnings, vec![LoadWarning::SkippedEvents(1)]);
    }

    #[test]
    fn test_collect_files_sorted() {
        let (service, temp) = create_test_service();
        write_json(temp.path(), "z.json", &[]);
        write_json(temp.path(), "a.json", &[]);

        let names: Vec<String> = service
            .collect_files()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "z.json"]);
    }
}
