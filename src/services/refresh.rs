//! Reload notifications for the event collection.
//!
//! A watcher thread polls the events directory and sends a
//! [`RefreshSignal`] when its fingerprint (file names, sizes, mtimes)
//! changes. The front end owns the receiver and reloads wholesale on
//! every signal; manual refreshes go through the same channel.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

/// Granularity at which the watcher checks for shutdown
const STOP_CHECK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSignal {
    /// Files in the events directory changed
    Changed,
    /// User asked for a reload
    Manual,
}

/// Snapshot of the `*.json` files in a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprint(Vec<(PathBuf, u64, Option<SystemTime>)>);

impl Fingerprint {
    pub fn of_dir(dir: &Path) -> Self {
        let pattern = dir.join("*.json");
        let mut entries: Vec<(PathBuf, u64, Option<SystemTime>)> = glob::glob(&pattern.to_string_lossy())
            .map(|paths| {
                paths
                    .filter_map(|e| e.ok())
                    .map(|path| {
                        let meta = path.metadata().ok();
                        let size = meta.as_ref().map(|m| m.len()).unwrap_or(0);
                        let mtime = meta.and_then(|m| m.modified().ok());
                        (path, size, mtime)
                    })
                    .collect()
            })
            .unwrap_or_default();
        entries.sort();
        Self(entries)
    }
}

/// Background directory poller; stops when dropped
pub struct DirectoryWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl DirectoryWatcher {
    pub fn spawn(dir: PathBuf, interval: Duration, tx: Sender<RefreshSignal>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let mut last = Fingerprint::of_dir(&dir);
            log::debug!("event=watch_start dir={} interval_ms={}", dir.display(), interval.as_millis());

            loop {
                let mut waited = Duration::ZERO;
                while waited < interval {
                    if stop_flag.load(Ordering::Relaxed) {
                        return;
                    }
                    thread::sleep(STOP_CHECK);
                    waited += STOP_CHECK;
                }

                let current = Fingerprint::of_dir(&dir);
                if current != last {
                    last = current;
                    log::info!("event=refresh_signal source=watcher dir={}", dir.display());
                    if tx.send(RefreshSignal::Changed).is_err() {
                        // Receiver gone, nothing left to notify
                        return;
                    }
                }
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::mpsc;
    use tempfile::TempDir;

    // ========== Fingerprint tests ==========

    #[test]
    fn test_fingerprint_ignores_non_json() {
        let temp = TempDir::new().unwrap();
        let before = Fingerprint::of_dir(temp.path());
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        assert_eq!(Fingerprint::of_dir(temp.path()), before);
    }

    #[test]
    fn test_fingerprint_changes_on_new_file() {
        let temp = TempDir::new().unwrap();
        let before = Fingerprint::of_dir(temp.path());
        fs::write(temp.path().join("cal.json"), "[]").unwrap();
        assert_ne!(Fingerprint::of_dir(temp.path()), before);
    }

    #[test]
    fn test_fingerprint_changes_on_size() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cal.json");
        fs::write(&path, "[]").unwrap();
        let before = Fingerprint::of_dir(temp.path());
        fs::write(&path, "[ ]").unwrap();
        assert_ne!(Fingerprint::of_dir(temp.path()), before);
    }

    #[test]
    fn test_missing_dir_fingerprint_is_empty() {
        let temp = TempDir::new().unwrap();
        assert_eq!(Fingerprint::of_dir(&temp.path().join("gone")), Fingerprint::default());
    }

    // ========== DirectoryWatcher tests ==========

    #[test]
    fn test_watcher_signals_change() {
        let temp = TempDir::new().unwrap();
        let (tx, rx) = mpsc::channel();
        let _watcher = DirectoryWatcher::spawn(temp.path().to_path_buf(), Duration::from_millis(100), tx);

        thread::sleep(Duration::from_millis(150));
        fs::write(temp.path().join("cal.json"), "[]").unwrap();

        let signal = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(signal, RefreshSignal::Changed);
    }

    #[test]
    fn test_watcher_stops_on_drop() {
        let temp = TempDir::new().unwrap();
        let (tx, rx) = mpsc::channel();
        let watcher = DirectoryWatcher::spawn(temp.path().to_path_buf(), Duration::from_millis(100), tx);
        drop(watcher);

        // Sender dropped with the thread
        assert!(rx.recv_timeout(Duration::from_secs(1)).is_err());
    }
}
