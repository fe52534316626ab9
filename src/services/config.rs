//! User configuration loaded from `~/.gridcal/config.json`

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::calendar::{WindowConfig, DEFAULT_MAX_VISIBLE, MAX_VISIBLE_LIMIT};
use crate::types::{ColorOverrides, GridcalError, Result};

const CONFIG_FILE: &str = "config.json";

/// `~/.gridcal`
pub fn base_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| GridcalError::Config("Cannot determine home directory".into()))?;
    Ok(base_dirs.home_dir().join(".gridcal"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of `*.json` event files; `~/.gridcal/events` when unset
    pub events_dir: Option<PathBuf>,
    /// Visible slots per cell
    pub max_visible_events: usize,
    pub initial_months_before: u32,
    pub initial_months_after: u32,
    /// Months added per scroll extension
    pub load_chunk: u32,
    /// Rows from the top/bottom edge that trigger an extension
    pub edge_threshold: usize,
    pub refresh_interval_secs: u64,
    /// Terminal width below which the compact layout is used
    pub compact_width: u16,
    pub log_level: String,
    pub color_overrides: ColorOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            events_dir: None,
            max_visible_events: DEFAULT_MAX_VISIBLE,
            initial_months_before: 2,
            initial_months_after: 2,
            load_chunk: 1,
            edge_threshold: 2,
            refresh_interval_secs: 5,
            compact_width: 70,
            log_level: "info".to_string(),
            color_overrides: ColorOverrides::new(),
        }
    }
}

impl Config {
    /// Load from the default location; a missing file yields defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&base_dir()?.join(CONFIG_FILE))
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| GridcalError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.load_chunk == 0 {
            return Err(GridcalError::Config("load_chunk must be at least 1".into()));
        }
        if self.max_visible_events > MAX_VISIBLE_LIMIT {
            return Err(GridcalError::Config(format!(
                "max_visible_events must be at most {}",
                MAX_VISIBLE_LIMIT
            )));
        }
        Ok(())
    }

    /// Resolved events directory
    pub fn events_dir(&self) -> Result<PathBuf> {
        match &self.events_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(base_dir()?.join("events")),
        }
    }

    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            before: self.initial_months_before,
            after: self.initial_months_after,
            chunk: self.load_chunk,
            threshold: self.edge_threshold,
            ..WindowConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_visible_events, 3);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{"max_visible_events": 5, "color_overrides": {"evt-1": "bg-pink-500"}}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.max_visible_events, 5);
        assert_eq!(config.load_chunk, 1);
        assert_eq!(config.color_overrides.get("evt-1").map(String::as_str), Some("bg-pink-500"));
    }

    #[test]
    fn test_oversized_budget_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, format!(r#"{{"max_visible_events": {}}}"#, usize::MAX)).unwrap();
        assert!(matches!(Config::load_from(&path), Err(GridcalError::Config(msg)) if msg.contains("max_visible_events")));

        fs::write(&path, format!(r#"{{"max_visible_events": {}}}"#, MAX_VISIBLE_LIMIT)).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().max_visible_events, MAX_VISIBLE_LIMIT);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load_from(&path), Err(GridcalError::Config(_))));
    }

    #[test]
    fn test_zero_chunk_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"load_chunk": 0}"#).unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_window_config_mapping() {
        let config = Config {
            initial_months_before: 4,
            load_chunk: 2,
            ..Config::default()
        };
        let window = config.window_config();
        assert_eq!(window.before, 4);
        assert_eq!(window.after, 2);
        assert_eq!(window.chunk, 2);
        assert_eq!(window.threshold, 2);
    }

    #[test]
    fn test_explicit_events_dir() {
        let config = Config {
            events_dir: Some(PathBuf::from("/tmp/cal")),
            ..Config::default()
        };
        assert_eq!(config.events_dir().unwrap(), PathBuf::from("/tmp/cal"));
    }
}
