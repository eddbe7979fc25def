//! Environment-driven configuration

use crate::metrics::DEFAULT_SWIPE_THRESHOLD;
use std::path::PathBuf;

const APP_DIR: &str = "health-dash";

/// Where the dashboard reads its data from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Pre-aggregated JSON snapshot
    Json(PathBuf),
    /// SQLite health log, aggregated on load
    Sqlite(PathBuf),
}

impl DataSource {
    pub fn path(&self) -> &PathBuf {
        match self {
            DataSource::Json(p) | DataSource::Sqlite(p) => p,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: DataSource,
    pub swipe_threshold: i32,
    pub live_reload: bool,
    pub log_filter: String,
    pub log_path: PathBuf,
}

fn home() -> String {
    std::env::var("HOME").unwrap_or_else(|_| ".".to_string())
}

fn default_data_path() -> PathBuf {
    let data_home =
        std::env::var("XDG_DATA_HOME").unwrap_or_else(|_| format!("{}/.local/share", home()));
    PathBuf::from(data_home).join(APP_DIR).join("snapshot.json")
}

fn default_log_path() -> PathBuf {
    let cache_home =
        std::env::var("XDG_CACHE_HOME").unwrap_or_else(|_| format!("{}/.cache", home()));
    PathBuf::from(cache_home).join(APP_DIR).join("health-dash.log")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: DataSource::Json(default_data_path()),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            live_reload: true,
            log_filter: "warn".to_string(),
            log_path: default_log_path(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; invalid values keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("HEALTH_DASH_DATA").filter(|v| !v.trim().is_empty()) {
            config.source = DataSource::Json(PathBuf::from(path));
        }
        // The SQLite log wins when both are set
        if let Some(path) = lookup("HEALTH_DASH_DB").filter(|v| !v.trim().is_empty()) {
            config.source = DataSource::Sqlite(PathBuf::from(path));
        }
        if let Some(value) = lookup("HEALTH_DASH_SWIPE_THRESHOLD") {
            if let Ok(threshold) = value.trim().parse::<i32>() {
                if threshold > 0 {
                    config.swipe_threshold = threshold;
                }
            }
        }
        if let Some(value) = lookup("HEALTH_DASH_LIVE") {
            match value.trim().to_ascii_lowercase().as_str() {
                "0" | "false" | "off" | "no" => config.live_reload = false,
                "1" | "true" | "on" | "yes" => config.live_reload = true,
                _ => {}
            }
        }
        if let Some(filter) = lookup("HEALTH_DASH_LOG").filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: FxHashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.swipe_threshold, 50);
        assert!(config.live_reload);
        assert!(matches!(config.source, DataSource::Json(ref p) if p.ends_with("health-dash/snapshot.json")));
    }

    #[test]
    fn test_db_takes_precedence() {
        let config = Config::from_lookup(lookup(&[
            ("HEALTH_DASH_DATA", "/tmp/a.json"),
            ("HEALTH_DASH_DB", "/tmp/log.db"),
        ]));
        assert_eq!(config.source, DataSource::Sqlite(PathBuf::from("/tmp/log.db")));
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let config = Config::from_lookup(lookup(&[
            ("HEALTH_DASH_SWIPE_THRESHOLD", "-3"),
            ("HEALTH_DASH_LIVE", "maybe"),
        ]));
        assert_eq!(config.swipe_threshold, 50);
        assert!(config.live_reload);

        let config = Config::from_lookup(lookup(&[
            ("HEALTH_DASH_SWIPE_THRESHOLD", " 8 "),
            ("HEALTH_DASH_LIVE", "off"),
            ("HEALTH_DASH_LOG", "debug"),
        ]));
        assert_eq!(config.swipe_threshold, 8);
        assert!(!config.live_reload);
        assert_eq!(config.log_filter, "debug");
    }
}
