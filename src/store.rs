//! Data source: JSON snapshots and the SQLite health log

use crate::config::DataSource;
use crate::metrics::{null_as_default, DailyMetric, METRIC_DAYS};
use crate::week::{WeekDay, WEEK_DAYS};
use chrono::{Duration, NaiveDate};
use fxhash::FxHashMap;
use rusqlite::{params, Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Tables expected in a health log database
#[cfg(test)]
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sleep_log (date TEXT NOT NULL, hours REAL NOT NULL, quality REAL NOT NULL);
CREATE TABLE IF NOT EXISTS stress_log (date TEXT NOT NULL, level REAL NOT NULL);
CREATE TABLE IF NOT EXISTS headache_log (date TEXT NOT NULL, intensity INTEGER NOT NULL);
";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Everything the dashboard renders
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthSnapshot {
    /// Today first, then the two previous days
    #[serde(deserialize_with = "null_as_default")]
    pub daily_metrics: Vec<DailyMetric>,
    /// Oldest day first
    #[serde(deserialize_with = "null_as_default")]
    pub week: Vec<WeekDay>,
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Sql(rusqlite::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "could not read data file: {}", e),
            StoreError::Json(e) => write!(f, "malformed snapshot: {}", e),
            StoreError::Sql(e) => write!(f, "health log query failed: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
            StoreError::Sql(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sql(e)
    }
}

/// Load a snapshot relative to `today`. A missing file is an empty snapshot.
pub fn load(source: &DataSource, today: NaiveDate) -> Result<HealthSnapshot, StoreError> {
    if !source.path().exists() {
        log::info!(
            "No data at {}, starting with an empty dashboard",
            source.path().display()
        );
        return Ok(HealthSnapshot::default());
    }
    match source {
        DataSource::Json(path) => load_json(path),
        DataSource::Sqlite(path) => load_sqlite(path, today),
    }
}

pub fn load_json(path: &Path) -> Result<HealthSnapshot, StoreError> {
    let bytes = fs::read(path)?;
    let snapshot: HealthSnapshot = serde_json::from_slice(&bytes)?;
    log::debug!(
        "Loaded snapshot: {} daily metrics, {} week days",
        snapshot.daily_metrics.len(),
        snapshot.week.len()
    );
    Ok(snapshot)
}

pub fn load_sqlite(path: &Path, today: NaiveDate) -> Result<HealthSnapshot, StoreError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    aggregate(&conn, today)
}

/// Running sums for one calendar day
#[derive(Default)]
struct DayAccumulator {
    sleep_hours: f64,
    sleep_quality: f64,
    sleep_entries: u32,
    stress: f64,
    stress_entries: u32,
    intensities: Vec<u8>,
}

impl DayAccumulator {
    #[inline]
    fn has_data(&self) -> bool {
        self.sleep_entries > 0 || self.stress_entries > 0 || !self.intensities.is_empty()
    }

    fn mean(sum: f64, n: u32) -> Option<f64> {
        (n > 0).then(|| sum / n as f64)
    }

    fn avg_sleep_hours(&self) -> Option<f64> {
        Self::mean(self.sleep_hours, self.sleep_entries)
    }

    fn avg_sleep_quality(&self) -> Option<f64> {
        Self::mean(self.sleep_quality, self.sleep_entries)
    }

    fn avg_stress(&self) -> Option<f64> {
        Self::mean(self.stress, self.stress_entries)
    }

    fn avg_pain(&self) -> Option<f64> {
        let total: u32 = self.intensities.iter().map(|&i| i as u32).sum();
        Self::mean(total as f64, self.intensities.len() as u32)
    }

    fn by_intensity(&self) -> Option<BTreeMap<u8, u32>> {
        if self.intensities.is_empty() {
            return None;
        }
        let mut map = BTreeMap::new();
        for &level in &self.intensities {
            *map.entry(level).or_insert(0) += 1;
        }
        Some(map)
    }
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool, rusqlite::Error> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    // Accept full timestamps by keeping only the date part
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), DATE_FORMAT).ok()
}

/// Aggregate the raw log into the three-day metrics and the seven-day week ending `today`
pub fn aggregate(conn: &Connection, today: NaiveDate) -> Result<HealthSnapshot, StoreError> {
    let start = today - Duration::days(WEEK_DAYS as i64 - 1);
    let from = start.format(DATE_FORMAT).to_string();
    // Upper bound includes timestamps on `today`
    let until = format!("{}~", today.format(DATE_FORMAT));

    let mut days: FxHashMap<NaiveDate, DayAccumulator> = FxHashMap::default();

    if table_exists(conn, "sleep_log")? {
        let mut stmt =
            conn.prepare("SELECT date, hours, quality FROM sleep_log WHERE date >= ?1 AND date <= ?2")?;
        let rows = stmt.query_map(params![from, until], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?;
        for row in rows {
            let (date, hours, quality) = row?;
            if let Some(day) = parse_day(&date) {
                let acc = days.entry(day).or_default();
                acc.sleep_hours += hours;
                acc.sleep_quality += quality;
                acc.sleep_entries += 1;
            }
        }
    }

    if table_exists(conn, "stress_log")? {
        let mut stmt =
            conn.prepare("SELECT date, level FROM stress_log WHERE date >= ?1 AND date <= ?2")?;
        let rows = stmt.query_map(params![from, until], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;
        for row in rows {
            let (date, level) = row?;
            if let Some(day) = parse_day(&date) {
                let acc = days.entry(day).or_default();
                acc.stress += level;
                acc.stress_entries += 1;
            }
        }
    }

    if table_exists(conn, "headache_log")? {
        let mut stmt = conn
            .prepare("SELECT date, intensity FROM headache_log WHERE date >= ?1 AND date <= ?2")?;
        let rows = stmt.query_map(params![from, until], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (date, intensity) = row?;
            if let Some(day) = parse_day(&date) {
                days.entry(day)
                    .or_default()
                    .intensities
                    .push(intensity.clamp(0, 10) as u8);
            }
        }
    }

    let empty = DayAccumulator::default();

    let daily_metrics = (0..METRIC_DAYS as i64)
        .map(|offset| {
            let date = today - Duration::days(offset);
            let acc = days.get(&date).unwrap_or(&empty);
            DailyMetric {
                day_label: date.format("%a %b %-d").to_string(),
                sleep_hours: acc.avg_sleep_hours().unwrap_or(0.0),
                sleep_quality: acc.avg_sleep_quality().unwrap_or(0.0),
                stress_level: acc.avg_stress().unwrap_or(0.0),
                headache_count: acc.intensities.len() as u32,
                avg_pain_level: acc.avg_pain().unwrap_or(0.0),
            }
        })
        .collect();

    let week = (0..WEEK_DAYS as i64)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let acc = days.get(&date).unwrap_or(&empty);
            WeekDay {
                day: date.format("%a").to_string(),
                date: Some(date),
                has_data: acc.has_data(),
                sleep_quality_percent: acc.avg_sleep_quality().map(|q| q * 10.0),
                stress_percent: acc.avg_stress().map(|s| s * 10.0),
                headaches: acc.intensities.len() as u32,
                avg_pain_level_percent: acc.avg_pain().map(|p| p * 10.0),
                headaches_by_intensity: acc.by_intensity(),
            }
        })
        .collect();

    log::debug!("Aggregated health log: {} days with entries", days.len());

    Ok(HealthSnapshot {
        daily_metrics,
        week,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 12).unwrap()
    }

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(
            "
            INSERT INTO sleep_log VALUES ('2026-03-12', 7.0, 8.0);
            INSERT INTO sleep_log VALUES ('2026-03-12', 1.0, 6.0);
            INSERT INTO sleep_log VALUES ('2026-03-11', 6.0, 5.0);
            INSERT INTO stress_log VALUES ('2026-03-12T09:30:00', 3.0);
            INSERT INTO stress_log VALUES ('2026-03-12', 5.0);
            INSERT INTO headache_log VALUES ('2026-03-10', 7);
            INSERT INTO headache_log VALUES ('2026-03-10', 7);
            INSERT INTO headache_log VALUES ('2026-03-10', 4);
            INSERT INTO headache_log VALUES ('2026-03-01', 9);
            ",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_daily_metrics_are_averaged_newest_first() {
        let snapshot = aggregate(&seeded(), today()).unwrap();
        assert_eq!(snapshot.daily_metrics.len(), 3);

        let today = &snapshot.daily_metrics[0];
        assert_eq!(today.day_label, "Thu Mar 12");
        assert_eq!(today.sleep_hours, 4.0);
        assert_eq!(today.sleep_quality, 7.0);
        assert_eq!(today.stress_level, 4.0);
        assert_eq!(today.headache_count, 0);

        let two_days_ago = &snapshot.daily_metrics[2];
        assert_eq!(two_days_ago.headache_count, 3);
        assert_eq!(two_days_ago.avg_pain_level, 6.0);
    }

    #[test]
    fn test_week_is_oldest_first_with_breakdown() {
        let snapshot = aggregate(&seeded(), today()).unwrap();
        assert_eq!(snapshot.week.len(), 7);
        assert_eq!(snapshot.week[0].date, NaiveDate::from_ymd_opt(2026, 3, 6));
        assert_eq!(snapshot.week[6].day, "Thu");

        // 2026-03-01 is outside the window
        assert_eq!(snapshot.week.iter().filter(|d| d.has_data).count(), 3);

        let headache_day = &snapshot.week[4];
        assert!(headache_day.has_data);
        assert_eq!(headache_day.headaches, 3);
        assert_eq!(headache_day.avg_pain_level_percent, Some(60.0));
        assert_eq!(headache_day.sleep_quality_percent, None);
        let breakdown = headache_day.headaches_by_intensity.as_ref().unwrap();
        assert_eq!(breakdown.get(&7), Some(&2));
        assert_eq!(breakdown.get(&4), Some(&1));

        assert_eq!(snapshot.week[6].stress_percent, Some(40.0));
        assert!(snapshot.week[6].headaches_by_intensity.is_none());
    }

    #[test]
    fn test_missing_tables_yield_empty_week() {
        let conn = Connection::open_in_memory().unwrap();
        let snapshot = aggregate(&conn, today()).unwrap();
        assert!(snapshot.week.iter().all(|d| !d.has_data));
        assert_eq!(snapshot.daily_metrics[1], DailyMetric {
            day_label: "Wed Mar 11".into(),
            ..Default::default()
        });
    }

    #[test]
    fn test_load_json_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let missing = load(&DataSource::Json(path.clone()), today()).unwrap();
        assert_eq!(missing, HealthSnapshot::default());

        fs::write(
            &path,
            r#"{"dailyMetrics":[{"dayLabel":"Today","sleepHours":8}],"week":[{"day":"Mon","hasData":true}]}"#,
        )
        .unwrap();
        let snapshot = load(&DataSource::Json(path.clone()), today()).unwrap();
        assert_eq!(snapshot.daily_metrics[0].sleep_hours, 8.0);
        assert!(snapshot.week[0].has_data);

        fs::write(&path, "{not json").unwrap();
        let err = load(&DataSource::Json(path), today()).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
        assert!(err.to_string().starts_with("malformed snapshot"));
    }

    #[test]
    fn test_load_json_with_null_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(
            &path,
            r#"{"dailyMetrics":[{"dayLabel":"Today","sleepHours":7,"sleepQuality":null},{"dayLabel":"Yesterday","headacheCount":null,"avgPainLevel":4}],"week":[{"day":"Mon","hasData":true,"headaches":null}]}"#,
        )
        .unwrap();
        let snapshot = load(&DataSource::Json(path), today()).unwrap();
        assert_eq!(snapshot.daily_metrics.len(), 2);
        assert_eq!(snapshot.daily_metrics[0].sleep_hours, 7.0);
        assert_eq!(snapshot.daily_metrics[0].sleep_quality, 0.0);
        assert_eq!(snapshot.daily_metrics[1].headache_count, 0);
        assert_eq!(snapshot.daily_metrics[1].avg_pain_level, 4.0);
        assert!(snapshot.week[0].has_data);
        assert_eq!(snapshot.week[0].headaches, 0);
    }

    #[test]
    fn test_load_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("health.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(SCHEMA).unwrap();
            conn.execute(
                "INSERT INTO sleep_log VALUES (?1, ?2, ?3)",
                params!["2026-03-12", 9.0, 8.0],
            )
            .unwrap();
        }
        let snapshot = load(&DataSource::Sqlite(path), today()).unwrap();
        assert_eq!(snapshot.daily_metrics[0].sleep_hours, 9.0);
        assert!(snapshot.week[6].has_data);
    }
}
