//! Weekly summary data and tooltip text for the weekly chart

use crate::metrics::null_as_default;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of entries in the weekly chart
pub const WEEK_DAYS: usize = 7;

/// One day of the weekly chart.
///
/// Percentages are `None` when nothing was logged for that series.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeekDay {
    #[serde(deserialize_with = "null_as_default")]
    pub day: String,
    pub date: Option<NaiveDate>,
    #[serde(deserialize_with = "null_as_default")]
    pub has_data: bool,
    pub sleep_quality_percent: Option<f64>,
    pub stress_percent: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub headaches: u32,
    pub avg_pain_level_percent: Option<f64>,
    /// Intensity level -> number of headaches at that level
    pub headaches_by_intensity: Option<BTreeMap<u8, u32>>,
}

/// Plotted series, in legend order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    SleepQuality,
    Stress,
    Headaches,
    AvgPain,
}

impl Series {
    pub const ALL: [Series; 4] = [
        Series::SleepQuality,
        Series::Stress,
        Series::Headaches,
        Series::AvgPain,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Series::SleepQuality => "Sleep Quality",
            Series::Stress => "Stress Level",
            Series::Headaches => "Headaches",
            Series::AvgPain => "Avg Pain",
        }
    }

    /// Raw value of this series on the given day
    pub fn value(self, day: &WeekDay) -> Option<f64> {
        match self {
            Series::SleepQuality => day.sleep_quality_percent,
            Series::Stress => day.stress_percent,
            Series::Headaches => Some(day.headaches as f64),
            Series::AvgPain => day.avg_pain_level_percent,
        }
    }

    fn format(self, value: f64) -> String {
        match self {
            Series::Headaches => format!("{}: {}", self.label(), value.round() as i64),
            _ => format!("{}: {}%", self.label(), value.round() as i64),
        }
    }
}

/// True when at least one day carries logged data
pub fn has_any_data(week: &[WeekDay]) -> bool {
    week.iter().any(|d| d.has_data)
}

/// Tooltip lines for a hovered day, one per series that has a value,
/// followed by the per-intensity headache breakdown.
pub fn tooltip_lines(day: &WeekDay) -> Vec<String> {
    let mut lines: Vec<String> = Series::ALL
        .iter()
        .filter_map(|s| s.value(day).map(|v| s.format(v)))
        .collect();

    if let Some(by_intensity) = &day.headaches_by_intensity {
        lines.extend(by_intensity.iter().map(|(level, count)| {
            format!(
                "  Intensity {}: {} {}",
                level,
                count,
                if *count > 1 { "headaches" } else { "headache" }
            )
        }));
    }
    lines
}
