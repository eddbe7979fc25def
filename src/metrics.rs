//! Daily metrics: the three-day window, its navigation and derived gauge percentages

use serde::{Deserialize, Deserializer, Serialize};

/// Number of days available in the metrics selector (today and the two before it)
pub const METRIC_DAYS: usize = 3;

/// Minimum horizontal travel for a drag to count as a swipe
pub const DEFAULT_SWIPE_THRESHOLD: i32 = 50;

/// Hours of sleep that map to a full sleep-hours gauge
pub const SLEEP_HOURS_TARGET: f64 = 8.0;

/// Raw metrics for one day, as supplied by the data source.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyMetric {
    #[serde(deserialize_with = "null_as_default")]
    pub day_label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sleep_hours: f64,
    /// 0-10
    #[serde(deserialize_with = "null_as_default")]
    pub sleep_quality: f64,
    /// 0-10
    #[serde(deserialize_with = "null_as_default")]
    pub stress_level: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub headache_count: u32,
    /// 0-10
    #[serde(deserialize_with = "null_as_default")]
    pub avg_pain_level: f64,
}

/// Read an explicit `null` the same way as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Index of the selected day: 0 is today, 2 is two days ago.
///
/// Every constructor clamps, so a value outside `0..=2` cannot exist.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetricDay(u8);

impl MetricDay {
    pub const TODAY: Self = Self(0);
    pub const LAST: Self = Self((METRIC_DAYS - 1) as u8);

    /// Build from any integer, clamped into range
    #[inline]
    pub fn clamped(index: i64) -> Self {
        Self(index.clamp(0, Self::LAST.0 as i64) as u8)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// One step towards today, never below 0
    #[inline]
    pub fn prev(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// One step back in time, never beyond the last day
    #[inline]
    pub fn next(self) -> Self {
        Self((self.0 + 1).min(Self::LAST.0))
    }

    #[inline]
    pub fn has_prev(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn has_next(self) -> bool {
        self.0 < Self::LAST.0
    }

    /// Relative name shown above the day label
    pub fn relative_name(self) -> &'static str {
        match self.0 {
            0 => "Today",
            1 => "Yesterday",
            _ => "2 days ago",
        }
    }
}

/// Direction resolved from a completed swipe gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger travelled left: move to the next (older) day
    Next,
    /// Finger travelled right: move to the previous (newer) day
    Prev,
}

impl Swipe {
    #[inline]
    pub fn apply(self, day: MetricDay) -> MetricDay {
        match self {
            Swipe::Next => day.next(),
            Swipe::Prev => day.prev(),
        }
    }
}

/// Tracks a single press-drag-release gesture.
///
/// The start position is taken by `end`, so nothing carries over between gestures.
#[derive(Debug, Clone, Copy)]
pub struct SwipeTracker {
    threshold: i32,
    start_x: Option<i32>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: i32) -> Self {
        Self {
            threshold: threshold.max(0),
            start_x: None,
        }
    }

    #[inline]
    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    pub fn start(&mut self, x: i32) {
        self.start_x = Some(x);
    }

    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.start_x.is_some()
    }

    pub fn cancel(&mut self) {
        self.start_x = None;
    }

    /// Finish the gesture. Travel of `threshold` or less in either direction is ignored.
    pub fn end(&mut self, x: i32) -> Option<Swipe> {
        let start = self.start_x.take()?;
        let distance = start - x;
        if distance > self.threshold {
            Some(Swipe::Next)
        } else if distance < -self.threshold {
            Some(Swipe::Prev)
        } else {
            None
        }
    }
}

/// Gauge percentages derived from one day's raw metrics
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DayPercentages {
    pub sleep_quality: f64,
    /// Not capped: more than eight hours reads above 100
    pub sleep_hours: f64,
    pub stress: f64,
}

impl DayPercentages {
    pub fn from_metric(metric: &DailyMetric) -> Self {
        Self {
            sleep_quality: metric.sleep_quality * 10.0,
            sleep_hours: (metric.sleep_hours / SLEEP_HOURS_TARGET) * 100.0,
            stress: metric.stress_level * 10.0,
        }
    }
}

/// Metric for the selected day, or a zero record when the source has none
pub fn metric_for(metrics: &[DailyMetric], day: MetricDay) -> DailyMetric {
    metrics.get(day.index()).cloned().unwrap_or_default()
}

/// Severity band used to colour pain levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PainBand {
    Low,
    Moderate,
    High,
}

impl PainBand {
    pub fn of(level: f64) -> Self {
        if level <= 3.0 {
            PainBand::Low
        } else if level <= 6.0 {
            PainBand::Moderate
        } else {
            PainBand::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(sleep_hours: f64) -> DailyMetric {
        DailyMetric {
            day_label: "Mon".into(),
            sleep_hours,
            sleep_quality: 7.0,
            stress_level: 4.0,
            headache_count: 1,
            avg_pain_level: 5.5,
        }
    }

    #[test]
    fn test_navigation_stays_in_range() {
        let mut d = MetricDay::TODAY;
        for _ in 0..10 {
            d = d.next();
            assert!(d.index() <= 2);
        }
        assert_eq!(d, MetricDay::LAST);
        for _ in 0..10 {
            d = d.prev();
        }
        assert_eq!(d, MetricDay::TODAY);
        assert_eq!(MetricDay::clamped(-4), MetricDay::TODAY);
        assert_eq!(MetricDay::clamped(9).index(), 2);
    }

    #[test]
    fn test_swipe_left_advances_and_stops_at_last_day() {
        let mut tracker = SwipeTracker::default();
        tracker.start(100);
        let swipe = tracker.end(40).unwrap();
        assert_eq!(swipe, Swipe::Next);
        assert_eq!(swipe.apply(MetricDay::TODAY).index(), 1);

        tracker.start(100);
        let swipe = tracker.end(40).unwrap();
        assert_eq!(swipe.apply(MetricDay::LAST), MetricDay::LAST);
    }

    #[test]
    fn test_swipe_right_goes_back() {
        let mut tracker = SwipeTracker::default();
        tracker.start(10);
        assert_eq!(tracker.end(80), Some(Swipe::Prev));
        assert_eq!(Swipe::Prev.apply(MetricDay::TODAY), MetricDay::TODAY);
    }

    #[test]
    fn test_short_swipe_is_ignored() {
        let mut tracker = SwipeTracker::default();
        tracker.start(100);
        assert_eq!(tracker.end(70), None);
        tracker.start(100);
        assert_eq!(tracker.end(150), None);
        // exactly the threshold either way is still too short
        tracker.start(100);
        assert_eq!(tracker.end(50), None);
        tracker.start(100);
        assert_eq!(tracker.end(49), Some(Swipe::Next));
        tracker.start(100);
        assert_eq!(tracker.end(151), Some(Swipe::Prev));
    }

    #[test]
    fn test_end_without_start_is_noop() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.end(0), None);
        tracker.start(200);
        assert!(tracker.end(100).is_some());
        // start was consumed by the previous gesture
        assert_eq!(tracker.end(0), None);
    }

    #[test]
    fn test_sleep_hours_percentage_is_uncapped() {
        assert_eq!(DayPercentages::from_metric(&day(8.0)).sleep_hours, 100.0);
        assert_eq!(DayPercentages::from_metric(&day(4.0)).sleep_hours, 50.0);
        assert_eq!(DayPercentages::from_metric(&day(10.0)).sleep_hours, 125.0);
    }

    #[test]
    fn test_scaled_percentages() {
        let p = DayPercentages::from_metric(&day(8.0));
        assert_eq!(p.sleep_quality, 70.0);
        assert_eq!(p.stress, 40.0);
    }

    #[test]
    fn test_missing_day_defaults_to_zero_record() {
        let metrics = vec![day(6.0)];
        assert_eq!(metric_for(&metrics, MetricDay::TODAY).sleep_hours, 6.0);
        let missing = metric_for(&metrics, MetricDay::LAST);
        assert_eq!(missing, DailyMetric::default());
        assert_eq!(DayPercentages::from_metric(&missing), DayPercentages::default());
    }

    #[test]
    fn test_deserialize_camel_case_with_missing_fields() {
        let m: DailyMetric =
            serde_json::from_str(r#"{"dayLabel":"Tue","sleepHours":7.5,"headacheCount":2}"#)
                .unwrap();
        assert_eq!(m.day_label, "Tue");
        assert_eq!(m.sleep_hours, 7.5);
        assert_eq!(m.headache_count, 2);
        assert_eq!(m.stress_level, 0.0);
    }

    #[test]
    fn test_pain_bands() {
        assert_eq!(PainBand::of(0.0), PainBand::Low);
        assert_eq!(PainBand::of(4.5), PainBand::Moderate);
        assert_eq!(PainBand::of(8.0), PainBand::High);
    }
}
