use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Epoch milliseconds, the join key of every series.
pub type TimestampMs = i64;

pub const MS_PER_HOUR: i64 = 3_600_000;

/// Convert a (possibly fractional) hour count to milliseconds.
pub fn hours_to_ms(hours: f64) -> i64 {
    (hours * MS_PER_HOUR as f64).round() as i64
}

/// Convert a millisecond span to fractional hours.
pub fn ms_to_hours(ms: i64) -> f64 {
    ms as f64 / MS_PER_HOUR as f64
}

// ── Input streams ─────────────────────────────────────────────

/// One water-level sample from the continuous sensor stream, already
/// converted to elevation (meters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub timestamp: TimestampMs,
    pub water_level: f64,
    #[serde(default)]
    pub raw_water_level: Option<f64>,
}

/// One weather sample: rainfall (mm) accumulated over the sample interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub timestamp: TimestampMs,
    #[serde(default)]
    pub precipitation: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// A manually surveyed (tape-down) elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualElevation {
    pub timestamp: TimestampMs,
    pub elevation: f64,
}

// ── Unified series ────────────────────────────────────────────

/// One sample of the merged series. Every measurement is optional because
/// sources are not aligned; absence is never the same as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartablePoint {
    pub timestamp: TimestampMs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_water_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl ChartablePoint {
    pub fn at(timestamp: TimestampMs) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// Rainfall for arithmetic: absent counts as 0, non-finite too.
    pub fn precipitation_or_zero(&self) -> f64 {
        self.precipitation.filter(|p| p.is_finite()).unwrap_or(0.0)
    }

    /// Water level if present and finite.
    pub fn finite_water_level(&self) -> Option<f64> {
        self.water_level.filter(|w| w.is_finite())
    }

    /// Copy every field this point is missing from `other`. Fields already
    /// present are kept.
    pub fn union(&mut self, other: &ChartablePoint) {
        fill(&mut self.water_level, other.water_level);
        fill(&mut self.raw_water_level, other.raw_water_level);
        fill(&mut self.precipitation, other.precipitation);
        fill(&mut self.temperature, other.temperature);
        fill(&mut self.elevation, other.elevation);
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

fn fill(slot: &mut Option<f64>, value: Option<f64>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// Index range of `series` whose timestamps fall in `[start, end]`.
///
/// `series` must be sorted by timestamp.
pub fn window_bounds(
    series: &[ChartablePoint],
    start: TimestampMs,
    end: TimestampMs,
) -> (usize, usize) {
    let lo = series.partition_point(|p| p.timestamp < start);
    let hi = series.partition_point(|p| p.timestamp <= end);
    (lo, hi.max(lo))
}

/// Slice of `series` within `[start, end]` inclusive.
pub fn window(
    series: &[ChartablePoint],
    start: TimestampMs,
    end: TimestampMs,
) -> &[ChartablePoint] {
    let (lo, hi) = window_bounds(series, start, end);
    &series[lo..hi]
}
