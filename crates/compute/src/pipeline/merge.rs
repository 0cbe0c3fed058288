//! Joins the sensor, weather and manual survey streams into one series.
//!
//! The result is sorted by timestamp with one point per instant. Points that
//! share a timestamp are unioned field by field; nothing is interpolated.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use stormwatch_core::{
    ChartablePoint, ManualElevation, SensorReading, TimestampMs, WeatherReading,
};

/// Merge the three raw input streams.
///
/// Inputs need not be sorted or aligned. Empty inputs yield an empty series.
pub fn merge_series(
    sensor: &[SensorReading],
    weather: &[WeatherReading],
    manual: &[ManualElevation],
) -> Vec<ChartablePoint> {
    let sensor_points: Vec<ChartablePoint> = sensor
        .iter()
        .map(|r| ChartablePoint {
            water_level: Some(r.water_level),
            raw_water_level: r.raw_water_level,
            ..ChartablePoint::at(r.timestamp)
        })
        .collect();

    let weather_points: Vec<ChartablePoint> = weather
        .iter()
        .map(|r| ChartablePoint {
            precipitation: r.precipitation,
            temperature: r.temperature,
            ..ChartablePoint::at(r.timestamp)
        })
        .collect();

    let manual_points: Vec<ChartablePoint> = manual
        .iter()
        .map(|r| ChartablePoint {
            elevation: Some(r.elevation),
            ..ChartablePoint::at(r.timestamp)
        })
        .collect();

    let merged = merge_points(&merge_points(&sensor_points, &weather_points), &manual_points);
    debug!(
        sensor = sensor.len(),
        weather = weather.len(),
        manual = manual.len(),
        points = merged.len(),
        "merged input series"
    );
    merged
}

/// Union two point sequences into one sorted, de-duplicated series.
///
/// When both sides carry the same field at the same instant the value seen
/// first wins. Non-finite values are dropped.
pub fn merge_points(a: &[ChartablePoint], b: &[ChartablePoint]) -> Vec<ChartablePoint> {
    let mut by_time: BTreeMap<TimestampMs, ChartablePoint> = BTreeMap::new();
    let mut dropped = 0usize;

    for point in a.iter().chain(b) {
        let (clean, removed) = sanitize(point);
        dropped += removed;
        by_time
            .entry(clean.timestamp)
            .and_modify(|existing| existing.union(&clean))
            .or_insert(clean);
    }

    if dropped > 0 {
        warn!(dropped, "discarded non-finite readings while merging");
    }

    by_time.into_values().collect()
}

/// Copy of `point` with non-finite fields cleared, plus how many were cleared.
fn sanitize(point: &ChartablePoint) -> (ChartablePoint, usize) {
    let mut clean = point.clone();
    let mut removed = 0;
    for slot in [
        &mut clean.water_level,
        &mut clean.raw_water_level,
        &mut clean.precipitation,
        &mut clean.temperature,
        &mut clean.elevation,
    ] {
        if slot.is_some_and(|v| !v.is_finite()) {
            *slot = None;
            removed += 1;
        }
    }
    (clean, removed)
}
