//! CSV readers for the three input streams.
//!
//! Each file has a header row. Timestamps are epoch milliseconds or RFC 3339;
//! empty cells are absent values.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDateTime};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use stormwatch_core::{ManualElevation, SensorReading, TimestampMs, WeatherReading};

#[derive(Debug, Deserialize)]
struct SensorRow {
    timestamp: String,
    water_level: f64,
    #[serde(default)]
    raw_water_level: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WeatherRow {
    timestamp: String,
    #[serde(default)]
    precipitation: Option<f64>,
    #[serde(default)]
    temperature: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ManualRow {
    timestamp: String,
    elevation: f64,
}

/// Parse an epoch-millisecond, RFC 3339 or `YYYY-MM-DD HH:MM[:SS]` (UTC)
/// timestamp.
pub fn parse_timestamp(raw: &str) -> Result<TimestampMs> {
    let raw = raw.trim();
    if let Ok(ms) = raw.parse::<i64>() {
        return Ok(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc().timestamp_millis());
        }
    }
    bail!("unrecognized timestamp '{raw}'")
}

fn read_rows<T, R>(reader: R, label: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, record) in rdr.deserialize::<T>().enumerate() {
        // Header is line 1.
        let row = record.with_context(|| format!("{label}: bad row at line {}", i + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))
}

pub fn parse_sensor<R: Read>(reader: R) -> Result<Vec<SensorReading>> {
    read_rows::<SensorRow, _>(reader, "sensor")?
        .into_iter()
        .map(|row| {
            Ok(SensorReading {
                timestamp: parse_timestamp(&row.timestamp)?,
                water_level: row.water_level,
                raw_water_level: row.raw_water_level,
            })
        })
        .collect()
}

pub fn parse_weather<R: Read>(reader: R) -> Result<Vec<WeatherReading>> {
    read_rows::<WeatherRow, _>(reader, "weather")?
        .into_iter()
        .map(|row| {
            Ok(WeatherReading {
                timestamp: parse_timestamp(&row.timestamp)?,
                precipitation: row.precipitation,
                temperature: row.temperature,
            })
        })
        .collect()
}

pub fn parse_manual<R: Read>(reader: R) -> Result<Vec<ManualElevation>> {
    read_rows::<ManualRow, _>(reader, "manual")?
        .into_iter()
        .map(|row| {
            Ok(ManualElevation {
                timestamp: parse_timestamp(&row.timestamp)?,
                elevation: row.elevation,
            })
        })
        .collect()
}

pub fn read_sensor(path: &Path) -> Result<Vec<SensorReading>> {
    let readings = parse_sensor(open(path)?)
        .with_context(|| format!("failed to read sensor file {}", path.display()))?;
    debug!(path = %path.display(), rows = readings.len(), "read sensor readings");
    Ok(readings)
}

pub fn read_weather(path: &Path) -> Result<Vec<WeatherReading>> {
    let readings = parse_weather(open(path)?)
        .with_context(|| format!("failed to read weather file {}", path.display()))?;
    debug!(path = %path.display(), rows = readings.len(), "read weather readings");
    Ok(readings)
}

pub fn read_manual(path: &Path) -> Result<Vec<ManualElevation>> {
    let readings = parse_manual(open(path)?)
        .with_context(|| format!("failed to read manual survey file {}", path.display()))?;
    debug!(path = %path.display(), rows = readings.len(), "read manual elevations");
    Ok(readings)
}
