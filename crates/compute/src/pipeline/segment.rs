//! Event segmentation: finds the rain-response windows in a merged series.
//!
//! Rain samples closer together than the gap tolerance form one spell. Each
//! spell is extended by the post-event observation window, overlapping
//! windows are merged, and windows with too little rain are dropped.

use tracing::debug;

use stormwatch_core::{
    hours_to_ms, window, AnalysisConfig, AnalysisPeriod, ChartablePoint, TimestampMs,
};

/// A run of rain plus its observation window, before filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    start: TimestampMs,
    rain_end: TimestampMs,
    /// Extended end, not yet clamped to the series.
    end: TimestampMs,
}

/// Segment `series` (sorted, de-duplicated) into precipitation events.
///
/// Events come out in chronological order and never overlap. A series with
/// no rain yields no events.
pub fn segment_events(series: &[ChartablePoint], config: &AnalysisConfig) -> Vec<AnalysisPeriod> {
    let Some(series_end) = series.last().map(|p| p.timestamp) else {
        return Vec::new();
    };

    let spells = rain_spells(series, hours_to_ms(config.max_precip_gap_hours));
    let post_ms = hours_to_ms(config.post_event_window_hours);
    let windows = merge_windows(spells.into_iter().map(|(start, rain_end)| Window {
        start,
        rain_end,
        end: rain_end.saturating_add(post_ms),
    }));

    let lookback_ms = hours_to_ms(config.baseline_lookback_hours);
    let mut events = Vec::with_capacity(windows.len());
    for w in windows {
        let end = w.end.min(series_end);
        let truncated = w.end > series_end;
        let total: f64 = window(series, w.start, end)
            .iter()
            .map(ChartablePoint::precipitation_or_zero)
            .sum();

        if total < config.min_event_precipitation_mm {
            debug!(start = w.start, total, "dropping trace-rain window");
            continue;
        }

        events.push(AnalysisPeriod {
            id: AnalysisPeriod::stable_id(w.start, end),
            start_date: w.start,
            end_date: end,
            rain_end: w.rain_end,
            total_precipitation: total,
            truncated,
            data_points: window(series, w.start.saturating_sub(lookback_ms), end).to_vec(),
            analysis: None,
        });
    }

    debug!(events = events.len(), "segmented series");
    events
}

/// `(first, last)` timestamps of each run of nonzero rain. Samples at most
/// `gap_ms` apart belong to the same run.
fn rain_spells(series: &[ChartablePoint], gap_ms: i64) -> Vec<(TimestampMs, TimestampMs)> {
    let mut spells: Vec<(TimestampMs, TimestampMs)> = Vec::new();
    for point in series.iter().filter(|p| p.precipitation_or_zero() > 0.0) {
        match spells.last_mut() {
            Some((_, last)) if point.timestamp - *last <= gap_ms => *last = point.timestamp,
            _ => spells.push((point.timestamp, point.timestamp)),
        }
    }
    spells
}

/// Merge chronologically ordered windows whose extended ranges overlap.
fn merge_windows(windows: impl IntoIterator<Item = Window>) -> Vec<Window> {
    let mut merged: Vec<Window> = Vec::new();
    for w in windows {
        match merged.last_mut() {
            Some(current) if w.start <= current.end => {
                current.rain_end = current.rain_end.max(w.rain_end);
                current.end = current.end.max(w.end);
            }
            _ => merged.push(w),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use stormwatch_core::MS_PER_HOUR;

    fn hourly(rain: &[f64], hours: usize) -> Vec<ChartablePoint> {
        (0..hours)
            .map(|h| ChartablePoint {
                water_level: Some(100.0),
                precipitation: Some(rain.get(h).copied().unwrap_or(0.0)),
                ..ChartablePoint::at(h as i64 * MS_PER_HOUR)
            })
            .collect()
    }

    #[test]
    fn no_rain_no_events() {
        let series = hourly(&[], 100);
        assert!(segment_events(&series, &AnalysisConfig::default()).is_empty());
        assert!(segment_events(&[], &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn single_pulse_extends_by_post_window() {
        let mut rain = vec![0.0; 10];
        rain.extend([5.0, 5.0]);
        let series = hourly(&rain, 100);
        let events = segment_events(&series, &AnalysisConfig::default());

        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.start_date, 10 * MS_PER_HOUR);
        assert_eq!(e.rain_end, 11 * MS_PER_HOUR);
        assert_eq!(e.end_date, 59 * MS_PER_HOUR);
        assert_eq!(e.total_precipitation, 10.0);
        assert!(!e.truncated);
        // Three hours of lookback plus the event itself.
        assert_eq!(e.data_points.first().unwrap().timestamp, 7 * MS_PER_HOUR);
        assert_eq!(e.data_points.len(), 53);
    }

    #[test]
    fn rain_within_gap_is_one_spell() {
        let mut rain = vec![0.0; 100];
        rain[10] = 2.0;
        rain[15] = 2.0;
        rain[40] = 2.0;
        let spells = rain_spells(&hourly(&rain, 100), 6 * MS_PER_HOUR);
        assert_eq!(
            spells,
            vec![(10 * MS_PER_HOUR, 15 * MS_PER_HOUR), (40 * MS_PER_HOUR, 40 * MS_PER_HOUR)]
        );
    }

    #[test]
    fn overlapping_windows_merge() {
        let mut rain = vec![0.0; 200];
        rain[10] = 2.0;
        rain[40] = 2.0;
        rain[150] = 2.0;
        let events = segment_events(&hourly(&rain, 200), &AnalysisConfig::default());

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].start_date, 10 * MS_PER_HOUR);
        assert_eq!(events[0].end_date, 88 * MS_PER_HOUR);
        assert_eq!(events[0].total_precipitation, 4.0);
        assert_eq!(events[1].start_date, 150 * MS_PER_HOUR);
        assert!(events[0].end_date < events[1].start_date);
    }

    #[test]
    fn trace_rain_dropped() {
        let mut rain = vec![0.0; 100];
        rain[10] = 0.2;
        assert!(segment_events(&hourly(&rain, 100), &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn end_clamped_to_series() {
        let mut rain = vec![0.0; 20];
        rain[18] = 4.0;
        let events = segment_events(&hourly(&rain, 20), &AnalysisConfig::default());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].end_date, 19 * MS_PER_HOUR);
        assert!(events[0].truncated);
    }

    #[test]
    fn ids_are_stable() {
        let mut rain = vec![0.0; 100];
        rain[10] = 4.0;
        let series = hourly(&rain, 100);
        let a = segment_events(&series, &AnalysisConfig::default());
        let b = segment_events(&series, &AnalysisConfig::default());
        assert_eq!(a[0].id, b[0].id);
        assert!(a[0].id.starts_with("evt-"));
    }
}
