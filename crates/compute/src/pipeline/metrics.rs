//! Per-event hydrological metrics: baseline, peak, post-event level and
//! the time taken to drain back to baseline.

use tracing::debug;

use stormwatch_core::{
    hours_to_ms, ms_to_hours, window, AnalysisConfig, AnalysisPeriod, ChartablePoint,
    EventAnalysis, EventMetrics, TimestampMs,
};

use super::stats::mean_level;

/// Shown when the level never came back within tolerance of baseline.
pub const NOT_REACHED: &str = "not reached";

/// Shown when the peak never left the baseline tolerance band.
pub const NO_SIGNIFICANT_RISE: &str = "no significant rise";

/// Derive the metrics of `event` from the merged `series`.
///
/// Every metric is read from sensor samples already in the series. A window
/// with fewer than `min_metric_samples` readings leaves its metric undefined.
pub fn calculate_metrics(
    event: &AnalysisPeriod,
    series: &[ChartablePoint],
    config: &AnalysisConfig,
) -> EventMetrics {
    let min_samples = config.min_metric_samples;

    let lookback_ms = hours_to_ms(config.baseline_lookback_hours);
    let before = window(
        series,
        event.start_date.saturating_sub(lookback_ms),
        event.start_date.saturating_sub(1),
    );
    let baseline = mean_level(before, min_samples);

    let during = window(series, event.start_date, event.end_date);
    let peak = find_peak(during, min_samples);

    let post_event = if event.truncated {
        None
    } else {
        let averaging_ms = hours_to_ms(config.post_event_averaging_hours);
        let tail = window(
            series,
            event.end_date.saturating_sub(averaging_ms).saturating_add(1),
            event.end_date,
        );
        mean_level(tail, min_samples)
    };

    let mut metrics = EventMetrics {
        baseline_elevation: baseline,
        peak_elevation: peak.map(|(_, level)| level),
        peak_timestamp: peak.map(|(ts, _)| ts),
        post_event_elevation: post_event,
        ..EventMetrics::default()
    };

    if let (Some(base), Some((peak_ts, peak_level))) = (baseline, peak) {
        let tolerance = config.baseline_return_tolerance_m;
        if peak_level - base <= tolerance {
            metrics.time_to_baseline = Some(NO_SIGNIFICANT_RISE.to_string());
        } else {
            let after_peak = window(series, peak_ts.saturating_add(1), event.end_date);
            match return_time(after_peak, base + tolerance) {
                Some(ts) => {
                    let hours = ms_to_hours(ts - peak_ts);
                    metrics.time_to_baseline = Some(format_hours(hours));
                    metrics.time_to_baseline_hours = Some(hours);
                }
                None => metrics.time_to_baseline = Some(NOT_REACHED.to_string()),
            }
        }
        metrics.drawdown_analysis = Some(describe_drawdown(&metrics, tolerance));
    }

    metrics
}

/// Compute metrics for every event, keeping any analyst review in place.
pub fn annotate_events(
    events: &mut [AnalysisPeriod],
    series: &[ChartablePoint],
    config: &AnalysisConfig,
) {
    for event in events.iter_mut() {
        let metrics = calculate_metrics(event, series, config);
        debug!(
            event = %event.id,
            baseline = ?metrics.baseline_elevation,
            peak = ?metrics.peak_elevation,
            "calculated event metrics"
        );
        event.analysis.get_or_insert_with(EventAnalysis::default).computed = Some(metrics);
    }
}

/// Highest finite level and when it was first reached.
fn find_peak(points: &[ChartablePoint], min_samples: usize) -> Option<(TimestampMs, f64)> {
    let mut count = 0usize;
    let mut best: Option<(TimestampMs, f64)> = None;
    let levels = points
        .iter()
        .filter_map(|p| p.finite_water_level().map(|w| (p.timestamp, w)));
    for (ts, level) in levels {
        count += 1;
        match best {
            Some((_, top)) if level <= top => {}
            _ => best = Some((ts, level)),
        }
    }
    if count < min_samples.max(1) {
        return None;
    }
    best
}

/// First sample at or below `threshold`.
fn return_time(points: &[ChartablePoint], threshold: f64) -> Option<TimestampMs> {
    points
        .iter()
        .find(|p| p.finite_water_level().is_some_and(|w| w <= threshold))
        .map(|p| p.timestamp)
}

/// Render fractional hours as `"14h 30m"`.
pub fn format_hours(hours: f64) -> String {
    let minutes = (hours * 60.0).round() as i64;
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn describe_drawdown(metrics: &EventMetrics, tolerance: f64) -> String {
    let rise = metrics.rise().unwrap_or(0.0);
    match (metrics.time_to_baseline_hours, metrics.time_to_baseline.as_deref()) {
        (Some(hours), _) => format!(
            "Rose {rise:.2} m and returned within {tolerance:.2} m of baseline after {}",
            format_hours(hours)
        ),
        (None, Some(NO_SIGNIFICANT_RISE)) => {
            format!("Peak stayed within {tolerance:.2} m of baseline")
        }
        _ => format!("Rose {rise:.2} m and did not return to baseline within the event window"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stormwatch_core::MS_PER_HOUR;

    fn level_series(levels: &[f64]) -> Vec<ChartablePoint> {
        levels
            .iter()
            .enumerate()
            .map(|(h, &w)| ChartablePoint {
                water_level: Some(w),
                ..ChartablePoint::at(h as i64 * MS_PER_HOUR)
            })
            .collect()
    }

    fn event(start_h: i64, end_h: i64, truncated: bool) -> AnalysisPeriod {
        AnalysisPeriod {
            id: AnalysisPeriod::stable_id(start_h, end_h),
            start_date: start_h * MS_PER_HOUR,
            end_date: end_h * MS_PER_HOUR,
            rain_end: start_h * MS_PER_HOUR,
            total_precipitation: 10.0,
            truncated,
            data_points: Vec::new(),
            analysis: None,
        }
    }

    #[test]
    fn baseline_peak_and_return() {
        // Flat at 100, rise to 100.4 at hour 5, then 0.06 m/h down.
        let mut levels = vec![100.0; 4];
        levels.extend([100.2, 100.4]);
        levels.extend((1..=10).map(|i| 100.4 - 0.06 * i as f64));
        levels.extend([100.0; 4]);
        let series = level_series(&levels);

        let m = calculate_metrics(&event(4, 19, false), &series, &AnalysisConfig::default());
        assert_eq!(m.baseline_elevation, Some(100.0));
        assert_eq!(m.peak_elevation, Some(100.4));
        assert_eq!(m.peak_timestamp, Some(5 * MS_PER_HOUR));
        // 100.04 at hour 11 is the first sample inside the band.
        assert!((m.time_to_baseline_hours.unwrap() - 6.0).abs() < 1e-9);
        assert_eq!(m.time_to_baseline.as_deref(), Some("6h 0m"));
        assert!((m.post_event_elevation.unwrap() - 100.0).abs() < 1e-9);
        assert!(m.drawdown_analysis.is_some());
    }

    #[test]
    fn never_returns() {
        let mut levels = vec![100.0; 4];
        levels.extend([100.5; 10]);
        let series = level_series(&levels);
        let m = calculate_metrics(&event(4, 13, false), &series, &AnalysisConfig::default());
        assert_eq!(m.time_to_baseline.as_deref(), Some(NOT_REACHED));
        assert_eq!(m.time_to_baseline_hours, None);
    }

    #[test]
    fn flat_event_has_no_rise() {
        let series = level_series(&[100.0; 12]);
        let m = calculate_metrics(&event(4, 11, false), &series, &AnalysisConfig::default());
        assert_eq!(m.time_to_baseline.as_deref(), Some(NO_SIGNIFICANT_RISE));
        assert_eq!(m.time_to_baseline_hours, None);
    }

    #[test]
    fn missing_lookback_leaves_baseline_undefined() {
        let series = level_series(&[100.0; 12]);
        let m = calculate_metrics(&event(0, 11, false), &series, &AnalysisConfig::default());
        assert_eq!(m.baseline_elevation, None);
        assert_eq!(m.time_to_baseline, None);
        assert!(m.peak_elevation.is_some());
    }

    #[test]
    fn truncated_event_has_no_post_event_level() {
        let series = level_series(&[100.0; 12]);
        let m = calculate_metrics(&event(4, 11, true), &series, &AnalysisConfig::default());
        assert_eq!(m.post_event_elevation, None);
    }

    #[test]
    fn annotate_keeps_review() {
        let series = level_series(&[100.0; 12]);
        let mut events = vec![event(4, 11, false)];
        events[0].set_review(stormwatch_core::AnalystReview {
            notes: Some("checked".to_string()),
            ..Default::default()
        });
        annotate_events(&mut events, &series, &AnalysisConfig::default());
        let analysis = events[0].analysis.as_ref().unwrap();
        assert!(analysis.review.is_some());
        assert_eq!(events[0].metrics().unwrap().baseline_elevation, Some(100.0));
    }

    #[test]
    fn hour_formatting() {
        assert_eq!(format_hours(14.5), "14h 30m");
        assert_eq!(format_hours(0.25), "0h 15m");
    }
}
