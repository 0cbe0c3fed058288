//! Hydrograph feature extraction: turns one event and its surrounding
//! series into the flat signal set the rules engine reads.

use stormwatch_core::{
    window, AnalysisConfig, AnalysisPeriod, AssetConfig, ChartablePoint, EventMetrics,
    HydrographFeatures,
};

use super::metrics::calculate_metrics;
use super::stats::{level_pairs, linear_regression_slope};
use super::trend::baseline_trend;

/// Extract the features of `event`.
///
/// Reads the calculator-derived metrics stored on the event, computing them
/// on the fly when the event has not been annotated. Analyst overrides are
/// never consulted.
pub fn extract_features(
    event: &AnalysisPeriod,
    series: &[ChartablePoint],
    asset: &AssetConfig,
    config: &AnalysisConfig,
) -> HydrographFeatures {
    let computed;
    let metrics: &EventMetrics = match event.metrics() {
        Some(m) => m,
        None => {
            computed = calculate_metrics(event, series, config);
            &computed
        }
    };

    let peak_over_baseline = metrics.rise().unwrap_or(0.0);
    let total_rainfall = event.total_precipitation;
    let rain_to_peak_ratio = if total_rainfall > 0.0 {
        peak_over_baseline / total_rainfall
    } else {
        0.0
    };

    let (rising_limb_rate, drawdown_rate) = match metrics.peak_timestamp {
        Some(peak_ts) => (
            linear_regression_slope(&level_pairs(window(series, event.start_date, peak_ts))),
            linear_regression_slope(&level_pairs(window(series, peak_ts, event.end_date))),
        ),
        None => (None, None),
    };

    let drawdown_duration = metrics.time_to_baseline_hours;
    let design = asset.design_drawdown_hours;
    let drawdown_is_steep =
        drawdown_duration.is_some_and(|d| d < design * config.steep_drawdown_factor);
    let drawdown_is_shallow =
        drawdown_duration.is_some_and(|d| d > design * config.shallow_drawdown_factor);

    // Without a baseline the pool itself stands in, which sets neither flag.
    let pool = asset.permanent_pool_elevation;
    let reference = metrics.baseline_elevation.unwrap_or(pool);
    let baseline_below_pool = reference < pool - config.pool_tolerance_m;
    let baseline_above_pool = reference > pool + config.pool_tolerance_m;

    HydrographFeatures {
        peak_water_level: metrics.peak_elevation,
        baseline_water_level: metrics.baseline_elevation,
        peak_over_baseline,
        total_rainfall,
        drawdown_duration,
        drawdown_rate,
        rising_limb_rate,
        drawdown_is_steep,
        drawdown_is_shallow,
        rain_to_peak_ratio,
        baseline_trend: baseline_trend(series, event, config),
        baseline_below_pool,
        baseline_above_pool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stormwatch_core::{BaselineTrend, MS_PER_HOUR};

    use crate::pipeline::metrics::annotate_events;

    /// Hourly series: flat baseline, a linear rise to `peak` over 2 hours
    /// from hour 10, a linear fall back over `fall_hours`, then flat.
    fn hydrograph(
        base: f64,
        peak: f64,
        fall_hours: usize,
        total_hours: usize,
    ) -> Vec<ChartablePoint> {
        (0..total_hours)
            .map(|h| {
                let level = match h {
                    h if h < 10 => base,
                    h if h <= 12 => base + (peak - base) * (h - 10) as f64 / 2.0,
                    h if h <= 12 + fall_hours => {
                        peak - (peak - base) * (h - 12) as f64 / fall_hours as f64
                    }
                    _ => base,
                };
                ChartablePoint {
                    water_level: Some(level),
                    precipitation: Some(if (10..12).contains(&h) { 10.0 } else { 0.0 }),
                    ..ChartablePoint::at(h as i64 * MS_PER_HOUR)
                }
            })
            .collect()
    }

    fn annotated_event(series: &[ChartablePoint]) -> AnalysisPeriod {
        let config = AnalysisConfig::default();
        let mut events = crate::pipeline::segment::segment_events(series, &config);
        annotate_events(&mut events, series, &config);
        assert_eq!(events.len(), 1);
        events.remove(0)
    }

    #[test]
    fn normal_drawdown_is_neither_steep_nor_shallow() {
        let series = hydrograph(100.0, 100.3, 26, 120);
        let event = annotated_event(&series);
        let asset = AssetConfig::new(100.0, 24.0);
        let f = extract_features(&event, &series, &asset, &AnalysisConfig::default());

        assert_eq!(f.baseline_water_level, Some(100.0));
        assert!((f.peak_over_baseline - 0.3).abs() < 1e-9);
        assert!((f.rain_to_peak_ratio - 0.3 / 20.0).abs() < 1e-9);
        // First sample under 100.05 is 22 hours after the peak.
        assert!((f.drawdown_duration.unwrap() - 22.0).abs() < 1e-9);
        assert!(!f.drawdown_is_steep);
        assert!(!f.drawdown_is_shallow);
        assert!(f.rising_limb_rate.unwrap() > 0.0);
        assert!(f.drawdown_rate.unwrap() < 0.0);
        assert_eq!(f.baseline_trend, BaselineTrend::Stable);
        assert!(!f.baseline_below_pool && !f.baseline_above_pool);
    }

    #[test]
    fn quick_drawdown_is_steep() {
        let series = hydrograph(100.0, 100.3, 4, 120);
        let event = annotated_event(&series);
        let asset = AssetConfig::new(100.0, 24.0);
        let f = extract_features(&event, &series, &asset, &AnalysisConfig::default());
        assert!(f.drawdown_is_steep);
        assert!(!f.drawdown_is_shallow);
    }

    #[test]
    fn slow_drawdown_is_shallow() {
        let series = hydrograph(100.0, 100.3, 44, 120);
        let event = annotated_event(&series);
        let asset = AssetConfig::new(100.0, 24.0);
        let f = extract_features(&event, &series, &asset, &AnalysisConfig::default());
        assert!(f.drawdown_is_shallow);
        assert!(!f.drawdown_is_steep);
    }

    #[test]
    fn pool_flags_follow_baseline() {
        let series = hydrograph(100.0, 100.3, 24, 120);
        let event = annotated_event(&series);
        let config = AnalysisConfig::default();

        let below = extract_features(&event, &series, &AssetConfig::new(100.2, 24.0), &config);
        assert!(below.baseline_below_pool && !below.baseline_above_pool);

        let above = extract_features(&event, &series, &AssetConfig::new(99.8, 24.0), &config);
        assert!(above.baseline_above_pool && !above.baseline_below_pool);

        let within = extract_features(&event, &series, &AssetConfig::new(100.03, 24.0), &config);
        assert!(!within.baseline_above_pool && !within.baseline_below_pool);
    }

    #[test]
    fn missing_sensor_data_leaves_features_undefined() {
        let series: Vec<_> = (0..80)
            .map(|h| ChartablePoint {
                precipitation: Some(if h == 10 { 5.0 } else { 0.0 }),
                ..ChartablePoint::at(h * MS_PER_HOUR)
            })
            .collect();
        let event = annotated_event(&series);
        let asset = AssetConfig::new(100.0, 24.0);
        let f = extract_features(&event, &series, &asset, &AnalysisConfig::default());

        assert!(!f.has_rise());
        assert_eq!(f.peak_over_baseline, 0.0);
        assert_eq!(f.drawdown_rate, None);
        assert_eq!(f.drawdown_duration, None);
        assert!(!f.drawdown_is_steep && !f.drawdown_is_shallow);
        assert!(!f.baseline_below_pool && !f.baseline_above_pool);
        assert_eq!(f.baseline_trend, BaselineTrend::Stable);
    }

    #[test]
    fn unannotated_event_computes_metrics() {
        let series = hydrograph(100.0, 100.3, 24, 120);
        let config = AnalysisConfig::default();
        let event = crate::pipeline::segment::segment_events(&series, &config).remove(0);
        assert!(event.analysis.is_none());
        let f = extract_features(&event, &series, &AssetConfig::new(100.0, 24.0), &config);
        assert_eq!(f.peak_water_level, Some(100.3));
    }

    #[test]
    fn review_without_annotation_still_computes_metrics() {
        let series = hydrograph(100.0, 100.3, 4, 120);
        let config = AnalysisConfig::default();
        let asset = AssetConfig::new(100.15, 24.0);
        let plain = crate::pipeline::segment::segment_events(&series, &config).remove(0);
        let mut reviewed = plain.clone();
        reviewed.set_review(stormwatch_core::AnalystReview {
            notes: Some("looked".to_string()),
            ..Default::default()
        });

        let expected = extract_features(&plain, &series, &asset, &config);
        assert!(expected.drawdown_is_steep);
        assert_eq!(extract_features(&reviewed, &series, &asset, &config), expected);
    }
}
