//! Baseline trend: did the resting water level move across an event?

use stormwatch_core::{AnalysisConfig, AnalysisPeriod, BaselineTrend, ChartablePoint};

use super::stats::mean_finite;

/// Compare the mean of the last pre-event samples with the mean of the first
/// post-event samples.
///
/// Falls back to [`BaselineTrend::Stable`] when either side has fewer than
/// `trend_min_samples` readings.
pub fn baseline_trend(
    series: &[ChartablePoint],
    event: &AnalysisPeriod,
    config: &AnalysisConfig,
) -> BaselineTrend {
    let count = config.trend_sample_count;
    let start = series.partition_point(|p| p.timestamp < event.start_date);
    let end = series.partition_point(|p| p.timestamp <= event.end_date);

    let before: Vec<f64> = series[..start]
        .iter()
        .rev()
        .filter_map(ChartablePoint::finite_water_level)
        .take(count)
        .collect();
    let after: Vec<f64> = series[end..]
        .iter()
        .filter_map(ChartablePoint::finite_water_level)
        .take(count)
        .collect();

    let min = config.trend_min_samples;
    if before.len() < min || after.len() < min {
        return BaselineTrend::Stable;
    }

    match (mean_finite(before), mean_finite(after)) {
        (Some(pre), Some(post)) => classify(post - pre, config.trend_tolerance_m),
        _ => BaselineTrend::Stable,
    }
}

fn classify(delta: f64, tolerance: f64) -> BaselineTrend {
    if delta > tolerance {
        BaselineTrend::Rising
    } else if delta < -tolerance {
        BaselineTrend::Falling
    } else {
        BaselineTrend::Stable
    }
}
