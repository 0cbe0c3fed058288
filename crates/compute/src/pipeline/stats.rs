//! Small numeric helpers shared by the metric and feature stages.
//!
//! Non-finite inputs are dropped before aggregation so a single bad sample
//! cannot poison a mean or a regression.

use stormwatch_core::{ms_to_hours, ChartablePoint, TimestampMs};

/// Arithmetic mean of the finite values, or `None` when there are none.
pub fn mean_finite<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Mean water level of `points`, defined only with at least `min_samples`
/// finite readings.
pub fn mean_level(points: &[ChartablePoint], min_samples: usize) -> Option<f64> {
    let levels: Vec<f64> = points.iter().filter_map(ChartablePoint::finite_water_level).collect();
    if levels.len() < min_samples.max(1) {
        return None;
    }
    mean_finite(levels)
}

/// Ordinary least-squares slope of `(timestamp, value)` pairs in units per
/// hour.
///
/// Needs at least two finite points spread over more than one instant.
pub fn linear_regression_slope(points: &[(TimestampMs, f64)]) -> Option<f64> {
    let finite: Vec<(TimestampMs, f64)> = points
        .iter()
        .copied()
        .filter(|(_, y)| y.is_finite())
        .collect();
    if finite.len() < 2 {
        return None;
    }

    // Hours relative to the first sample keeps the sums small.
    let origin = finite[0].0;
    let n = finite.len() as f64;
    let xs: Vec<f64> = finite.iter().map(|(t, _)| ms_to_hours(t - origin)).collect();
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = finite.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (x, (_, y)) in xs.iter().zip(&finite) {
        let dx = x - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }

    if sxx <= 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    slope.is_finite().then_some(slope)
}

/// `(timestamp, level)` pairs for every finite water level in `points`.
pub fn level_pairs(points: &[ChartablePoint]) -> Vec<(TimestampMs, f64)> {
    points
        .iter()
        .filter_map(|p| p.finite_water_level().map(|w| (p.timestamp, w)))
        .collect()
}
