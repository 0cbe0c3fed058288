//! Feature lookup table.
//!
//! The single place that maps a rule's `feature` name onto a field of
//! [`HydrographFeatures`]. The evaluator and the validator both go through
//! it, so adding a feature means adding one row here.

use stormwatch_core::{BaselineTrend, HydrographFeatures};

/// Value type of a feature, used to type-check rule conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Bool,
    Number,
    Trend,
}

/// A feature value read out of [`HydrographFeatures`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Bool(bool),
    Number(f64),
    Trend(BaselineTrend),
}

/// One row of the lookup table.
pub struct FeatureDef {
    /// Name used in rule files.
    pub name: &'static str,
    /// camelCase spelling, accepted as an alias.
    pub alias: &'static str,
    pub kind: FeatureKind,
    /// Returns `None` when the feature could not be measured for the event.
    pub extract: fn(&HydrographFeatures) -> Option<FeatureValue>,
}

pub const FEATURES: &[FeatureDef] = &[
    FeatureDef {
        name: "peak_water_level",
        alias: "peakWaterLevel",
        kind: FeatureKind::Number,
        extract: |f| f.peak_water_level.map(FeatureValue::Number),
    },
    FeatureDef {
        name: "baseline_water_level",
        alias: "baselineWaterLevel",
        kind: FeatureKind::Number,
        extract: |f| f.baseline_water_level.map(FeatureValue::Number),
    },
    FeatureDef {
        name: "peak_over_baseline",
        alias: "peakOverBaseline",
        kind: FeatureKind::Number,
        extract: |f| f.has_rise().then_some(FeatureValue::Number(f.peak_over_baseline)),
    },
    FeatureDef {
        name: "total_rainfall",
        alias: "totalRainfall",
        kind: FeatureKind::Number,
        extract: |f| Some(FeatureValue::Number(f.total_rainfall)),
    },
    FeatureDef {
        name: "drawdown_duration",
        alias: "drawdownDuration",
        kind: FeatureKind::Number,
        extract: |f| f.drawdown_duration.map(FeatureValue::Number),
    },
    FeatureDef {
        name: "drawdown_rate",
        alias: "drawdownRate",
        kind: FeatureKind::Number,
        extract: |f| f.drawdown_rate.map(FeatureValue::Number),
    },
    FeatureDef {
        name: "rising_limb_rate",
        alias: "risingLimbRate",
        kind: FeatureKind::Number,
        extract: |f| f.rising_limb_rate.map(FeatureValue::Number),
    },
    FeatureDef {
        name: "drawdown_is_steep",
        alias: "drawdownIsSteep",
        kind: FeatureKind::Bool,
        extract: |f| Some(FeatureValue::Bool(f.drawdown_is_steep)),
    },
    FeatureDef {
        name: "drawdown_is_shallow",
        alias: "drawdownIsShallow",
        kind: FeatureKind::Bool,
        extract: |f| Some(FeatureValue::Bool(f.drawdown_is_shallow)),
    },
    FeatureDef {
        name: "rain_to_peak_ratio",
        alias: "rainToPeakRatio",
        kind: FeatureKind::Number,
        extract: |f| f.has_rise().then_some(FeatureValue::Number(f.rain_to_peak_ratio)),
    },
    FeatureDef {
        name: "baseline_trend",
        alias: "baselineTrend",
        kind: FeatureKind::Trend,
        extract: |f| Some(FeatureValue::Trend(f.baseline_trend)),
    },
    FeatureDef {
        name: "baseline_below_pool",
        alias: "baselineBelowPool",
        kind: FeatureKind::Bool,
        extract: |f| Some(FeatureValue::Bool(f.baseline_below_pool)),
    },
    FeatureDef {
        name: "baseline_above_pool",
        alias: "baselineAbovePool",
        kind: FeatureKind::Bool,
        extract: |f| Some(FeatureValue::Bool(f.baseline_above_pool)),
    },
];

/// Look up a feature by rule-file name or camelCase alias.
pub fn feature_def(name: &str) -> Option<&'static FeatureDef> {
    FEATURES.iter().find(|d| d.name == name || d.alias == name)
}

/// Read a named feature. `None` for unknown names and unmeasured values.
pub fn feature_value(name: &str, features: &HydrographFeatures) -> Option<FeatureValue> {
    feature_def(name).and_then(|d| (d.extract)(features))
}

/// Canonical feature names, in table order.
pub fn feature_names() -> Vec<&'static str> {
    FEATURES.iter().map(|d| d.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names = feature_names();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FEATURES.len());
    }

    #[test]
    fn alias_resolves_to_same_row() {
        let a = feature_def("drawdownIsSteep").unwrap();
        let b = feature_def("drawdown_is_steep").unwrap();
        assert_eq!(a.name, b.name);
        assert!(feature_def("drawdown_speed").is_none());
    }

    #[test]
    fn unmeasured_values_are_absent() {
        let f = HydrographFeatures::default();
        assert_eq!(feature_value("drawdown_rate", &f), None);
        assert_eq!(feature_value("peak_over_baseline", &f), None);
        assert_eq!(feature_value("rain_to_peak_ratio", &f), None);
        assert_eq!(
            feature_value("baseline_trend", &f),
            Some(FeatureValue::Trend(BaselineTrend::Stable))
        );
    }

    #[test]
    fn rise_features_present_with_peak_and_baseline() {
        let f = HydrographFeatures {
            peak_water_level: Some(10.3),
            baseline_water_level: Some(10.0),
            peak_over_baseline: 0.3,
            rain_to_peak_ratio: 0.015,
            ..HydrographFeatures::default()
        };
        assert_eq!(
            feature_value("peakOverBaseline", &f),
            Some(FeatureValue::Number(0.3))
        );
        assert_eq!(
            feature_value("rain_to_peak_ratio", &f),
            Some(FeatureValue::Number(0.015))
        );
    }
}
