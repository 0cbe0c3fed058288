//! Per-event hydrological signals consumed by the diagnostic rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Direction of the resting water level across an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineTrend {
    Rising,
    Falling,
    #[default]
    Stable,
}

impl BaselineTrend {
    pub const ALL: [BaselineTrend; 3] = [
        BaselineTrend::Rising,
        BaselineTrend::Falling,
        BaselineTrend::Stable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BaselineTrend::Rising => "rising",
            BaselineTrend::Falling => "falling",
            BaselineTrend::Stable => "stable",
        }
    }
}

impl fmt::Display for BaselineTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaselineTrend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rising" => Ok(BaselineTrend::Rising),
            "falling" => Ok(BaselineTrend::Falling),
            "stable" => Ok(BaselineTrend::Stable),
            other => Err(format!("unknown baseline trend: '{}'", other)),
        }
    }
}

/// Flat signal set describing one event's hydrograph.
///
/// Rates are meters/hour, durations hours, elevations meters. `None` means
/// "could not be measured" and must never be read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrographFeatures {
    pub peak_water_level: Option<f64>,
    pub baseline_water_level: Option<f64>,
    /// `peak - baseline`, 0 when either is missing.
    pub peak_over_baseline: f64,
    pub total_rainfall: f64,
    pub drawdown_duration: Option<f64>,
    /// Negative while the level falls.
    pub drawdown_rate: Option<f64>,
    pub rising_limb_rate: Option<f64>,
    pub drawdown_is_steep: bool,
    pub drawdown_is_shallow: bool,
    /// `peak_over_baseline / total_rainfall` (m per mm), 0 without rainfall.
    pub rain_to_peak_ratio: f64,
    pub baseline_trend: BaselineTrend,
    pub baseline_below_pool: bool,
    pub baseline_above_pool: bool,
}

impl HydrographFeatures {
    /// True when both peak and baseline were measured, so the rise-derived
    /// ratios carry information.
    pub fn has_rise(&self) -> bool {
        self.peak_water_level.is_some() && self.baseline_water_level.is_some()
    }
}
