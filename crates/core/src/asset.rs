use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Design parameters of the monitored stormwater asset, supplied by the
/// caller for each analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetConfig {
    /// Target resting water elevation (meters).
    pub permanent_pool_elevation: f64,
    /// Engineered peak-to-baseline drawdown time (hours).
    pub design_drawdown_hours: f64,
}

impl AssetConfig {
    pub fn new(permanent_pool_elevation: f64, design_drawdown_hours: f64) -> Self {
        Self {
            permanent_pool_elevation,
            design_drawdown_hours,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.permanent_pool_elevation.is_finite() {
            return Err(ConfigError::InvalidAsset(format!(
                "permanent pool elevation must be finite, got {}",
                self.permanent_pool_elevation
            )));
        }
        if !self.design_drawdown_hours.is_finite() || self.design_drawdown_hours <= 0.0 {
            return Err(ConfigError::InvalidAsset(format!(
                "design drawdown must be a positive number of hours, got {}",
                self.design_drawdown_hours
            )));
        }
        Ok(())
    }
}
