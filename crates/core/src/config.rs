use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_f64(profile: &str, key: &str, default: f64) -> f64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Defaults ──────────────────────────────────────────────────

/// Dry spell (hours) that closes a precipitation event.
pub const DEFAULT_MAX_PRECIP_GAP_HOURS: f64 = 6.0;
/// Observation window appended after the last wet sample to capture drawdown.
pub const DEFAULT_POST_EVENT_WINDOW_HOURS: f64 = 48.0;
/// Events with less total rainfall than this are trace noise.
pub const DEFAULT_MIN_EVENT_PRECIPITATION_MM: f64 = 1.0;
/// Window before the event start averaged into the baseline elevation.
pub const DEFAULT_BASELINE_LOOKBACK_HOURS: f64 = 3.0;
/// Window ending at the event end averaged into the post-event elevation.
pub const DEFAULT_POST_EVENT_AVERAGING_HOURS: f64 = 3.0;
/// Band around the baseline that counts as "returned to baseline".
pub const DEFAULT_BASELINE_RETURN_TOLERANCE_M: f64 = 0.05;
pub const DEFAULT_MIN_METRIC_SAMPLES: usize = 2;
pub const DEFAULT_TREND_SAMPLE_COUNT: usize = 10;
pub const DEFAULT_TREND_MIN_SAMPLES: usize = 3;
pub const DEFAULT_TREND_TOLERANCE_M: f64 = 0.05;
pub const DEFAULT_POOL_TOLERANCE_M: f64 = 0.05;
pub const DEFAULT_STEEP_DRAWDOWN_FACTOR: f64 = 0.75;
pub const DEFAULT_SHALLOW_DRAWDOWN_FACTOR: f64 = 1.25;
/// Diagnostics at or below this confidence are dropped.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.3;

// ── Analysis config ───────────────────────────────────────────

/// Tunable thresholds for event segmentation, metrics and feature extraction.
///
/// Always passed explicitly into the analysis functions; nothing here is
/// cached globally. Every field has a serde default so partial TOML files
/// override only what they name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub max_precip_gap_hours: f64,
    pub post_event_window_hours: f64,
    pub min_event_precipitation_mm: f64,
    pub baseline_lookback_hours: f64,
    pub post_event_averaging_hours: f64,
    pub baseline_return_tolerance_m: f64,
    /// Windows with fewer water-level samples than this leave the metric undefined.
    pub min_metric_samples: usize,
    /// Samples taken on each side of an event when comparing baselines.
    pub trend_sample_count: usize,
    pub trend_min_samples: usize,
    pub trend_tolerance_m: f64,
    pub pool_tolerance_m: f64,
    /// Drawdown faster than `factor * design hours` is steep.
    pub steep_drawdown_factor: f64,
    /// Drawdown slower than `factor * design hours` is shallow.
    pub shallow_drawdown_factor: f64,
    pub min_confidence: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_precip_gap_hours: DEFAULT_MAX_PRECIP_GAP_HOURS,
            post_event_window_hours: DEFAULT_POST_EVENT_WINDOW_HOURS,
            min_event_precipitation_mm: DEFAULT_MIN_EVENT_PRECIPITATION_MM,
            baseline_lookback_hours: DEFAULT_BASELINE_LOOKBACK_HOURS,
            post_event_averaging_hours: DEFAULT_POST_EVENT_AVERAGING_HOURS,
            baseline_return_tolerance_m: DEFAULT_BASELINE_RETURN_TOLERANCE_M,
            min_metric_samples: DEFAULT_MIN_METRIC_SAMPLES,
            trend_sample_count: DEFAULT_TREND_SAMPLE_COUNT,
            trend_min_samples: DEFAULT_TREND_MIN_SAMPLES,
            trend_tolerance_m: DEFAULT_TREND_TOLERANCE_M,
            pool_tolerance_m: DEFAULT_POOL_TOLERANCE_M,
            steep_drawdown_factor: DEFAULT_STEEP_DRAWDOWN_FACTOR,
            shallow_drawdown_factor: DEFAULT_SHALLOW_DRAWDOWN_FACTOR,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl AnalysisConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `STORMWATCH_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("STORMWATCH_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        let d = Self::default();
        Self {
            max_precip_gap_hours: profiled_env_f64(p, "EVENT_GAP_HOURS", d.max_precip_gap_hours),
            post_event_window_hours: profiled_env_f64(
                p,
                "POST_EVENT_WINDOW_HOURS",
                d.post_event_window_hours,
            ),
            min_event_precipitation_mm: profiled_env_f64(
                p,
                "MIN_EVENT_PRECIP_MM",
                d.min_event_precipitation_mm,
            ),
            baseline_lookback_hours: profiled_env_f64(
                p,
                "BASELINE_LOOKBACK_HOURS",
                d.baseline_lookback_hours,
            ),
            post_event_averaging_hours: profiled_env_f64(
                p,
                "POST_EVENT_AVERAGING_HOURS",
                d.post_event_averaging_hours,
            ),
            baseline_return_tolerance_m: profiled_env_f64(
                p,
                "BASELINE_RETURN_TOLERANCE_M",
                d.baseline_return_tolerance_m,
            ),
            min_metric_samples: profiled_env_usize(p, "MIN_METRIC_SAMPLES", d.min_metric_samples),
            trend_sample_count: profiled_env_usize(p, "TREND_SAMPLE_COUNT", d.trend_sample_count),
            trend_min_samples: profiled_env_usize(p, "TREND_MIN_SAMPLES", d.trend_min_samples),
            trend_tolerance_m: profiled_env_f64(p, "TREND_TOLERANCE_M", d.trend_tolerance_m),
            pool_tolerance_m: profiled_env_f64(p, "POOL_TOLERANCE_M", d.pool_tolerance_m),
            steep_drawdown_factor: profiled_env_f64(
                p,
                "STEEP_DRAWDOWN_FACTOR",
                d.steep_drawdown_factor,
            ),
            shallow_drawdown_factor: profiled_env_f64(
                p,
                "SHALLOW_DRAWDOWN_FACTOR",
                d.shallow_drawdown_factor,
            ),
            min_confidence: profiled_env_f64(p, "MIN_DIAGNOSTIC_CONFIDENCE", d.min_confidence),
        }
    }

    /// Reject configurations the analysis cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_precip_gap_hours", self.max_precip_gap_hours),
            ("post_event_window_hours", self.post_event_window_hours),
            ("baseline_lookback_hours", self.baseline_lookback_hours),
            ("post_event_averaging_hours", self.post_event_averaging_hours),
            ("baseline_return_tolerance_m", self.baseline_return_tolerance_m),
            ("trend_tolerance_m", self.trend_tolerance_m),
            ("pool_tolerance_m", self.pool_tolerance_m),
            ("steep_drawdown_factor", self.steep_drawdown_factor),
            ("shallow_drawdown_factor", self.shallow_drawdown_factor),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }

        if !self.min_event_precipitation_mm.is_finite() || self.min_event_precipitation_mm < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "min_event_precipitation_mm",
                reason: format!("must be >= 0, got {}", self.min_event_precipitation_mm),
            });
        }
        if !(0.0..1.0).contains(&self.min_confidence) {
            return Err(ConfigError::InvalidValue {
                field: "min_confidence",
                reason: format!("must be in [0, 1), got {}", self.min_confidence),
            });
        }
        if self.min_metric_samples == 0 || self.trend_min_samples == 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_metric_samples",
                reason: "sample minimums must be at least 1".to_string(),
            });
        }
        if self.trend_sample_count < self.trend_min_samples {
            return Err(ConfigError::InvalidValue {
                field: "trend_sample_count",
                reason: format!(
                    "must be >= trend_min_samples ({})",
                    self.trend_min_samples
                ),
            });
        }
        if self.steep_drawdown_factor >= self.shallow_drawdown_factor {
            return Err(ConfigError::InvalidValue {
                field: "steep_drawdown_factor",
                reason: format!(
                    "must be below shallow_drawdown_factor ({})",
                    self.shallow_drawdown_factor
                ),
            });
        }
        Ok(())
    }

    /// Print the active thresholds for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Analysis config:");
        tracing::info!(
            "  events:    gap={}h, post_window={}h, min_precip={}mm",
            self.max_precip_gap_hours,
            self.post_event_window_hours,
            self.min_event_precipitation_mm
        );
        tracing::info!(
            "  metrics:   lookback={}h, post_avg={}h, return_tol={}m, min_samples={}",
            self.baseline_lookback_hours,
            self.post_event_averaging_hours,
            self.baseline_return_tolerance_m,
            self.min_metric_samples
        );
        tracing::info!(
            "  features:  trend_n={}, trend_tol={}m, pool_tol={}m, steep<{}x, shallow>{}x",
            self.trend_sample_count,
            self.trend_tolerance_m,
            self.pool_tolerance_m,
            self.steep_drawdown_factor,
            self.shallow_drawdown_factor
        );
        tracing::info!("  rules:     min_confidence={}", self.min_confidence);
    }
}
