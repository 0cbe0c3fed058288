use thiserror::Error;

/// Errors raised while building or validating an [`AnalysisConfig`](crate::AnalysisConfig).
///
/// The analysis itself never fails; insufficient data shows up as absent
/// values instead.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("invalid asset config: {0}")]
    InvalidAsset(String),
}
