use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use stormwatch_core::{load_dotenv, AnalysisConfig};

/// Resolve analysis thresholds.
///
/// Starts from the environment (after loading `.env`). A TOML file, when
/// given, overrides the keys it names; everything else keeps its env value.
pub fn load_analysis_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    load_dotenv();
    let base = AnalysisConfig::from_env();

    let config = match path {
        Some(path) => {
            debug!(config_path = %path.display(), "Loading analysis config");
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            layer_analysis_config(&base, &content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => base,
    };

    config.validate().context("invalid analysis config")?;
    Ok(config)
}

/// Apply the keys of a TOML document on top of `base`. Unknown keys are
/// rejected.
fn layer_analysis_config(base: &AnalysisConfig, content: &str) -> Result<AnalysisConfig> {
    let overrides: toml::Table = toml::from_str(content)?;
    let mut merged = toml::Table::try_from(base)?;
    merged.extend(overrides);
    Ok(merged.try_into()?)
}
