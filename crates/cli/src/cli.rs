use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Stormwater event detection and diagnostics.
///
/// Merges sensor and weather readings, finds rain events, computes
/// drawdown metrics and ranks probable causes for each event.
#[derive(Parser, Debug)]
#[command(name = "stormwatch", about = "Stormwater event detection and diagnostics")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one asset's readings and print the result as JSON
    Analyze(AnalyzeArgs),
    /// Validate and list the active diagnostic ruleset
    Rules(RulesArgs),
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Sensor CSV: timestamp,water_level[,raw_water_level]
    #[arg(long)]
    pub sensor: PathBuf,

    /// Weather CSV: timestamp,precipitation[,temperature]
    #[arg(long)]
    pub weather: PathBuf,

    /// Manual survey CSV: timestamp,elevation
    #[arg(long)]
    pub manual: Option<PathBuf>,

    /// Permanent pool elevation of the asset (meters)
    #[arg(long)]
    pub pool_elevation: f64,

    /// Design drawdown time of the asset (hours)
    #[arg(long)]
    pub design_drawdown_hours: f64,

    /// Ruleset file or directory (default: built-in ruleset)
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// TOML file with analysis thresholds (overrides environment)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Ruleset file or directory (default: built-in ruleset)
    #[arg(long)]
    pub rules: Option<PathBuf>,
}
