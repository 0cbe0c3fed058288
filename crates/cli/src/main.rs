mod cli;
mod config;
mod input;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use stormwatch_compute::{analyze, PipelineInput};
use stormwatch_core::AssetConfig;
use stormwatch_rules::loader::{LoadStatus, RuleLoader};
use stormwatch_rules::{builtin_ruleset, load_ruleset, RuleEngine, RuleSet};

use crate::cli::{AnalyzeArgs, CliArgs, Command, RulesArgs};
use crate::config::load_analysis_config;

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match args.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Rules(args) => run_rules(args),
    }
}

fn resolve_ruleset(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(path) => load_ruleset(path)
            .with_context(|| format!("failed to load ruleset from {}", path.display())),
        None => builtin_ruleset().context("built-in ruleset is invalid"),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = load_analysis_config(args.config.as_deref())?;
    config.log_summary();

    let asset = AssetConfig::new(args.pool_elevation, args.design_drawdown_hours);
    asset.validate().context("invalid asset parameters")?;

    let ruleset = resolve_ruleset(args.rules.as_deref())?;
    info!(rules = ruleset.len(), "ruleset ready");
    let engine = RuleEngine::new(ruleset).with_min_confidence(config.min_confidence);

    let input = PipelineInput {
        sensor: input::read_sensor(&args.sensor)?,
        weather: input::read_weather(&args.weather)?,
        manual: match &args.manual {
            Some(path) => input::read_manual(path)?,
            None => Vec::new(),
        },
        asset,
    };

    let output = analyze(&input, &engine, &config);
    if let (Some(first), Some(last)) = (output.series.first(), output.series.last()) {
        info!(
            from = ?first.datetime(),
            to = ?last.datetime(),
            events = output.events.len(),
            "analyzed series"
        );
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("failed to serialize analysis output")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write output")?;
    Ok(())
}

fn run_rules(args: RulesArgs) -> Result<()> {
    let ruleset = match args.rules.as_deref() {
        Some(path) if path.is_dir() => {
            let loader = RuleLoader::new(path.to_path_buf());
            info!(dir = %loader.rules_dir().display(), "scanning rules directory");
            let (ruleset, results) = loader
                .load_all()
                .with_context(|| format!("failed to scan {}", path.display()))?;
            for result in &results {
                match &result.status {
                    LoadStatus::Loaded { name, rules } => {
                        info!(file = %result.path.display(), name = %name, rules, "loaded")
                    }
                    LoadStatus::Skipped { reason } => {
                        info!(file = %result.path.display(), reason = %reason, "skipped")
                    }
                    LoadStatus::Failed { error } => {
                        warn!(file = %result.path.display(), error = %error, "failed")
                    }
                }
            }
            ruleset
        }
        other => resolve_ruleset(other)?,
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{} rules", ruleset.len())?;
    for rule in ruleset.rules() {
        let total: f64 = rule.conditions.iter().map(|c| c.weight).sum();
        writeln!(
            stdout,
            "  {:<18} {:<14} {:>2} conditions  max {:.2}  {}{}",
            rule.id,
            rule.category.to_string(),
            rule.conditions.len(),
            total.min(1.0),
            rule.issue,
            if rule.enabled { "" } else { " (disabled)" },
        )?;
    }
    Ok(())
}
