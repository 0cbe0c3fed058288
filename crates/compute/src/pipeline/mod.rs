//! Analysis pipeline orchestrator.
//!
//! Wires the stages together for one analysis request:
//!
//! - **Merge**: sensor, weather and manual streams into one series.
//! - **Segment**: rain-response events over the merged series.
//! - **Metrics**: baseline, peak and drawdown annotations per event.
//! - **Diagnose**: features per event, scored by the rules engine.

pub mod features;
pub mod merge;
pub mod metrics;
pub mod segment;
pub mod stats;
pub mod trend;

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stormwatch_core::{
    AnalysisConfig, AnalysisPeriod, AssetConfig, ChartablePoint, ManualElevation, SensorReading,
    WeatherReading,
};
use stormwatch_rules::{DiagnosticResult, RuleEngine};

use self::features::extract_features;
use self::merge::merge_series;
use self::metrics::annotate_events;
use self::segment::segment_events;

/// Raw inputs for one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineInput {
    pub sensor: Vec<SensorReading>,
    pub weather: Vec<WeatherReading>,
    #[serde(default)]
    pub manual: Vec<ManualElevation>,
    pub asset: AssetConfig,
}

/// Event id → ranked diagnoses.
pub type Diagnostics = BTreeMap<String, Vec<DiagnosticResult>>;

/// Everything an analysis produces, ready for display or reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutput {
    pub series: Vec<ChartablePoint>,
    pub events: Vec<AnalysisPeriod>,
    pub diagnostics: Diagnostics,
    pub summary: AnalysisSummary,
}

/// Counts describing one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub points: usize,
    pub events: usize,
    pub truncated_events: usize,
    pub disregarded_events: usize,
    pub diagnosed_events: usize,
    pub findings: usize,
}

/// Score every event that has not been disregarded.
///
/// Events are independent, so they are mapped in parallel; the ordered map
/// keeps the output identical across runs.
pub fn diagnose_events(
    events: &[AnalysisPeriod],
    series: &[ChartablePoint],
    asset: &AssetConfig,
    engine: &RuleEngine,
    config: &AnalysisConfig,
) -> Diagnostics {
    events
        .par_iter()
        .filter(|event| !event.is_disregarded())
        .map(|event| {
            let features = extract_features(event, series, asset, config);
            let results = engine.evaluate(&features);
            debug!(event = %event.id, findings = results.len(), "diagnosed event");
            (event.id.clone(), results)
        })
        .collect()
}

/// Run merge → segment → metrics → diagnose over one request.
pub fn analyze(
    input: &PipelineInput,
    engine: &RuleEngine,
    config: &AnalysisConfig,
) -> AnalysisOutput {
    let started = Instant::now();

    let series = merge_series(&input.sensor, &input.weather, &input.manual);
    let mut events = segment_events(&series, config);
    annotate_events(&mut events, &series, config);
    let diagnostics = diagnose_events(&events, &series, &input.asset, engine, config);

    let summary = AnalysisSummary {
        points: series.len(),
        events: events.len(),
        truncated_events: events.iter().filter(|e| e.truncated).count(),
        disregarded_events: events.iter().filter(|e| e.is_disregarded()).count(),
        diagnosed_events: diagnostics.len(),
        findings: diagnostics.values().map(Vec::len).sum(),
    };

    info!(
        points = summary.points,
        events = summary.events,
        truncated = summary.truncated_events,
        findings = summary.findings,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "analysis complete"
    );

    AnalysisOutput {
        series,
        events,
        diagnostics,
        summary,
    }
}
