//! Stormwater event detection and diagnostics pipeline.
//!
//! Pure, synchronous transformations over in-memory series: merge the input
//! streams, segment rain events, annotate metrics, extract hydrograph
//! features and score them with the rules engine.

pub mod pipeline;

pub use pipeline::features::extract_features;
pub use pipeline::merge::{merge_points, merge_series};
pub use pipeline::metrics::{annotate_events, calculate_metrics};
pub use pipeline::segment::segment_events;
pub use pipeline::stats::{linear_regression_slope, mean_finite};
pub use pipeline::trend::baseline_trend;
pub use pipeline::{
    analyze, diagnose_events, AnalysisOutput, AnalysisSummary, Diagnostics, PipelineInput,
};
