use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::series::{ChartablePoint, TimestampMs};

/// Review state of an event's annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Metrics come straight from the calculator.
    #[default]
    Calculated,
    /// An analyst has looked at the event.
    Reviewed,
    /// An analyst has marked the event for follow-up.
    Flagged,
}

/// Metrics derived from sensor data by the metric calculator.
///
/// Every value is optional: a window without enough samples leaves the
/// metric undefined rather than guessing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetrics {
    pub baseline_elevation: Option<f64>,
    pub peak_elevation: Option<f64>,
    pub peak_timestamp: Option<TimestampMs>,
    pub post_event_elevation: Option<f64>,
    /// Human-readable peak-to-baseline time, or "not reached".
    pub time_to_baseline: Option<String>,
    /// Peak-to-baseline time in hours; `None` when the level never returned.
    pub time_to_baseline_hours: Option<f64>,
    pub drawdown_analysis: Option<String>,
}

impl EventMetrics {
    /// `peak - baseline`, when both are known.
    pub fn rise(&self) -> Option<f64> {
        Some(self.peak_elevation? - self.baseline_elevation?)
    }
}

/// Analyst annotations layered over the calculated metrics. Overrides are
/// for display and reporting only; diagnostics never read them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystReview {
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub analyst_initials: Option<String>,
    /// Excluded from reporting and diagnostics.
    #[serde(default)]
    pub disregarded: bool,
    #[serde(default)]
    pub baseline_elevation: Option<f64>,
    #[serde(default)]
    pub peak_elevation: Option<f64>,
    #[serde(default)]
    pub post_event_elevation: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAnalysis {
    /// Set by the metric calculator; `None` until the event is annotated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed: Option<EventMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<AnalystReview>,
}

impl EventAnalysis {
    pub fn status(&self) -> EventStatus {
        self.review.as_ref().map(|r| r.status).unwrap_or_default()
    }

    pub fn effective_baseline(&self) -> Option<f64> {
        self.review
            .as_ref()
            .and_then(|r| r.baseline_elevation)
            .or(self.computed.as_ref().and_then(|m| m.baseline_elevation))
    }

    pub fn effective_peak(&self) -> Option<f64> {
        self.review
            .as_ref()
            .and_then(|r| r.peak_elevation)
            .or(self.computed.as_ref().and_then(|m| m.peak_elevation))
    }
}

/// A detected precipitation-response window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPeriod {
    pub id: String,
    pub start_date: TimestampMs,
    /// Includes the post-event observation window.
    pub end_date: TimestampMs,
    /// Timestamp of the last sample with nonzero rainfall.
    pub rain_end: TimestampMs,
    pub total_precipitation: f64,
    /// Post-event window was cut short by the end of the series.
    pub truncated: bool,
    /// Samples in `[start - baseline lookback, end]`.
    pub data_points: Vec<ChartablePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<EventAnalysis>,
}

impl AnalysisPeriod {
    /// Deterministic id derived from the event bounds.
    pub fn stable_id(start: TimestampMs, end: TimestampMs) -> String {
        let name = format!("{start}:{end}");
        format!("evt-{}", Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }

    pub fn is_disregarded(&self) -> bool {
        self.analysis
            .as_ref()
            .and_then(|a| a.review.as_ref())
            .map(|r| r.disregarded)
            .unwrap_or(false)
    }

    /// Calculator metrics, if the event has been annotated.
    pub fn metrics(&self) -> Option<&EventMetrics> {
        self.analysis.as_ref().and_then(|a| a.computed.as_ref())
    }

    /// Attach or replace the analyst review, keeping calculated metrics.
    pub fn set_review(&mut self, review: AnalystReview) {
        self.analysis.get_or_insert_with(EventAnalysis::default).review = Some(review);
    }
}
