//! Rules-engine output.

use serde::{Deserialize, Serialize};

use super::RuleCategory;

/// A ranked diagnostic hypothesis for one event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResult {
    pub rule_id: String,
    pub title: String,
    pub category: RuleCategory,
    /// Sum of matched condition weights, capped at 1.0.
    pub confidence: f64,
    pub investigation: String,
    pub conditions_met: usize,
}
