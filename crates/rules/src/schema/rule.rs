//! Diagnostic rule definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::metadata::default_true;
use super::RuleCondition;

/// Grouping of diagnostic rules by the kind of cause they point at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Fault in the structure itself (outlet, valve, liner, media).
    Asset,
    /// Outside influence (groundwater, climate, catchment changes).
    Environmental,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Asset => write!(f, "Asset"),
            RuleCategory::Environmental => write!(f, "Environmental"),
        }
    }
}

/// A probable cause and the weighted evidence that supports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticRule {
    pub id: String,
    pub category: RuleCategory,
    /// Human title of the suspected issue.
    pub issue: String,
    /// Guidance for the field crew.
    pub investigation: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub conditions: Vec<RuleCondition>,
}
