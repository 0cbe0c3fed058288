//! Weighted feature conditions, the leaves of the rule DSL.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison applied between a feature and a condition value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    /// Equality for booleans and enum features (epsilon match for numbers).
    Eq,
    Gt,
    Lt,
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionOperator::Eq => write!(f, "eq"),
            ConditionOperator::Gt => write!(f, "gt"),
            ConditionOperator::Lt => write!(f, "lt"),
        }
    }
}

/// Literal on the right-hand side of a condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConditionValue {
    Bool(bool),
    Number(f64),
    /// Enum variant name, e.g. `falling` for `baseline_trend`.
    Text(String),
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Bool(b) => write!(f, "{b}"),
            ConditionValue::Number(n) => write!(f, "{n}"),
            ConditionValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One `{feature, operator, value, weight}` clause of a rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleCondition {
    pub feature: String,
    pub operator: ConditionOperator,
    pub value: ConditionValue,
    /// Confidence added when the condition holds.
    pub weight: f64,
}
