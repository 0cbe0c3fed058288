//! Per-rule and per-condition checks.

use std::collections::HashSet;

use stormwatch_core::BaselineTrend;

use crate::features::{feature_def, feature_names, FeatureKind};
use crate::schema::{ConditionOperator, ConditionValue, DiagnosticRule, RuleCondition};

use super::fuzzy::{fuzzy_match, is_snake_case};
use super::ValidationResult;

/// Rule ids must be present and unique across the document.
pub(super) fn validate_ids(rules: &[DiagnosticRule], result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for (i, rule) in rules.iter().enumerate() {
        let path = format!("spec.rules[{i}].id");
        if rule.id.trim().is_empty() {
            result.error(path, "rule id must not be empty");
            continue;
        }
        if !seen.insert(rule.id.as_str()) {
            result.error(path, format!("duplicate rule id '{}'", rule.id));
            continue;
        }
        if !is_snake_case(&rule.id) {
            result.warn(path, format!("rule id '{}' is not snake_case", rule.id));
        }
    }
}

pub(super) fn validate_rule(index: usize, rule: &DiagnosticRule, result: &mut ValidationResult) {
    let base = format!("spec.rules[{index}]");

    if rule.issue.trim().is_empty() {
        result.error(format!("{base}.issue"), "issue title must not be empty");
    }
    if rule.investigation.trim().is_empty() {
        result.warn(
            format!("{base}.investigation"),
            "no investigation guidance given",
        );
    }
    if rule.conditions.is_empty() {
        result.error(format!("{base}.conditions"), "rule has no conditions");
        return;
    }

    let mut total_weight = 0.0;
    for (j, condition) in rule.conditions.iter().enumerate() {
        validate_condition(&format!("{base}.conditions[{j}]"), condition, result);
        total_weight += condition.weight;
    }

    if total_weight.is_finite() && total_weight <= 0.3 {
        result.warn(
            format!("{base}.conditions"),
            format!("weights sum to {total_weight}, rule can never be reported"),
        );
    }
}

fn validate_condition(path: &str, condition: &RuleCondition, result: &mut ValidationResult) {
    if !condition.weight.is_finite() || condition.weight <= 0.0 || condition.weight > 1.0 {
        result.error(
            format!("{path}.weight"),
            format!("weight must be in (0, 1], got {}", condition.weight),
        );
    }

    let Some(def) = feature_def(&condition.feature) else {
        let names = feature_names();
        let field = format!("{path}.feature");
        let message = format!("unknown feature '{}'", condition.feature);
        match fuzzy_match(&condition.feature, &names) {
            Some(s) => result.error_with_suggestion(field, message, s),
            None => result.error(field, message),
        }
        return;
    };

    let value_path = format!("{path}.value");
    match (def.kind, condition.operator, &condition.value) {
        (FeatureKind::Bool, ConditionOperator::Eq, ConditionValue::Bool(_)) => {}
        (FeatureKind::Bool, ConditionOperator::Eq, other) => result.error(
            value_path,
            format!("feature '{}' is boolean, got '{}'", def.name, other),
        ),
        (FeatureKind::Trend, ConditionOperator::Eq, ConditionValue::Text(s)) => {
            if s.to_lowercase().parse::<BaselineTrend>().is_err() {
                let variants: Vec<&str> = BaselineTrend::ALL.iter().map(|t| t.as_str()).collect();
                let message = format!("unknown trend '{s}'");
                match fuzzy_match(s, &variants) {
                    Some(v) => result.error_with_suggestion(value_path, message, v),
                    None => result.error(value_path, message),
                }
            }
        }
        (FeatureKind::Trend, ConditionOperator::Eq, other) => result.error(
            value_path,
            format!("feature '{}' expects rising, falling or stable, got '{}'", def.name, other),
        ),
        (FeatureKind::Number, _, ConditionValue::Number(n)) => {
            if !n.is_finite() {
                result.error(value_path, "threshold must be finite");
            }
        }
        (FeatureKind::Number, _, other) => result.error(
            value_path,
            format!("feature '{}' is numeric, got '{}'", def.name, other),
        ),
        (_, op, _) => result.error(
            format!("{path}.operator"),
            format!("operator '{}' needs a numeric feature, '{}' is not", op, def.name),
        ),
    }
}
