//! Single-condition evaluation.

use stormwatch_core::HydrographFeatures;

use crate::features::{feature_value, FeatureValue};
use crate::schema::{ConditionOperator, ConditionValue, RuleCondition};

/// Tolerance for `eq` on numeric features.
const NUMERIC_EQ_EPSILON: f64 = 1e-9;

/// Whether `condition` holds for `features`.
///
/// Unknown features, unmeasured values, type mismatches and NaN all
/// evaluate to `false`.
pub fn condition_met(condition: &RuleCondition, features: &HydrographFeatures) -> bool {
    let Some(actual) = feature_value(&condition.feature, features) else {
        return false;
    };
    compare(actual, condition.operator, &condition.value)
}

fn compare(actual: FeatureValue, operator: ConditionOperator, expected: &ConditionValue) -> bool {
    match (operator, actual, expected) {
        (ConditionOperator::Eq, FeatureValue::Bool(a), ConditionValue::Bool(b)) => a == *b,
        (ConditionOperator::Eq, FeatureValue::Trend(a), ConditionValue::Text(b)) => {
            a.as_str().eq_ignore_ascii_case(b)
        }
        (ConditionOperator::Eq, FeatureValue::Number(a), ConditionValue::Number(b)) => {
            (a - b).abs() <= NUMERIC_EQ_EPSILON
        }
        (ConditionOperator::Gt, FeatureValue::Number(a), ConditionValue::Number(b)) => a > *b,
        (ConditionOperator::Lt, FeatureValue::Number(a), ConditionValue::Number(b)) => a < *b,
        _ => false,
    }
}
