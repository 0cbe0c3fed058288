//! Weighted rules engine.
//!
//! Every enabled rule is scored against one event's [`HydrographFeatures`]:
//! the weights of all matching conditions are summed (not averaged) and
//! capped at 1.0. Rules with at least one match and a confidence above the
//! engine's minimum are reported, highest confidence first. Ties keep
//! ruleset declaration order.

mod conditions;

pub use conditions::condition_met;

use stormwatch_core::config::DEFAULT_MIN_CONFIDENCE;
use stormwatch_core::HydrographFeatures;
use tracing::debug;

use crate::loader::{builtin_ruleset, Result};
use crate::schema::{DiagnosticResult, DiagnosticRule, RuleSet};

/// Raw score of one rule before filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleScore {
    pub confidence: f64,
    pub conditions_met: usize,
}

/// Score a single rule. Pure and deterministic.
pub fn score_rule(rule: &DiagnosticRule, features: &HydrographFeatures) -> RuleScore {
    let mut confidence = 0.0;
    let mut conditions_met = 0;
    for condition in &rule.conditions {
        if condition_met(condition, features) {
            confidence += condition.weight;
            conditions_met += 1;
        }
    }
    RuleScore {
        confidence: confidence.min(1.0),
        conditions_met,
    }
}

/// Evaluates a [`RuleSet`] against per-event features.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    ruleset: RuleSet,
    min_confidence: f64,
}

impl RuleEngine {
    pub fn new(ruleset: RuleSet) -> Self {
        Self {
            ruleset,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    /// Engine over the built-in stormwater ruleset.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(builtin_ruleset()?))
    }

    /// Report only results whose confidence exceeds `min_confidence`.
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn ruleset(&self) -> &RuleSet {
        &self.ruleset
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Ranked diagnostic hypotheses for one event.
    pub fn evaluate(&self, features: &HydrographFeatures) -> Vec<DiagnosticResult> {
        let mut results: Vec<DiagnosticResult> = self
            .ruleset
            .rules()
            .iter()
            .filter(|rule| rule.enabled)
            .filter_map(|rule| {
                let score = score_rule(rule, features);
                (score.conditions_met > 0 && score.confidence > self.min_confidence).then(|| {
                    DiagnosticResult {
                        rule_id: rule.id.clone(),
                        title: rule.issue.clone(),
                        category: rule.category,
                        confidence: score.confidence,
                        investigation: rule.investigation.clone(),
                        conditions_met: score.conditions_met,
                    }
                })
            })
            .collect();

        // `sort_by` is stable, so equal confidences keep declaration order.
        results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        debug!(
            rules = self.ruleset.len(),
            matched = results.len(),
            "rules evaluated"
        );
        results
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ConditionOperator, ConditionValue, RuleCategory, RuleCondition};
    use stormwatch_core::BaselineTrend;

    fn bool_cond(feature: &str, weight: f64) -> RuleCondition {
        RuleCondition {
            feature: feature.to_string(),
            operator: ConditionOperator::Eq,
            value: ConditionValue::Bool(true),
            weight,
        }
    }

    fn rule(id: &str, conditions: Vec<RuleCondition>) -> DiagnosticRule {
        DiagnosticRule {
            id: id.to_string(),
            category: RuleCategory::Asset,
            issue: format!("{id} issue"),
            investigation: format!("look at {id}"),
            enabled: true,
            conditions,
        }
    }

    fn steep_below_pool() -> HydrographFeatures {
        HydrographFeatures {
            drawdown_is_steep: true,
            baseline_below_pool: true,
            ..HydrographFeatures::default()
        }
    }

    #[test]
    fn weights_are_summed_and_capped() {
        let r = rule(
            "r",
            vec![
                bool_cond("drawdown_is_steep", 0.7),
                bool_cond("baseline_below_pool", 0.7),
            ],
        );
        let score = score_rule(&r, &steep_below_pool());
        assert_eq!(score.conditions_met, 2);
        assert_eq!(score.confidence, 1.0);
    }

    #[test]
    fn low_confidence_filtered() {
        let engine = RuleEngine::new(RuleSet::new(vec![rule(
            "weak",
            vec![bool_cond("drawdown_is_steep", 0.3)],
        )]));
        assert!(engine.evaluate(&steep_below_pool()).is_empty());
    }

    #[test]
    fn no_matches_no_result_even_with_zero_threshold() {
        let engine = RuleEngine::new(RuleSet::new(vec![rule(
            "never",
            vec![bool_cond("drawdown_is_shallow", 0.9)],
        )]))
        .with_min_confidence(0.0);
        assert!(engine.evaluate(&steep_below_pool()).is_empty());
    }

    #[test]
    fn sorted_descending_with_stable_ties() {
        let engine = RuleEngine::new(RuleSet::new(vec![
            rule("first_tie", vec![bool_cond("drawdown_is_steep", 0.5)]),
            rule(
                "strongest",
                vec![
                    bool_cond("drawdown_is_steep", 0.5),
                    bool_cond("baseline_below_pool", 0.4),
                ],
            ),
            rule("second_tie", vec![bool_cond("baseline_below_pool", 0.5)]),
        ]));
        let ids: Vec<_> = engine
            .evaluate(&steep_below_pool())
            .into_iter()
            .map(|r| r.rule_id)
            .collect();
        assert_eq!(ids, vec!["strongest", "first_tie", "second_tie"]);
    }

    #[test]
    fn disabled_rules_skipped() {
        let mut r = rule("off", vec![bool_cond("drawdown_is_steep", 0.9)]);
        r.enabled = false;
        let engine = RuleEngine::new(RuleSet::new(vec![r]));
        assert!(engine.evaluate(&steep_below_pool()).is_empty());
    }

    #[test]
    fn builtin_leak_scenario_ranks_leak_first() {
        let engine = RuleEngine::builtin().unwrap();
        let results = engine.evaluate(&steep_below_pool());
        assert_eq!(results[0].rule_id, "leak_seep");
        assert!(results[0].confidence >= 0.8 - 1e-9);
        for r in &results {
            assert!(r.confidence > 0.3 && r.confidence <= 1.0);
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let engine = RuleEngine::builtin().unwrap();
        let f = HydrographFeatures {
            baseline_trend: BaselineTrend::Rising,
            baseline_above_pool: true,
            drawdown_is_shallow: true,
            drawdown_duration: Some(40.0),
            drawdown_rate: Some(-0.001),
            ..HydrographFeatures::default()
        };
        assert_eq!(engine.evaluate(&f), engine.evaluate(&f));
    }
}
