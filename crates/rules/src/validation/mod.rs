//! Ruleset validation with structured errors and suggestions.
//!
//! Checks rule ids, condition weights, feature names (with "did you mean"
//! suggestions) and operator/value types against the feature table.
//! Returns a [`ValidationResult`] with errors (block loading) and warnings
//! (advisory).

mod rule_checks;

pub mod fuzzy;

use serde::{Deserialize, Serialize};

use crate::schema::{DiagnosticRule, RuleSetDocument};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"spec.rules[2].conditions[0].feature"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a list of rules as they would appear in one document.
pub fn validate_rules(rules: &[DiagnosticRule]) -> ValidationResult {
    let mut result = ValidationResult::new();
    rule_checks::validate_ids(rules, &mut result);
    for (i, rule) in rules.iter().enumerate() {
        rule_checks::validate_rule(i, rule, &mut result);
    }
    result
}

/// Validate a parsed ruleset document.
pub fn validate_document(doc: &RuleSetDocument) -> ValidationResult {
    let mut result = validate_rules(&doc.spec.rules);
    if doc.metadata.id.trim().is_empty() {
        result.error("metadata.id", "ruleset id must not be empty");
    }
    if doc.spec.rules.is_empty() {
        result.warn("spec.rules", "ruleset contains no rules");
    }
    result
}

/// Parse raw YAML and validate. Parse errors are reported as a single error.
pub fn validate_yaml(yaml: &str) -> ValidationResult {
    match serde_yaml::from_str::<RuleSetDocument>(yaml) {
        Ok(doc) => validate_document(&doc),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("YAML parse error: {e}"));
            result
        }
    }
}
