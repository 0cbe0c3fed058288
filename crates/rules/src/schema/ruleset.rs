//! Ruleset document (YAML level) and the flattened in-memory rule list.

use serde::{Deserialize, Serialize};

use super::{CommonMetadata, DiagnosticRule};

/// The only document kind this crate reads.
pub const RULESET_KIND: &str = "DiagnosticRuleSet";
pub const API_VERSION: &str = "v1";

/// Top-level ruleset file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleSetDocument {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: RuleSetSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleSetSpec {
    /// Declaration order is the tie-break order of ranked results.
    pub rules: Vec<DiagnosticRule>,
}

/// Ordered collection of diagnostic rules ready for evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleSet {
    rules: Vec<DiagnosticRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<DiagnosticRule>) -> Self {
        Self { rules }
    }

    /// Rules of an enabled document, in declaration order.
    pub fn from_document(doc: RuleSetDocument) -> Self {
        if !doc.metadata.enabled {
            return Self::default();
        }
        Self::new(doc.spec.rules)
    }

    pub fn rules(&self) -> &[DiagnosticRule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&DiagnosticRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append another ruleset's rules after this one's.
    pub fn extend(&mut self, other: RuleSet) {
        self.rules.extend(other.rules);
    }
}
