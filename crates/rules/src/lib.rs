//! Stormwater diagnostic rules: a small YAML DSL and the engine that runs it.
//!
//! This crate provides:
//! - YAML ruleset schema with serde deserialization
//! - The built-in stormwater ruleset and a filesystem loader
//! - Validation with "did you mean" suggestions for feature names
//! - A feature lookup table mapping rule feature names onto hydrograph signals
//! - The weighted, additive rules engine

pub mod evaluator;
pub mod features;
pub mod loader;
pub mod schema;
pub mod validation;

pub use evaluator::{score_rule, RuleEngine, RuleScore};
pub use loader::{builtin_ruleset, load_ruleset, parse_ruleset, RuleError};
pub use schema::{DiagnosticResult, DiagnosticRule, RuleCategory, RuleSet};
