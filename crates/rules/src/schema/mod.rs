//! YAML DSL schema types with serde deserialization.
//!
//! - `RuleSetDocument`: a ruleset file (apiVersion, kind, metadata, spec)
//! - `DiagnosticRule`: a probable cause with weighted `RuleCondition`s
//! - `DiagnosticResult`: what the engine reports for a matching rule

mod condition;
mod metadata;
mod result;
mod rule;
mod ruleset;

pub use condition::*;
pub use metadata::*;
pub use result::*;
pub use rule::*;
pub use ruleset::*;
