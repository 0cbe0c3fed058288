//! Ruleset loading: the built-in ruleset, single files and rule directories.
//!
//! Every path goes through [`parse_ruleset`], which checks the document
//! header and runs validation, so the engine only ever sees well-formed
//! rules.

mod core;
mod error;

#[cfg(test)]
mod tests;

pub use self::core::{
    builtin_ruleset, load_ruleset, load_ruleset_file, parse_ruleset, RuleLoader,
    BUILTIN_RULESET_YAML,
};
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
