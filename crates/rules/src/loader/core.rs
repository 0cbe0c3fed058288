//! Ruleset parsing and the filesystem-backed [`RuleLoader`].

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::schema::{RuleSet, RuleSetDocument, API_VERSION, RULESET_KIND};
use crate::validation::validate_document;

use super::error::{LoadResult, LoadStatus, Result, RuleError};

/// The stormwater ruleset compiled into the crate.
pub const BUILTIN_RULESET_YAML: &str = include_str!("../../../../data/rules/diagnostics.yml");

/// Parse and validate a ruleset document.
pub fn parse_ruleset(yaml: &str) -> Result<RuleSet> {
    let doc: RuleSetDocument = serde_yaml::from_str(yaml)?;

    if doc.api_version != API_VERSION {
        return Err(RuleError::Unsupported(format!(
            "apiVersion '{}' (expected '{}')",
            doc.api_version, API_VERSION
        )));
    }
    if doc.kind != RULESET_KIND {
        return Err(RuleError::Unsupported(format!(
            "kind '{}' (expected '{}')",
            doc.kind, RULESET_KIND
        )));
    }

    let validation = validate_document(&doc);
    for warning in &validation.warnings {
        warn!(ruleset = %doc.metadata.id, path = %warning.path, "{}", warning.message);
    }
    if !validation.valid {
        let messages: Vec<String> = validation
            .errors
            .iter()
            .map(|e| match &e.suggestion {
                Some(s) => format!("{}: {} (did you mean '{}'?)", e.path, e.message, s),
                None => format!("{}: {}", e.path, e.message),
            })
            .collect();
        return Err(RuleError::Validation(format!(
            "ruleset '{}': {}",
            doc.metadata.id,
            messages.join("; ")
        )));
    }

    Ok(RuleSet::from_document(doc))
}

/// The built-in stormwater ruleset.
pub fn builtin_ruleset() -> Result<RuleSet> {
    parse_ruleset(BUILTIN_RULESET_YAML)
}

/// Load a single ruleset file.
pub fn load_ruleset_file(path: &Path) -> Result<RuleSet> {
    let contents = fs::read_to_string(path)?;
    parse_ruleset(&contents)
}

/// Load a ruleset from a file, or from every YAML file under a directory.
pub fn load_ruleset(path: &Path) -> Result<RuleSet> {
    if path.is_dir() {
        let (ruleset, _) = RuleLoader::new(path.to_path_buf()).load_all()?;
        Ok(ruleset)
    } else {
        load_ruleset_file(path)
    }
}

/// Directory-backed ruleset loader.
///
/// Scans a directory (recursively) for `*.yml` / `*.yaml` files and
/// concatenates their rules in path order. Parse errors are reported
/// per-file but do not abort the scan.
pub struct RuleLoader {
    /// Root directory containing ruleset YAML files.
    rules_dir: PathBuf,
}

impl RuleLoader {
    pub fn new(rules_dir: PathBuf) -> Self {
        Self { rules_dir }
    }

    /// Get the rules directory path.
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Recursively scan the rules directory and load all YAML files.
    ///
    /// Dotfiles (filenames starting with `.`) and non-YAML files are
    /// skipped. A file whose rule ids collide with an already loaded file
    /// fails as a whole.
    pub fn load_all(&self) -> Result<(RuleSet, Vec<LoadResult>)> {
        let mut files = Vec::new();
        let mut results = Vec::new();
        self.scan_dir_recursive(&self.rules_dir, &mut files, &mut results)?;
        files.sort();

        let mut ruleset = RuleSet::default();
        let mut seen_ids: HashSet<String> = HashSet::new();

        for path in files {
            let status = match load_ruleset_file(&path) {
                Ok(loaded) => {
                    let duplicate = loaded
                        .rules()
                        .iter()
                        .find(|r| seen_ids.contains(&r.id))
                        .map(|r| r.id.clone());
                    match duplicate {
                        Some(id) => {
                            warn!(
                                path = %path.display(),
                                rule_id = %id,
                                "duplicate rule id, file skipped"
                            );
                            LoadStatus::Failed {
                                error: format!("duplicate rule id '{}'", id),
                            }
                        }
                        None => {
                            let name = path
                                .file_stem()
                                .and_then(|s| s.to_str())
                                .unwrap_or_default()
                                .to_string();
                            let rules = loaded.len();
                            seen_ids.extend(loaded.rules().iter().map(|r| r.id.clone()));
                            ruleset.extend(loaded);
                            info!(path = %path.display(), rules, "loaded ruleset file");
                            LoadStatus::Loaded { name, rules }
                        }
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load ruleset file");
                    LoadStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            results.push(LoadResult { path, status });
        }

        Ok((ruleset, results))
    }

    /// Collect YAML files below `dir`, recording skipped entries.
    fn scan_dir_recursive(
        &self,
        dir: &Path,
        files: &mut Vec<PathBuf>,
        results: &mut Vec<LoadResult>,
    ) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "failed to read directory");
                return Ok(());
            }
        };

        for entry in entries {
            let entry = entry?;
            let path = entry.path();

            // Skip dotfiles/dotdirs
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, files, results)?;
                continue;
            }

            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == "yml" || e == "yaml")
                .unwrap_or(false);

            if !is_yaml {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            files.push(path);
        }

        Ok(())
    }
}
