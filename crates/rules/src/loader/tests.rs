//! Tests for the ruleset loader module.

use std::fs;

use tempfile::TempDir;

use super::*;

const LEAK_YAML: &str = r#"
apiVersion: v1
kind: DiagnosticRuleSet
metadata:
  id: leaks
  name: Leak Rules
spec:
  rules:
    - id: leak_seep
      category: Asset
      issue: Possible leak
      investigation: Walk the embankment.
      conditions:
        - feature: baseline_below_pool
          operator: eq
          value: true
          weight: 0.4
"#;

const GROUNDWATER_YAML: &str = r#"
apiVersion: v1
kind: DiagnosticRuleSet
metadata:
  id: groundwater
  name: Groundwater Rules
spec:
  rules:
    - id: high_groundwater
      category: Environmental
      issue: High groundwater
      investigation: Check wells.
      conditions:
        - feature: baseline_trend
          operator: eq
          value: rising
          weight: 0.5
"#;

#[test]
fn builtin_ruleset_loads() {
    let ruleset = builtin_ruleset().unwrap();
    assert!(!ruleset.is_empty());
    assert!(ruleset.get("leak_seep").is_some());
}

#[test]
fn parse_rejects_wrong_kind() {
    let yaml = LEAK_YAML.replace("DiagnosticRuleSet", "AnomalyRule");
    assert!(matches!(parse_ruleset(&yaml), Err(RuleError::Unsupported(_))));
}

#[test]
fn parse_rejects_wrong_api_version() {
    let yaml = LEAK_YAML.replace("apiVersion: v1", "apiVersion: v2");
    assert!(matches!(parse_ruleset(&yaml), Err(RuleError::Unsupported(_))));
}

#[test]
fn parse_reports_unknown_feature_with_suggestion() {
    let yaml = LEAK_YAML.replace("baseline_below_pool", "baseline_below_pol");
    match parse_ruleset(&yaml) {
        Err(RuleError::Validation(msg)) => {
            assert!(msg.contains("baseline_below_pol"));
            assert!(msg.contains("did you mean 'baseline_below_pool'"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn parse_rejects_malformed_yaml() {
    assert!(matches!(
        parse_ruleset("apiVersion: [unclosed"),
        Err(RuleError::Parse(_))
    ));
}

#[test]
fn load_file_and_missing_file() {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("leaks.yml");
    fs::write(&path, LEAK_YAML).unwrap();

    let ruleset = load_ruleset(&path).unwrap();
    assert_eq!(ruleset.len(), 1);

    let missing = dir.path().join("nope.yml");
    assert!(matches!(load_ruleset(&missing), Err(RuleError::Io(_))));
}

#[test]
fn load_all_skips_dotfiles_and_non_yaml() {
    let dir = TempDir::new().expect("create tempdir");
    fs::write(dir.path().join("leaks.yml"), LEAK_YAML).unwrap();
    fs::write(dir.path().join(".hidden.yml"), GROUNDWATER_YAML).unwrap();
    fs::write(dir.path().join("readme.txt"), "not a rule").unwrap();

    let (ruleset, results) = RuleLoader::new(dir.path().to_path_buf()).load_all().unwrap();
    assert_eq!(ruleset.len(), 1);

    let skipped = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Skipped { .. }))
        .count();
    assert_eq!(skipped, 2);
}

#[test]
fn load_all_recurses_in_path_order() {
    let dir = TempDir::new().expect("create tempdir");
    let nested = dir.path().join("environmental");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join("a-leaks.yml"), LEAK_YAML).unwrap();
    fs::write(nested.join("groundwater.yaml"), GROUNDWATER_YAML).unwrap();

    let ruleset = load_ruleset(dir.path()).unwrap();
    let ids: Vec<_> = ruleset.rules().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["leak_seep", "high_groundwater"]);
}

#[test]
fn load_all_isolates_bad_and_duplicate_files() {
    let dir = TempDir::new().expect("create tempdir");
    fs::write(dir.path().join("a.yml"), LEAK_YAML).unwrap();
    fs::write(dir.path().join("b.yml"), LEAK_YAML).unwrap();
    fs::write(dir.path().join("c.yml"), "kind: [").unwrap();
    fs::write(dir.path().join("d.yml"), GROUNDWATER_YAML).unwrap();

    let (ruleset, results) = RuleLoader::new(dir.path().to_path_buf()).load_all().unwrap();
    assert_eq!(ruleset.len(), 2);

    let failed: Vec<_> = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Failed { .. }))
        .map(|r| r.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(failed, vec!["b.yml", "c.yml"]);
}
