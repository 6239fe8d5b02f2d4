//! Realistic per-tool payloads, one per parser family, checked against the
//! shapes each parser actually expects to be fed (`spec.md` §6). These are
//! not round-trip grids — each fixture is asserted against the specific
//! domain facts its tool family is supposed to surface.

use crackerjack_core::issue::{IssueType, Severity};
use crackerjack_core::parser::complexity::ComplexityParser;
use crackerjack_core::parser::dead_code::DeadCodeParser;
use crackerjack_core::parser::dependency::DependencyParser;
use crackerjack_core::parser::generic::GenericParser;
use crackerjack_core::parser::secrets::SecretsParser;
use crackerjack_core::parser::security::SecurityParser;
use crackerjack_core::parser::test_runner::TestRunnerParser;
use crackerjack_core::parser::type_checker::TypeCheckerParser;
use crackerjack_core::parser::IssueParser;

fn fixture(name: &str) -> String {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("reading fixture {path:?}: {err}"))
}

#[test]
fn generic_linter_fixture_carries_both_findings() {
    let parser = GenericParser;
    let issues = parser.parse_json(&fixture("generic_linter.json")).unwrap();
    assert_eq!(issues.len(), 2);
    assert!(issues[0].fixable, "an issue with a non-null fix payload is fixable");
    assert!(!issues[1].fixable);
    assert_eq!(issues[1].code.as_deref(), Some("E501"));
}

#[test]
fn type_checker_fixture_maps_error_and_warning_severity() {
    let parser = TypeCheckerParser;
    let issues = parser.parse_json(&fixture("type_checker.json")).unwrap();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].severity, Severity::High);
    assert_eq!(issues[1].severity, Severity::Medium);
    assert!(issues.iter().all(|i| i.issue_type == IssueType::TypeError));
}

#[test]
fn security_fixture_maps_high_and_medium_to_critical_and_high() {
    let parser = SecurityParser;
    let issues = parser.parse_json(&fixture("security.json")).unwrap();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].severity, Severity::Critical);
    assert_eq!(issues[1].severity, Severity::High);
}

#[test]
fn complexity_fixture_drops_the_function_under_threshold() {
    let parser = ComplexityParser;
    let issues = parser.parse_json(&fixture("complexity.json")).unwrap();
    // `dispatch_request` at complexity 6 is below the threshold of 10 and
    // must not appear; the other two clear it.
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().all(|i| i.message.contains("cyclomatic complexity")));
    assert_eq!(issues[1].severity, Severity::Critical);
}

#[test]
fn dead_code_fixture_splits_high_and_low_confidence() {
    let parser = DeadCodeParser;
    let issues = parser.parse_json(&fixture("dead_code.json")).unwrap();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].severity, Severity::Medium);
    assert_eq!(issues[1].severity, Severity::Low);
    assert!(issues.iter().all(|i| i.fixable));
}

#[test]
fn secrets_fixture_is_always_critical() {
    let parser = SecretsParser;
    let issues = parser.parse_json(&fixture("secrets.json")).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Critical);
    assert_eq!(issues[0].code.as_deref(), Some("aws-access-key-id"));
}

#[test]
fn dependency_fixture_distinguishes_fixable_from_unfixable() {
    let parser = DependencyParser;
    let issues = parser.parse_json(&fixture("dependency.json")).unwrap();
    assert_eq!(issues.len(), 2);
    assert!(issues[0].fixable);
    assert!(!issues[1].fixable);
    assert!(issues.iter().all(|i| i.file_path == "pyproject.toml"));
}

#[test]
fn test_runner_fixture_only_reports_the_failure() {
    let parser = TestRunnerParser;
    let issues = parser.parse_json(&fixture("test_runner.json")).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].file_path, "tests/test_auth.py");
    assert_eq!(issues[0].line_number, Some(44));
}
