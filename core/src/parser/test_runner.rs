//! Test-runner parser.
//!
//! JSON shape modeled on `pytest --json-report`: a top-level object with
//! `tests: [{nodeid, outcome, lineno, longrepr}]`; only non-passing outcomes
//! become issues.

use serde::Deserialize;

use super::{IssueParser, ParseError};
use crate::issue::{Issue, IssueType, Severity};

#[derive(Debug, Deserialize)]
struct RawTestCase {
    nodeid: String,
    outcome: String,
    lineno: Option<u32>,
    longrepr: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTestReport {
    #[serde(default)]
    tests: Vec<RawTestCase>,
}

pub struct TestRunnerParser;

/// Split `pytest`'s `path/to/test_file.py::test_name` node id into a
/// project-relative path and a display name.
fn split_nodeid(nodeid: &str) -> (String, String) {
    match nodeid.split_once("::") {
        Some((file, rest)) => (file.to_string(), rest.to_string()),
        None => (nodeid.to_string(), nodeid.to_string()),
    }
}

impl IssueParser for TestRunnerParser {
    fn parser_id(&self) -> &'static str {
        "test_runner"
    }

    fn parse_json(&self, json_span: &str) -> Result<Vec<Issue>, ParseError> {
        let report: RawTestReport = serde_json::from_str(json_span)
            .map_err(|source| ParseError::InvalidJson { parser_id: self.parser_id(), source })?;
        let mut issues = Vec::new();
        for test in report.tests {
            if test.outcome == "passed" || test.outcome == "skipped" {
                continue;
            }
            let (file, name) = split_nodeid(&test.nodeid);
            let message = test
                .longrepr
                .unwrap_or_else(|| format!("test `{name}` {}", test.outcome));
            match Issue::new(
                "test_runner",
                IssueType::TestFailure,
                Severity::High,
                file,
                test.lineno,
                None,
                None,
                message,
                false,
                vec![name],
            ) {
                Ok(issue) => issues.push(issue),
                Err(err) => tracing::warn!(%err, "dropping issue with invalid fields"),
            }
        }
        Ok(issues)
    }

    fn parse_text(&self, _text: &str) -> Result<Vec<Issue>, ParseError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_failing_tests_become_issues() {
        let parser = TestRunnerParser;
        let json = r#"{"tests":[
            {"nodeid":"tests/test_a.py::test_ok","outcome":"passed"},
            {"nodeid":"tests/test_a.py::test_bad","outcome":"failed","lineno":12,"longrepr":"AssertionError"}
        ]}"#;
        let issues = parser.parse_json(json).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].file_path, "tests/test_a.py");
        assert_eq!(issues[0].line_number, Some(12));
    }
}
