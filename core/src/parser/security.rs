//! Security-scanner parser.
//!
//! JSON shape: top-level object with
//! `results: [{filename, line_number, issue_text, issue_severity, test_id}]`.

use serde::Deserialize;

use super::{IssueParser, ParseError};
use crate::issue::{Issue, IssueType, Severity};

#[derive(Debug, Deserialize)]
struct RawFinding {
    filename: String,
    line_number: u32,
    issue_text: String,
    issue_severity: Option<String>,
    test_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawReport {
    #[serde(default)]
    results: Vec<RawFinding>,
}

pub struct SecurityParser;

fn map_severity(raw: Option<&str>) -> Severity {
    match raw.map(str::to_ascii_uppercase).as_deref() {
        Some("HIGH") => Severity::Critical,
        Some("MEDIUM") => Severity::High,
        Some("LOW") => Severity::Medium,
        _ => Severity::Medium,
    }
}

impl IssueParser for SecurityParser {
    fn parser_id(&self) -> &'static str {
        "security"
    }

    fn parse_json(&self, json_span: &str) -> Result<Vec<Issue>, ParseError> {
        // Security-scanner output is always the object shape, never a bare
        // array; the earliest-`[`-or-`{` rule is applied by the caller
        // before this is reached, so `json_span` is expected to start at
        // the object's opening brace.
        let report: RawReport = serde_json::from_str(json_span)
            .map_err(|source| ParseError::InvalidJson { parser_id: self.parser_id(), source })?;
        let mut issues = Vec::with_capacity(report.results.len());
        for item in report.results {
            let severity = map_severity(item.issue_severity.as_deref());
            match Issue::new(
                "security",
                IssueType::Security,
                severity,
                item.filename,
                Some(item.line_number),
                None,
                item.test_id,
                item.issue_text,
                false,
                Vec::new(),
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
