//! Type-checker parser.
//!
//! JSON shape: top-level array of
//! `{file, line, column, message, severity, code}`.

use serde::Deserialize;

use super::{IssueParser, ParseError};
use crate::issue::{Issue, IssueType, Severity};

#[derive(Debug, Deserialize)]
struct RawTypeDiagnostic {
    file: String,
    line: u32,
    column: u32,
    message: String,
    severity: Option<String>,
    code: Option<String>,
}

pub struct TypeCheckerParser;

fn map_severity(raw: Option<&str>) -> Severity {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("error") => Severity::High,
        Some("warning") => Severity::Medium,
        Some("information" | "info" | "hint") => Severity::Low,
        _ => Severity::Medium,
    }
}

impl IssueParser for TypeCheckerParser {
    fn parser_id(&self) -> &'static str {
        "type_checker"
    }

    fn parse_json(&self, json_span: &str) -> Result<Vec<Issue>, ParseError> {
        let raw: Vec<RawTypeDiagnostic> = serde_json::from_str(json_span)
            .map_err(|source| ParseError::InvalidJson { parser_id: self.parser_id(), source })?;
        let mut issues = Vec::with_capacity(raw.len());
        for item in raw {
            let severity = map_severity(item.severity.as_deref());
            match Issue::new(
                "type_checker",
                IssueType::TypeError,
                severity,
                item.file,
                Some(item.line),
                Some(item.column),
                item.code,
                item.message,
                false,
                Vec::new(),
            ) {
                Ok(issue) => issues.push(issue),
                Err(err) => tracing::warn!(%err, "dropping issue with invalid fields"),
            }
        }
        Ok(issues)
    }

    fn parse_text(&self, text: &str) -> Result<Vec<Issue>, ParseError> {
        // pyright's text fallback is a per-file summary line, not a
        // per-diagnostic one; there is nothing structured to recover here.
        if super::looks_like_success(text) {
            return Ok(Vec::new());
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_type_checker_json() {
        let parser = TypeCheckerParser;
        let json = r#"[{"file":"a.py","line":4,"column":2,"message":"incompatible types","severity":"error","code":"reportArgumentType"}]"#;
        let issues = parser.parse_json(json).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].issue_type, IssueType::TypeError);
    }
}
