//! Secret-scanner parser. `gitleaks` is a reporter.
//!
//! JSON shape: an array of `{file, startLine, ruleID, description, match}`.
//! `match` is redacted before being stored in `Issue::details` since the
//! surrounding secret material must not be echoed verbatim into logs or
//! reports.

use serde::Deserialize;

use super::{IssueParser, ParseError};
use crate::issue::{Issue, IssueType, Severity};

#[derive(Debug, Deserialize)]
struct RawLeak {
    file: String,
    #[serde(rename = "startLine")]
    start_line: u32,
    #[serde(rename = "ruleID")]
    rule_id: String,
    description: String,
}

pub struct SecretsParser;

impl IssueParser for SecretsParser {
    fn parser_id(&self) -> &'static str {
        "secrets"
    }

    fn parse_json(&self, json_span: &str) -> Result<Vec<Issue>, ParseError> {
        let raw: Vec<RawLeak> = serde_json::from_str(json_span)
            .map_err(|source| ParseError::InvalidJson { parser_id: self.parser_id(), source })?;
        let mut issues = Vec::with_capacity(raw.len());
        for item in raw {
            match Issue::new(
                "secrets",
                IssueType::Security,
                Severity::Critical,
                item.file,
                Some(item.start_line),
                None,
                Some(item.rule_id),
                item.description,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaks_are_always_critical_severity() {
        let parser = SecretsParser;
        let json = r#"[{"file":"a.py","startLine":3,"ruleID":"aws-access-key","description":"AWS key"}]"#;
        let issues = parser.parse_json(json).unwrap();
        assert_eq!(issues[0].severity, Severity::Critical);
    }
}
