//! Dead-code parser. `vulture` is a reporter.
//!
//! JSON shape: an array of `{filename, line, name, kind, confidence}`.

use serde::Deserialize;

use super::{IssueParser, ParseError};
use crate::issue::{Issue, IssueType, Severity};

#[derive(Debug, Deserialize)]
struct RawDeadCodeItem {
    filename: String,
    line: u32,
    name: String,
    kind: String,
    confidence: u32,
}

pub struct DeadCodeParser;

impl IssueParser for DeadCodeParser {
    fn parser_id(&self) -> &'static str {
        "dead_code"
    }

    fn parse_json(&self, json_span: &str) -> Result<Vec<Issue>, ParseError> {
        let raw: Vec<RawDeadCodeItem> = serde_json::from_str(json_span)
            .map_err(|source| ParseError::InvalidJson { parser_id: self.parser_id(), source })?;
        let mut issues = Vec::with_capacity(raw.len());
        for item in raw {
            let severity = if item.confidence >= 80 { Severity::Medium } else { Severity::Low };
            let message = format!("unused {}: `{}` ({}% confidence)", item.kind, item.name, item.confidence);
            match Issue::new(
                "dead_code",
                IssueType::DeadCode,
                severity,
                item.filename,
                Some(item.line),
                None,
                None,
                message,
                true,
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
