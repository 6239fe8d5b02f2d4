//! Complexity-analyzer parser. `complexipy` is a reporter — exits 0 even
//! on findings.
//!
//! JSON shape: an array of per-function complexity records.

use serde::Deserialize;

use super::{IssueParser, ParseError};
use crate::issue::{Issue, IssueType, Severity};

const COMPLEXITY_THRESHOLD: u32 = 10;

#[derive(Debug, Deserialize)]
struct RawComplexityRecord {
    file: String,
    function: String,
    line: u32,
    complexity: u32,
}

pub struct ComplexityParser;

fn severity_for(complexity: u32) -> Severity {
    match complexity {
        c if c >= COMPLEXITY_THRESHOLD * 3 => Severity::Critical,
        c if c >= COMPLEXITY_THRESHOLD * 2 => Severity::High,
        c if c >= COMPLEXITY_THRESHOLD => Severity::Medium,
        _ => Severity::Low,
    }
}

impl IssueParser for ComplexityParser {
    fn parser_id(&self) -> &'static str {
        "complexity"
    }

    fn parse_json(&self, json_span: &str) -> Result<Vec<Issue>, ParseError> {
        let raw: Vec<RawComplexityRecord> = serde_json::from_str(json_span)
            .map_err(|source| ParseError::InvalidJson { parser_id: self.parser_id(), source })?;
        let mut issues = Vec::new();
        for item in raw {
            if item.complexity < COMPLEXITY_THRESHOLD {
                continue;
            }
            let message = format!(
                "function `{}` has cyclomatic complexity {} (threshold {COMPLEXITY_THRESHOLD})",
                item.function, item.complexity
            );
            match Issue::new(
                "complexity",
                IssueType::Complexity,
                severity_for(item.complexity),
                item.file,
                Some(item.line),
                None,
                None,
                message,
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
