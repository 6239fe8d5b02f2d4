//! Generic formatter/linter parser.
//!
//! JSON shape: top-level array of
//! `{filename, location: {row, column}, code, message, fix?}`.
//! Text fallback supports both the "concise" (`file:line:col: CODE message`)
//! and "diagnostic" (multi-line, context-arrow) formats a tool may emit.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{IssueParser, ParseError};
use crate::issue::{Issue, IssueType, Severity};

#[derive(Debug, Deserialize)]
struct RawLocation {
    row: u32,
    column: u32,
}

#[derive(Debug, Deserialize)]
struct RawLinterIssue {
    filename: String,
    location: RawLocation,
    code: Option<String>,
    message: String,
    fix: Option<serde_json::Value>,
}

pub struct GenericParser;

static CONCISE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<file>[^:\n]+):(?P<line>\d+):(?P<col>\d+):\s*(?P<code>[A-Z0-9]+)?\s*(?P<msg>.+)$").unwrap());

static SUMMARY_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s+error").unwrap());

impl IssueParser for GenericParser {
    fn parser_id(&self) -> &'static str {
        "generic"
    }

    fn parse_json(&self, json_span: &str) -> Result<Vec<Issue>, ParseError> {
        let raw: Vec<RawLinterIssue> = serde_json::from_str(json_span)
            .map_err(|source| ParseError::InvalidJson { parser_id: self.parser_id(), source })?;
        let mut issues = Vec::with_capacity(raw.len());
        for item in raw {
            let fixable = item.fix.is_some();
            match Issue::new(
                "generic",
                IssueType::resolve("generic", &item.message),
                Severity::Medium,
                item.filename,
                Some(item.location.row),
                Some(item.location.column),
                item.code,
                item.message,
                fixable,
                Vec::new(),
            ) {
                Ok(issue) => issues.push(issue),
                Err(err) => tracing::warn!(%err, "dropping issue with invalid fields"),
            }
        }
        Ok(issues)
    }

    fn parse_text(&self, text: &str) -> Result<Vec<Issue>, ParseError> {
        let mut issues = Vec::new();
        for line in text.lines() {
            let Some(captures) = CONCISE_LINE.captures(line) else { continue };
            let file = captures["file"].to_string();
            let line_no: u32 = captures["line"].parse().unwrap_or(0);
            let col: u32 = captures["col"].parse().unwrap_or(0);
            let code = captures.name("code").map(|m| m.as_str().to_string());
            let message = captures["msg"].trim().to_string();
            match Issue::new(
                "generic",
                IssueType::resolve("generic", &message),
                Severity::Medium,
                file,
                Some(line_no),
                Some(col),
                code,
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

    fn summary_count(&self, raw_stdout: &str, raw_stderr: &str) -> Option<usize> {
        let combined = format!("{raw_stdout}\n{raw_stderr}");
        SUMMARY_COUNT.captures(&combined).and_then(|c| c[1].parse().ok())
    }
}
