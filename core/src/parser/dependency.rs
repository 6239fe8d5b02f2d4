//! Dependency-check parser. `pip-audit` is a reporter.
//!
//! JSON shape: an array of `{name, version, id, fix_versions, description}`
//! per vulnerable package. There is no per-line location for a dependency
//! finding, so `file_path` carries the manifest the vulnerability was
//! resolved against (conventionally `requirements.txt` or `pyproject.toml`,
//! passed in by the caller).

use serde::Deserialize;

use super::{IssueParser, ParseError};
use crate::issue::{Issue, IssueType, Severity};

#[derive(Debug, Deserialize)]
struct RawVulnerability {
    name: String,
    version: String,
    id: String,
    #[serde(default)]
    fix_versions: Vec<String>,
    description: Option<String>,
}

pub struct DependencyParser;

/// Manifest file attributed to findings that carry no file location of
/// their own. Dependency scanners report against the resolved environment,
/// not a line in source, so this is the closest stable anchor available.
const MANIFEST_FALLBACK: &str = "pyproject.toml";

impl IssueParser for DependencyParser {
    fn parser_id(&self) -> &'static str {
        "dependency"
    }

    fn parse_json(&self, json_span: &str) -> Result<Vec<Issue>, ParseError> {
        let raw: Vec<RawVulnerability> = serde_json::from_str(json_span)
            .map_err(|source| ParseError::InvalidJson { parser_id: self.parser_id(), source })?;
        let mut issues = Vec::with_capacity(raw.len());
        for item in raw {
            let message = item.description.unwrap_or_else(|| {
                format!("{} {} has known vulnerability {}", item.name, item.version, item.id)
            });
            let fixable = !item.fix_versions.is_empty();
            let details = item.fix_versions;
            match Issue::new(
                "dependency",
                IssueType::Dependency,
                Severity::High,
                MANIFEST_FALLBACK,
                None,
                None,
                Some(item.id),
                message,
                fixable,
                details,
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
