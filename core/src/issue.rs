//! The canonical finding type and the small enums that classify it.
//!
//! `Issue` is built through [`Issue::new`] rather than as a plain struct
//! literal so that the `file_path`-required invariant cannot be bypassed by
//! a parser.

use serde::{Deserialize, Serialize};

/// The coarse category of a finding, used for advisory routing to an
/// external fixer. The coordinator never branches on this internally; it
/// exists so a fixer agent can prioritize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    Formatting,
    Complexity,
    Security,
    TypeError,
    DeadCode,
    TestFailure,
    ImportError,
    Dependency,
    Warning,
    Other,
}

impl IssueType {
    /// First-pass tool-to-type mapping: a hook's `parser_id` usually
    /// implies its issue type outright.
    pub fn from_parser_id(parser_id: &str) -> Option<Self> {
        match parser_id {
            "security" | "secrets" => Some(Self::Security),
            "type_checker" => Some(Self::TypeError),
            "dead_code" => Some(Self::DeadCode),
            "test_runner" => Some(Self::TestFailure),
            "dependency" => Some(Self::Dependency),
            "complexity" => Some(Self::Complexity),
            _ => None,
        }
    }

    /// Keyword fallback over the issue message, used when the parser_id
    /// mapping above doesn't resolve a type.
    pub fn from_message_keywords(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("security") {
            Self::Security
        } else if lower.contains("test") {
            Self::TestFailure
        } else if lower.contains("complex") {
            Self::Complexity
        } else if lower.contains("import") {
            Self::ImportError
        } else {
            Self::Formatting
        }
    }

    /// Resolve a type for a freshly-parsed issue: parser_id mapping first,
    /// message keywords second, `Formatting` as the final default.
    pub fn resolve(parser_id: &str, message: &str) -> Self {
        Self::from_parser_id(parser_id).unwrap_or_else(|| Self::from_message_keywords(message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Raised when a parser attempts to build an [`Issue`] missing a required
/// field. The parser boundary catches this and logs a warning; it never
/// escapes as a process-level error — the parser boundary drops it with a
/// logged warning instead.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("issue from tool `{tool}` has an empty file_path and was dropped")]
    MissingFilePath { tool: String },
    #[error("issue from tool `{tool}` has an empty message and was dropped")]
    EmptyMessage { tool: String },
}

/// A single finding produced by a hook's parser.
///
/// Constructed only via [`Issue::new`], which enforces the `file_path`
/// non-empty invariant at the type level: there is no way to end up
/// holding an `Issue` with an empty `file_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub tool: String,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub file_path: String,
    pub line_number: Option<u32>,
    pub column: Option<u32>,
    pub code: Option<String>,
    pub message: String,
    pub fixable: bool,
    pub details: Vec<String>,
}

impl Issue {
    /// Build an issue, validating the invariants every parser must respect.
    ///
    /// `line_number` and `column` are silently clamped to `None` if given as
    /// `Some(0)` (positions are 1-indexed); a parser that emits a 0-based
    /// position has off-by-one output elsewhere and treating 0 as "unknown"
    /// is the least surprising recovery.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tool: impl Into<String>,
        issue_type: IssueType,
        severity: Severity,
        file_path: impl Into<String>,
        line_number: Option<u32>,
        column: Option<u32>,
        code: Option<String>,
        message: impl Into<String>,
        fixable: bool,
        details: Vec<String>,
    ) -> Result<Self, IssueError> {
        let tool = tool.into();
        let file_path = file_path.into();
        let message = message.into();
        if file_path.trim().is_empty() {
            return Err(IssueError::MissingFilePath { tool });
        }
        if message.trim().is_empty() {
            return Err(IssueError::EmptyMessage { tool });
        }
        Ok(Self {
            tool,
            issue_type,
            severity,
            file_path,
            line_number: line_number.filter(|&n| n >= 1),
            column: column.filter(|&n| n >= 1),
            code,
            message,
            fixable,
            details,
        })
    }

    /// The dedup key: `(file_path, line_number, message)`, with the *full*
    /// message — truncating it would collide distinct issues.
    pub fn dedup_key(&self) -> (String, Option<u32>, String) {
        (self.file_path.clone(), self.line_number, self.message.clone())
    }
}
