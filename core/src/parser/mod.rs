//! The parser registry.
//!
//! A compile-time-populated `HashMap<&'static str, Box<dyn IssueParser>>`
//! built once in [`ParserRegistry::with_builtin_parsers`] — the set of
//! integrated tools is closed and known, so there's no need for runtime
//! registration.

pub mod complexity;
pub mod dead_code;
pub mod dependency;
pub mod generic;
pub mod json_extract;
pub mod security;
pub mod secrets;
pub mod skip_list;
pub mod test_runner;
pub mod type_checker;

use std::collections::HashMap;

use crate::issue::Issue;

/// Errors raised while turning raw tool output into `Issue`s. Caught at the
/// `HookExecutor` boundary and folded into `HookResult::status = Error` —
/// never escapes as a process-level error on its own.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no registered parser for parser_id `{0}`")]
    UnknownParser(String),
    #[error("failed to parse JSON output for `{parser_id}`: {source}")]
    InvalidJson {
        parser_id: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "tool `{hook_name}` reported a summary count of {claimed} but the parser extracted \
         {parsed} issue(s); `{parser_id}` is not on the count-validation skip list"
    )]
    CountMismatch { hook_name: String, parser_id: &'static str, parsed: usize, claimed: usize },
}

/// One tool family's parsing logic: a JSON path and a text fallback path.
pub trait IssueParser: Send + Sync {
    fn parser_id(&self) -> &'static str;

    /// Parse a JSON payload (already extracted via the earliest-`[`-or-`{`
    /// rule and `[*]`-normalized) into issues.
    fn parse_json(&self, json_span: &str) -> Result<Vec<Issue>, ParseError>;

    /// Parse non-JSON / fallback text output into issues. Implementations
    /// must recognize the success-indicator tokens and return an empty list
    /// for them even when the tool produced output.
    fn parse_text(&self, text: &str) -> Result<Vec<Issue>, ParseError>;

    /// Extract a tool-reported summary count ("N errors") from raw output,
    /// if this tool's format includes one. `None` means no count validation
    /// is attempted for this invocation.
    fn summary_count(&self, _raw_stdout: &str, _raw_stderr: &str) -> Option<usize> {
        None
    }
}

/// Success-indicator tokens, recognized case-insensitively.
pub const SUCCESS_TOKENS: &[&str] = &["passed", "no issues", "✓", "success"];

pub fn looks_like_success(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    SUCCESS_TOKENS.iter().any(|token| lower.contains(token))
}

/// Registry of all built-in parsers, keyed by `parser_id`.
pub struct ParserRegistry {
    parsers: HashMap<&'static str, Box<dyn IssueParser>>,
}

impl ParserRegistry {
    pub fn with_builtin_parsers() -> Self {
        let mut parsers: HashMap<&'static str, Box<dyn IssueParser>> = HashMap::new();
        let builtins: Vec<Box<dyn IssueParser>> = vec![
            Box::new(generic::GenericParser),
            Box::new(type_checker::TypeCheckerParser),
            Box::new(security::SecurityParser),
            Box::new(complexity::ComplexityParser),
            Box::new(dead_code::DeadCodeParser),
            Box::new(secrets::SecretsParser),
            Box::new(dependency::DependencyParser),
            Box::new(test_runner::TestRunnerParser),
        ];
        for parser in builtins {
            parsers.insert(parser.parser_id(), parser);
        }
        Self { parsers }
    }

    pub fn get(&self, parser_id: &str) -> Option<&dyn IssueParser> {
        self.parsers.get(parser_id).map(std::convert::AsRef::as_ref)
    }

    /// Full dispatch for one hook invocation: JSON-first when the hook was
    /// invoked with a `json_flag` and the output looks like JSON, text
    /// fallback otherwise; then the count-reconciliation assertion unless
    /// `hook_name` is on the skip list for this `parser_id`.
    pub fn parse_hook_output(
        &self,
        parser_id: &str,
        hook_name: &str,
        wants_json: bool,
        stdout: &str,
        stderr: &str,
    ) -> Result<Vec<Issue>, ParseError> {
        let parser = self.get(parser_id).ok_or_else(|| ParseError::UnknownParser(parser_id.to_string()))?;

        let combined = format!("{stdout}\n{stderr}");
        let issues = if wants_json && json_extract::looks_like_json(&combined) {
            let span = json_extract::extract_json_span(&combined).unwrap_or(&combined);
            let span = json_extract::normalize_empty_sentinel(span);
            parser.parse_json(span)?
        } else if looks_like_success(&combined) {
            Vec::new()
        } else {
            parser.parse_text(&combined)?
        };

        if let Some(claimed) = parser.summary_count(stdout, stderr) {
            if !skip_list::is_skipped(parser_id, hook_name) && claimed != issues.len() {
                return Err(ParseError::CountMismatch {
                    hook_name: hook_name.to_string(),
                    parser_id: parser.parser_id(),
                    parsed: issues.len(),
                    claimed,
                });
            }
        }

        Ok(issues)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_builtin_parsers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_one_parser_per_catalog_family() {
        let registry = ParserRegistry::with_builtin_parsers();
        for id in [
            "generic",
            "type_checker",
            "security",
            "complexity",
            "dead_code",
            "secrets",
            "dependency",
            "test_runner",
        ] {
            assert!(registry.get(id).is_some(), "missing parser for {id}");
        }
    }

    #[test]
    fn array_json_is_not_mis_dispatched_as_object() {
        let registry = ParserRegistry::with_builtin_parsers();
        let raw =
            "some preamble text\n[{\"filename\":\"x.py\",\"location\":{\"row\":1,\"column\":1},\"code\":\"W1\",\"message\":\"warn\"}]\n";
        let issues = registry.parse_hook_output("generic", "ruff-check", true, raw, "").unwrap();
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn unknown_parser_id_is_an_error() {
        let registry = ParserRegistry::with_builtin_parsers();
        let err = registry.parse_hook_output("nope", "tool", true, "[]", "").unwrap_err();
        assert!(matches!(err, ParseError::UnknownParser(_)));
    }
}
