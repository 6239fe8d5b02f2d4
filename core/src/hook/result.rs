//! Per-invocation hook outcomes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::issue::Issue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookStatus {
    Passed,
    Failed,
    Skipped,
    Error,
    Timeout,
}

/// The outcome of running one [`crate::hook::HookDefinition`] once.
///
/// Built only through [`HookResultBuilder`], which is the single code path
/// allowed to set `issues_count`: it is always derived from
/// `parsed_issues.len()`, never supplied independently, so the two cannot
/// drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookResult {
    pub hook_name: String,
    pub status: HookStatus,
    pub exit_code: Option<i32>,
    pub duration: Duration,
    pub stdout: String,
    pub stderr: String,
    pub parsed_issues: Vec<Issue>,
    issues_count: usize,
    pub files_scanned: usize,
    pub cache_hit: bool,
    pub error_message: Option<String>,
}

impl HookResult {
    pub fn issues_count(&self) -> usize {
        self.issues_count
    }

    pub fn is_clean(&self) -> bool {
        matches!(self.status, HookStatus::Passed | HookStatus::Skipped) && self.parsed_issues.is_empty()
    }
}

/// Builds a [`HookResult`], applying the status-override rule (reporter
/// classification + non-empty findings ⇒ `failed`) and the
/// count-reconciliation rule in one place.
pub struct HookResultBuilder {
    hook_name: String,
    exit_code: Option<i32>,
    duration: Duration,
    stdout: String,
    stderr: String,
    files_scanned: usize,
    cache_hit: bool,
}

impl HookResultBuilder {
    pub fn new(hook_name: impl Into<String>) -> Self {
        Self {
            hook_name: hook_name.into(),
            exit_code: None,
            duration: Duration::ZERO,
            stdout: String::new(),
            stderr: String::new(),
            files_scanned: 0,
            cache_hit: false,
        }
    }

    pub fn exit_code(mut self, code: Option<i32>) -> Self {
        self.exit_code = code;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn output(mut self, stdout: String, stderr: String) -> Self {
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }

    pub fn files_scanned(mut self, count: usize) -> Self {
        self.files_scanned = count;
        self
    }

    pub fn cache_hit(mut self, hit: bool) -> Self {
        self.cache_hit = hit;
        self
    }

    /// Finish the builder given the parser's output and whether the hook is
    /// a reporter (classification from the catalog), applying both the
    /// status-override and count-reconciliation rules.
    pub fn finish_parsed(self, parsed_issues: Vec<Issue>, is_reporter: bool) -> HookResult {
        let issues_count = parsed_issues.len();
        let status = if is_reporter && !parsed_issues.is_empty() {
            HookStatus::Failed
        } else {
            match self.exit_code {
                Some(0) => HookStatus::Passed,
                Some(_) => HookStatus::Failed,
                None => HookStatus::Error,
            }
        };
        HookResult {
            hook_name: self.hook_name,
            status,
            exit_code: self.exit_code,
            duration: self.duration,
            stdout: self.stdout,
            stderr: self.stderr,
            parsed_issues,
            issues_count,
            files_scanned: self.files_scanned,
            cache_hit: self.cache_hit,
            error_message: None,
        }
    }

    pub fn finish_timeout(self) -> HookResult {
        HookResult {
            hook_name: self.hook_name,
            status: HookStatus::Timeout,
            exit_code: None,
            duration: self.duration,
            stdout: self.stdout,
            stderr: self.stderr,
            parsed_issues: Vec::new(),
            issues_count: 0,
            files_scanned: self.files_scanned,
            cache_hit: false,
            error_message: Some("hook timed out".to_string()),
        }
    }

    pub fn finish_error(self, message: impl Into<String>) -> HookResult {
        HookResult {
            hook_name: self.hook_name,
            status: HookStatus::Error,
            exit_code: self.exit_code,
            duration: self.duration,
            stdout: self.stdout,
            stderr: self.stderr,
            parsed_issues: Vec::new(),
            issues_count: 0,
            files_scanned: self.files_scanned,
            cache_hit: false,
            error_message: Some(message.into()),
        }
    }

    pub fn finish_skipped(self) -> HookResult {
        HookResult {
            hook_name: self.hook_name,
            status: HookStatus::Skipped,
            exit_code: None,
            duration: self.duration,
            stdout: String::new(),
            stderr: String::new(),
            parsed_issues: Vec::new(),
            issues_count: 0,
            files_scanned: 0,
            cache_hit: false,
            error_message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_always_matches_parsed_issues() {
        let result = HookResultBuilder::new("ruff")
            .exit_code(Some(0))
            .finish_parsed(vec![], false);
        assert_eq!(result.issues_count(), result.parsed_issues.len());
    }

    #[test]
    fn reporter_override_sets_failed_on_findings_despite_zero_exit() {
        let issue = Issue::new(
            "complexity",
            crate::issue::IssueType::Complexity,
            crate::issue::Severity::Medium,
            "a.py",
            Some(1),
            None,
            None,
            "too complex",
            false,
            vec![],
        )
        .unwrap();
        let result = HookResultBuilder::new("complexity")
            .exit_code(Some(0))
            .finish_parsed(vec![issue], true);
        assert_eq!(result.status, HookStatus::Failed);
        assert_eq!(result.issues_count(), 1);
    }

    #[test]
    fn reporter_with_no_findings_stays_passed() {
        let result = HookResultBuilder::new("complexity")
            .exit_code(Some(0))
            .finish_parsed(vec![], true);
        assert_eq!(result.status, HookStatus::Passed);
    }
}
