//! Aggregating a run's [`HookResult`]s into a verdict: counting
//! passed/failed hooks and picking a process exit code from that tally.

use std::collections::HashMap;

use crate::gate::GateResult;
use crate::hook::{HookResult, HookStatus};
use crate::issue::Severity;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    HookFailures = 1,
    GateRejected = 2,
    InfrastructureError = 3,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Per-severity counts folded across every issue in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }

    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
            Severity::Critical => self.critical += 1,
        }
    }
}

/// A run's aggregate verdict: hook outcomes folded into status counts and
/// a severity breakdown of every surviving issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub hooks_run: usize,
    pub hooks_passed: usize,
    pub hooks_failed: usize,
    pub hooks_errored: usize,
    pub hooks_timed_out: usize,
    pub hooks_skipped: usize,
    pub cache_hits: usize,
    pub severity_counts: SeverityCounts,
    pub issues_by_tool: HashMap<String, usize>,
}

impl Summary {
    pub fn from_results(results: &[HookResult]) -> Self {
        let mut summary = Self { hooks_run: results.len(), ..Default::default() };
        for result in results {
            match result.status {
                HookStatus::Passed => summary.hooks_passed += 1,
                HookStatus::Failed => summary.hooks_failed += 1,
                HookStatus::Error => summary.hooks_errored += 1,
                HookStatus::Timeout => summary.hooks_timed_out += 1,
                HookStatus::Skipped => summary.hooks_skipped += 1,
            }
            if result.cache_hit {
                summary.cache_hits += 1;
            }
            for issue in &result.parsed_issues {
                summary.severity_counts.record(issue.severity);
                *summary.issues_by_tool.entry(issue.tool.clone()).or_insert(0) += 1;
            }
        }
        summary
    }

    pub fn all_clean(&self) -> bool {
        self.hooks_failed == 0 && self.hooks_errored == 0 && self.hooks_timed_out == 0
    }
}

/// The final verdict of a run, combining the hook summary with an
/// optional quality gate result.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: Summary,
    pub gate: Option<GateResult>,
}

impl Report {
    pub fn new(summary: Summary, gate: Option<GateResult>) -> Self {
        Self { summary, gate }
    }

    /// Infrastructure errors take priority over hook failures, which take
    /// priority over a failed gate, which takes priority over plain
    /// success.
    pub fn exit_code(&self) -> ExitCode {
        if self.summary.hooks_errored > 0 || self.summary.hooks_timed_out > 0 {
            return ExitCode::InfrastructureError;
        }
        if self.summary.hooks_failed > 0 {
            return ExitCode::HookFailures;
        }
        if let Some(gate) = &self.gate {
            if !gate.passed {
                return ExitCode::GateRejected;
            }
        }
        ExitCode::Success
    }
}
