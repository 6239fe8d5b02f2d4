//! The compiled-in catalog of integrated tools.
//!
//! Closed-world: new tools require extending this module, not a config
//! file, since the set of integrated tools is closed and known.

use super::{Classification, HookDefinition, OutputFormatHint};

const fn fast_hook(
    name: &'static str,
    program: &'static str,
    args: &'static [&'static str],
    extensions: &'static [&'static str],
    parser_id: &'static str,
    classification: Classification,
    requires_lock: bool,
) -> HookDefinition {
    HookDefinition {
        name,
        program,
        args,
        accepts_file_paths: true,
        file_extensions: extensions,
        timeout_seconds: 30,
        classification,
        parser_id,
        json_flag: None,
        requires_lock,
        output_format_hint: OutputFormatHint::Text,
    }
}

/// Cheap hooks run on every iteration.
pub const FAST_STRATEGY: &[HookDefinition] = &[
    fast_hook(
        "ruff-format",
        "ruff",
        &["format"],
        &["py", "pyi"],
        "generic",
        Classification::Formatter,
        true,
    ),
    fast_hook(
        "ruff-check",
        "ruff",
        &["check", "--output-format=json"],
        &["py", "pyi"],
        "generic",
        Classification::Analyzer,
        false,
    ),
    fast_hook(
        "prettier-markdown",
        "prettier",
        &["--write"],
        &["md"],
        "generic",
        Classification::Formatter,
        true,
    ),
    fast_hook(
        "check-json",
        "check-json",
        &[],
        &["json"],
        "generic",
        Classification::Validator,
        false,
    ),
    fast_hook(
        "check-yaml",
        "check-yaml",
        &[],
        &["yml", "yaml"],
        "generic",
        Classification::Validator,
        false,
    ),
    fast_hook(
        "check-toml",
        "check-toml",
        &[],
        &["toml"],
        "generic",
        Classification::Validator,
        false,
    ),
    fast_hook(
        "trailing-whitespace",
        "trailing-whitespace-fixer",
        &[],
        &[],
        "generic",
        Classification::Formatter,
        true,
    ),
    fast_hook(
        "end-of-file-fixer",
        "end-of-file-fixer",
        &[],
        &[],
        "generic",
        Classification::Formatter,
        true,
    ),
    fast_hook(
        "codespell",
        "codespell",
        &[],
        &[],
        "generic",
        Classification::Analyzer,
        false,
    ),
    fast_hook(
        "check-added-large-files",
        "check-added-large-files",
        &["--maxkb=1000"],
        &[],
        "generic",
        Classification::Validator,
        false,
    ),
    fast_hook(
        "check-ast",
        "check-ast",
        &[],
        &["py"],
        "generic",
        Classification::Validator,
        false,
    ),
];

/// The heavier analyzers, run less often.
/// Per-hook timeout 180s (lowered from a legacy 600s for scanners, per spec).
pub const COMPREHENSIVE_STRATEGY: &[HookDefinition] = &[
    HookDefinition {
        name: "pyright",
        program: "pyright",
        args: &["--outputjson"],
        accepts_file_paths: true,
        file_extensions: &["py", "pyi"],
        timeout_seconds: 180,
        classification: Classification::Analyzer,
        parser_id: "type_checker",
        json_flag: Some("--outputjson"),
        requires_lock: false,
        output_format_hint: OutputFormatHint::Json,
    },
    HookDefinition {
        name: "ruff-deep",
        program: "ruff",
        args: &["check", "--select=ALL", "--output-format=json"],
        accepts_file_paths: true,
        file_extensions: &["py", "pyi"],
        timeout_seconds: 180,
        classification: Classification::Analyzer,
        parser_id: "generic",
        json_flag: Some("--output-format=json"),
        requires_lock: false,
        output_format_hint: OutputFormatHint::Json,
    },
    HookDefinition {
        name: "complexipy",
        program: "complexipy",
        args: &["--output-json"],
        accepts_file_paths: true,
        file_extensions: &["py"],
        timeout_seconds: 180,
        classification: Classification::Reporter,
        parser_id: "complexity",
        json_flag: Some("--output-json"),
        requires_lock: false,
        output_format_hint: OutputFormatHint::Json,
    },
    HookDefinition {
        name: "vulture",
        program: "vulture",
        args: &["--json"],
        accepts_file_paths: true,
        file_extensions: &["py"],
        timeout_seconds: 180,
        classification: Classification::Reporter,
        parser_id: "dead_code",
        json_flag: Some("--json"),
        requires_lock: false,
        output_format_hint: OutputFormatHint::Json,
    },
    HookDefinition {
        name: "bandit",
        program: "bandit",
        args: &["-f", "json", "-r"],
        accepts_file_paths: true,
        file_extensions: &["py"],
        timeout_seconds: 180,
        classification: Classification::Reporter,
        parser_id: "security",
        json_flag: Some("-f json"),
        requires_lock: false,
        output_format_hint: OutputFormatHint::Json,
    },
    HookDefinition {
        name: "gitleaks",
        program: "gitleaks",
        args: &["detect", "--report-format=json"],
        accepts_file_paths: false,
        file_extensions: &[],
        timeout_seconds: 180,
        classification: Classification::Reporter,
        parser_id: "secrets",
        json_flag: Some("--report-format=json"),
        requires_lock: false,
        output_format_hint: OutputFormatHint::Json,
    },
    HookDefinition {
        name: "pip-audit",
        program: "pip-audit",
        args: &["--format=json"],
        accepts_file_paths: false,
        file_extensions: &[],
        timeout_seconds: 180,
        classification: Classification::Reporter,
        parser_id: "dependency",
        json_flag: Some("--format=json"),
        requires_lock: false,
        output_format_hint: OutputFormatHint::Json,
    },
    HookDefinition {
        name: "pytest",
        program: "pytest",
        args: &["--json-report", "--json-report-file=-"],
        accepts_file_paths: false,
        file_extensions: &[],
        timeout_seconds: 180,
        classification: Classification::Analyzer,
        parser_id: "test_runner",
        json_flag: Some("--json-report-file=-"),
        requires_lock: false,
        output_format_hint: OutputFormatHint::Json,
    },
];

/// Look up a hook by stable name across both built-in strategies.
pub fn find_by_name(name: &str) -> Option<&'static HookDefinition> {
    FAST_STRATEGY
        .iter()
        .chain(COMPREHENSIVE_STRATEGY.iter())
        .find(|hook| hook.name == name)
}
