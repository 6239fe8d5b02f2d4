//! The count-validation skip list.
//!
//! A data-driven table rather than logic hard-coded in each parser body.
//! Each entry names *what* about that tool's output defeats naive
//! line-counting — new tools get added here, not by touching parser code.

/// `(parser_id, hook_name)` pairs exempt from the "parsed_count ==
/// summary_count" assertion.
pub const COUNT_VALIDATION_SKIP_LIST: &[(&str, &str)] = &[
    // Ruff's "diagnostic" output format repeats the offending line plus
    // several caret/context lines, each of which may itself contain a
    // colon; a naive per-line count double- or triple-counts.
    ("generic", "ruff-deep"),
    // pyright's JSON summary separates `errorCount`/`warningCount`, but its
    // text fallback emits one header line per *file*, not per diagnostic.
    ("type_checker", "pyright"),
    // gitleaks reports a commit-level summary count that includes redacted
    // duplicate matches collapsed in the JSON body.
    ("secrets", "gitleaks"),
    // pip-audit's summary row counts *packages* with findings, not
    // individual vulnerability records, which may be more than one per
    // package.
    ("dependency", "pip-audit"),
];

/// Whether `(parser_id, hook_name)` should skip the count-reconciliation
/// assertion.
pub fn is_skipped(parser_id: &str, hook_name: &str) -> bool {
    COUNT_VALIDATION_SKIP_LIST.contains(&(parser_id, hook_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ruff_deep_is_skipped() {
        assert!(is_skipped("generic", "ruff-deep"));
    }

    #[test]
    fn ruff_format_is_not_skipped() {
        assert!(!is_skipped("generic", "ruff-format"));
    }
}
