//! The earliest-`[`-or-`{` extraction rule.
//!
//! Searching for `{` first would mis-dispatch array-valued outputs as
//! object-valued. This module is the single place that decision is made so
//! every parser shares the same behavior.

/// Find the earliest JSON value in `raw` by scanning for whichever of `[`
/// or `{` occurs first, and return the suffix starting there.
///
/// Returns `None` if neither character appears.
pub fn extract_json_span(raw: &str) -> Option<&str> {
    let bracket = raw.find('[');
    let brace = raw.find('{');
    let start = match (bracket, brace) {
        (Some(b), Some(c)) => b.min(c),
        (Some(b), None) => b,
        (None, Some(c)) => c,
        (None, None) => return None,
    };
    Some(&raw[start..])
}

/// Reporting tools may emit the sentinel `[*]` for "no findings" instead of
/// a proper empty array. Normalize it before handing the span to
/// `serde_json`.
pub fn normalize_empty_sentinel(span: &str) -> &str {
    if span.trim() == "[*]" {
        "[]"
    } else {
        span
    }
}

/// Whether this tool's raw output looks like JSON at all. Leading
/// whitespace/preamble text is tolerated as long as a `[` or `{` appears
/// somewhere.
pub fn looks_like_json(raw: &str) -> bool {
    extract_json_span(raw).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_before_object_is_chosen_when_earlier() {
        let raw = "preamble\n[{\"a\":1}]\n{\"b\":2}";
        let span = extract_json_span(raw).unwrap();
        assert!(span.starts_with('['));
    }

    #[test]
    fn object_is_chosen_when_it_appears_first() {
        let raw = "preamble {\"a\":1} trailing [1,2]";
        let span = extract_json_span(raw).unwrap();
        assert!(span.starts_with('{'));
    }

    #[test]
    fn no_brackets_returns_none() {
        assert!(extract_json_span("plain text, no structure here").is_none());
    }

    #[test]
    fn star_sentinel_normalizes_to_empty_array() {
        assert_eq!(normalize_empty_sentinel("[*]"), "[]");
        assert_eq!(normalize_empty_sentinel("[1,2]"), "[1,2]");
    }
}
