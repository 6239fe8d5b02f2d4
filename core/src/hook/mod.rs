//! Hook definitions: the static catalog entries, plus the per-invocation
//! result type.

pub mod catalog;
mod result;

pub use result::{HookResult, HookResultBuilder, HookStatus};

/// How a hook is treated by the scheduler and the status-override rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Mutates files; must run before analyzers and under its lock.
    Formatter,
    /// Read-only; ordinary exit-code semantics.
    Analyzer,
    /// Exits 0 even when it finds issues; status is overridden to
    /// `failed` when `parsed_issues` is non-empty.
    Reporter,
    /// Read-only syntax/shape check (e.g. `check-json`).
    Validator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatHint {
    Json,
    Text,
    Custom,
}

/// Immutable catalog entry for one integrated tool.
///
/// All fields are `'static` data so the whole catalog lives in `.rodata`;
/// see `catalog.rs` for the populated `FAST_STRATEGY`/`COMPREHENSIVE_STRATEGY`
/// lists. Never mutated after definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookDefinition {
    pub name: &'static str,
    pub program: &'static str,
    /// Fixed arguments that precede the file list (or `{files}` marker).
    pub args: &'static [&'static str],
    pub accepts_file_paths: bool,
    /// Empty means "no extension filter, pass the unfiltered file set."
    pub file_extensions: &'static [&'static str],
    pub timeout_seconds: u64,
    pub classification: Classification,
    pub parser_id: &'static str,
    pub json_flag: Option<&'static str>,
    pub requires_lock: bool,
    pub output_format_hint: OutputFormatHint,
}

impl HookDefinition {
    pub fn is_reporter(&self) -> bool {
        self.classification == Classification::Reporter
    }

    pub fn is_formatter(&self) -> bool {
        self.classification == Classification::Formatter
    }

    /// Build the full argv for this hook given a resolved file set:
    /// substitute the file list if `accepts_file_paths`; the `json_flag`
    /// is already folded into `args` for entries that always want
    /// structured output.
    pub fn build_args(&self, files: &[String]) -> Vec<String> {
        let mut out: Vec<String> = self.args.iter().map(|arg| arg.to_string()).collect();
        if self.accepts_file_paths {
            out.extend(files.iter().cloned());
        }
        out
    }

    /// Whether `path` survives this hook's extension filter; empty
    /// `file_extensions` means unfiltered.
    pub fn matches_extension(&self, path: &str) -> bool {
        if self.file_extensions.is_empty() {
            return true;
        }
        match path.rsplit_once('.') {
            Some((_, ext)) => self.file_extensions.contains(&ext),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::catalog::FAST_STRATEGY;

    #[test]
    fn empty_extension_filter_matches_everything() {
        let hook = FAST_STRATEGY
            .iter()
            .find(|h| h.name == "trailing-whitespace")
            .unwrap();
        assert!(hook.matches_extension("README"));
        assert!(hook.matches_extension("a/b/c.py"));
    }

    #[test]
    fn nonempty_extension_filter_is_exact() {
        let hook = FAST_STRATEGY.iter().find(|h| h.name == "ruff-format").unwrap();
        assert!(hook.matches_extension("a.py"));
        assert!(!hook.matches_extension("a.rs"));
        assert!(!hook.matches_extension("noext"));
    }
}
