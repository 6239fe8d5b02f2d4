//! Engine-wide error kinds.
//!
//! Most failures never reach this type: a single hook failing, timing out, or
//! producing unparsable output is captured into [`crate::hook::HookStatus`]
//! rather than propagated as an error. [`EngineError`] is reserved for
//! infrastructure-wide failures that abort a whole run, plus the few APIs
//! (the lock manager, the cache) that have no `HookResult` to fold a
//! failure into.

use std::path::PathBuf;

/// Top-level error type for the orchestration engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A required lock could not be acquired within its configured timeout,
    /// even after the one retry the lock manager performs.
    #[error("timed out waiting for lock on hook `{hook_name}` after {attempts} attempt(s)")]
    LockTimeout { hook_name: String, attempts: u32 },

    /// The lock directory (or the lock file within it) could not be created
    /// or opened; this is an infrastructure failure, not a contention one.
    #[error("lock system unavailable at {path}: {source}")]
    LockUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The on-disk cache directory could not be created, read, or written.
    #[error("result cache unavailable at {path}: {source}")]
    CacheUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A hook's declared summary count of findings disagreed with the number
    /// of issues the parser actually produced, and the hook is not on the
    /// count-validation skip list.
    #[error(
        "parser `{parser_id}` reported {parsed} issue(s) but tool output claimed {claimed}; \
         tool `{hook_name}` is not on the count-validation skip list"
    )]
    ParseMismatch {
        hook_name: String,
        parser_id: &'static str,
        parsed: usize,
        claimed: usize,
    },

    /// The binary named by a hook's command template could not be spawned at
    /// all (missing executable, permission denied, etc).
    #[error("failed to start `{program}` for hook `{hook_name}`: {source}")]
    SubprocessSpawnFailure {
        hook_name: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// `git` itself could not be invoked while resolving the scan file set.
    #[error("failed to run git for file discovery: {source}")]
    GitUnavailable {
        #[source]
        source: std::io::Error,
    },

    /// The project root does not exist, or a computed path escaped it.
    #[error("path `{path}` is not inside project root `{root}`")]
    PathEscapesRoot { path: PathBuf, root: PathBuf },

    /// Generic I/O failure that doesn't fit a more specific variant above.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// A one-line, user-facing remediation hint: every failure path
    /// surfaces a named error kind plus a hint.
    pub fn remediation_hint(&self) -> String {
        match self {
            Self::LockTimeout { hook_name, .. } => format!(
                "another process may be holding the lock for `{hook_name}`; retry once it \
                 finishes, or remove a stale lock file if you are certain no process holds it"
            ),
            Self::LockUnavailable { path, .. } => {
                format!("check that the lock directory `{}` is writable", path.display())
            }
            Self::CacheUnavailable { path, .. } => format!(
                "check that the cache directory `{}` is writable, or disable caching",
                path.display()
            ),
            Self::ParseMismatch { hook_name, .. } => format!(
                "`{hook_name}`'s output format may have changed; add it to the count-validation \
                 skip list if this is expected"
            ),
            Self::SubprocessSpawnFailure { program, .. } => {
                format!("install `{program}` and make sure it is on PATH")
            }
            Self::GitUnavailable { .. } => {
                "install git and make sure it is on PATH, or run with a full scan".to_string()
            }
            Self::PathEscapesRoot { .. } => {
                "this indicates a bug in a hook or filter; please report it".to_string()
            }
            Self::Io(_) => "check filesystem permissions and available disk space".to_string(),
        }
    }
}
