//! Structured logging initialization.
//!
//! Uses `tracing-subscriber`'s `std`, `ansi`, `env-filter`, and `fmt`
//! features only — no JSON/OTLP layer bundled here, that belongs to a front
//! end. The engine itself never calls `init()`; it only emits `tracing`
//! events. This module exists so a CLI front end has one call to make to
//! get sane defaults.

use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset: the engine's own
/// crate at `info`, everything else at `warn`.
const DEFAULT_FILTER: &str = "warn,crackerjack_core=info";

/// Install a global `tracing` subscriber suitable for a CLI front end.
///
/// Idempotent-ish: a second call after one has already installed a global
/// default subscriber is a logic error elsewhere in the caller, so this
/// returns `Err` rather than panicking.
pub fn init_default() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .with_writer(std::io::stderr)
        .try_init()
}

/// Per-run identifier used to correlate log lines across the many
/// concurrently-running hooks of a single orchestrator invocation.
/// Rendered into `tracing::info_span!("run", id = %run_id)` by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

impl RunId {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run-{:016x}", self.0)
    }
}
