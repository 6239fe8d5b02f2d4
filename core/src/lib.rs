//! Quality-gate orchestration engine: runs a catalog of external hooks
//! against a project's files, parses their output into a common `Issue`
//! shape, caches results by content fingerprint, and drives an autofix
//! loop to convergence before handing a tiered quality gate the final
//! verdict.
//!
//! Module layout mirrors the lifecycle of one run: [`settings`] is the
//! configuration surface; [`file_filter`] resolves which files are in
//! scope; [`hook`] and [`executor`] run one adapter; [`parallel`]
//! schedules a whole strategy; [`parser`] turns raw stdout/stderr into
//! [`issue::Issue`]s; [`cache`] and [`lock`] are the executor's
//! supporting infrastructure; [`autofix`] and [`fixer`] drive the
//! fixed-point loop; [`gate`] and [`report`] produce the final verdict.

pub mod autofix;
pub mod cache;
pub mod error;
pub mod executor;
pub mod file_filter;
pub mod fixer;
pub mod gate;
pub mod hook;
pub mod issue;
pub mod lock;
pub mod observability;
pub mod parallel;
pub mod parser;
pub mod report;
pub mod settings;

pub use autofix::{AutofixCoordinator, AutofixOutcome, CatalogStrategyRunner, StrategyRunner};
pub use error::{EngineError, EngineResult};
pub use executor::HookExecutor;
pub use file_filter::{FileFilter, FileSet, Scope};
pub use fixer::{FixPlan, FixResult, IssueFixer};
pub use gate::{Exemption, GateResult, QualityBaseline, QualityGate, Tier};
pub use hook::{HookDefinition, HookResult, HookStatus};
pub use issue::{Issue, IssueType, Severity};
pub use parallel::ParallelHookExecutor;
pub use parser::ParserRegistry;
pub use report::{ExitCode, Report, Summary};
pub use settings::Settings;

use std::sync::Arc;

use error::EngineResult;

/// Wires the executor, cache, lock manager and parser registry into a
/// ready-to-use [`ParallelHookExecutor`], the construction a front end is
/// expected to perform once per run.
pub fn build_scheduler(settings: &Settings) -> EngineResult<ParallelHookExecutor> {
    let cache = Arc::new(cache::ResultCache::open(settings.cache_dir(), settings.cache.size_budget_bytes)?);
    let locks = Arc::new(lock::LockManager::new(settings.lock_dir(), std::time::Duration::from_secs(5)));
    let parsers = Arc::new(parser::ParserRegistry::with_builtin_parsers());
    let executor = Arc::new(executor::HookExecutor::new(&settings.project_root, cache, locks, parsers));
    let file_filter = Arc::new(file_filter::FileFilter::new(&settings.project_root));
    Ok(ParallelHookExecutor::new(executor, file_filter))
}
