//! Bounded-concurrency strategy scheduler.
//!
//! Bounded fan-out over a `tokio::sync::Semaphore` plus spawned tasks
//! joined through `futures::stream::FuturesUnordered`, since hook execution
//! is I/O-bound subprocess waiting rather than CPU-bound work. Formatters
//! run to quiescence before analyzers start, since formatters mutate files
//! an analyzer might be concurrently reading.

use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::Semaphore;

use crate::executor::HookExecutor;
use crate::file_filter::{FileFilter, FileSet};
use crate::hook::{HookDefinition, HookResult, HookResultBuilder};
use crate::settings::Settings;

/// Runs a whole strategy (a batch of [`HookDefinition`]s) with bounded
/// concurrency, honoring the formatter-before-analyzer ordering constraint.
pub struct ParallelHookExecutor {
    executor: Arc<HookExecutor>,
    file_filter: Arc<FileFilter>,
}

impl ParallelHookExecutor {
    pub fn new(executor: Arc<HookExecutor>, file_filter: Arc<FileFilter>) -> Self {
        Self { executor, file_filter }
    }

    /// Formatters run to quiescence first, then everything else. The
    /// returned list is in hook-definition order regardless of completion
    /// order.
    pub async fn run_strategy(
        &self,
        hooks: &'static [HookDefinition],
        file_set: &FileSet,
        settings: &Settings,
    ) -> Vec<HookResult> {
        let indexed: Vec<(usize, &'static HookDefinition)> = hooks.iter().enumerate().collect();
        let (formatters, rest): (Vec<_>, Vec<_>) = indexed.into_iter().partition(|(_, hook)| hook.is_formatter());

        let mut results = self.run_batch(formatters, file_set, settings).await;
        results.extend(self.run_batch(rest, file_set, settings).await);
        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }

    async fn run_batch(
        &self,
        batch: Vec<(usize, &'static HookDefinition)>,
        file_set: &FileSet,
        settings: &Settings,
    ) -> Vec<(usize, HookResult)> {
        let semaphore = Arc::new(Semaphore::new(settings.parallel.max_workers.max(1)));
        let mut in_flight = FuturesUnordered::new();

        for (index, hook) in batch {
            let files = self.file_filter.filter_by_hook(file_set, hook);
            let semaphore = semaphore.clone();
            let executor = self.executor.clone();
            let settings = settings.clone();
            let name = hook.name;
            // `index`/`name` are kept outside the spawned task's own
            // return value so a panic (a `JoinError`, not an `Ok`) still
            // leaves us able to identify which hook died.
            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore was never closed");
                executor.execute(hook, files, &settings).await
            });
            in_flight.push(async move { (index, name, handle.await) });
        }

        let mut results = Vec::new();
        // Drained to completion even after a catastrophic per-hook error,
        // so no in-flight subprocess is ever abandoned.
        while let Some((index, name, joined)) = in_flight.next().await {
            results.push((index, hook_result_from_joined(name, joined)));
        }
        results
    }
}

/// Turns a joined task outcome into a `HookResult`, never dropping the
/// hook entirely — a panicked task (`Err(join_err)`) still has to surface
/// as a synthesized `Error` status, or `run_batch`'s result vector would
/// come back shorter than the batch it was given and desync from
/// hook-definition order.
fn hook_result_from_joined(
    name: &'static str,
    joined: Result<crate::error::EngineResult<HookResult>, tokio::task::JoinError>,
) -> HookResult {
    match joined {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            tracing::error!(hook = name, %err, "infrastructure error running hook");
            HookResultBuilder::new(name).finish_error(format!("{err} ({})", err.remediation_hint()))
        }
        Err(join_err) => {
            tracing::error!(hook = name, %join_err, "hook task panicked");
            HookResultBuilder::new(name).finish_error(format!("hook task panicked: {join_err}"))
        }
    }
}
