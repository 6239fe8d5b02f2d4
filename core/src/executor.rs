//! Single-hook execution.
//!
//! Dedicated readers drain stdout/stderr concurrently with the wait so
//! neither pipe can fill and deadlock the child. Timeout is layered with
//! `tokio::time::timeout` around the awaited exit status; on timeout the
//! child is killed and reaped explicitly, never left for the OS.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

use crate::cache::{hash_file_content, Fingerprint, ResultCache};
use crate::error::EngineResult;
use crate::hook::{HookDefinition, HookResult, HookResultBuilder, HookStatus};
use crate::lock::LockManager;
use crate::parser::ParserRegistry;
use crate::settings::Settings;

/// Runs exactly one [`HookDefinition`] against a resolved file set.
pub struct HookExecutor {
    project_root: PathBuf,
    cache: Arc<ResultCache>,
    locks: Arc<LockManager>,
    parsers: Arc<ParserRegistry>,
}

impl HookExecutor {
    pub fn new(
        project_root: impl Into<PathBuf>,
        cache: Arc<ResultCache>,
        locks: Arc<LockManager>,
        parsers: Arc<ParserRegistry>,
    ) -> Self {
        Self { project_root: project_root.into(), cache, locks, parsers }
    }

    /// Runs the hook to completion: cache lookup, optional lock, spawn with
    /// timeout, parse, and cache store.
    pub async fn execute(&self, hook: &'static HookDefinition, files: Vec<String>, settings: &Settings) -> EngineResult<HookResult> {
        let command_template = command_template_string(hook);
        let file_hashes = self.hash_files(&files);
        let fingerprint = Fingerprint::compute(hook.name, &command_template, &files, &file_hashes, None);

        // Step 1: cache lookup.
        if settings.cache.enabled {
            if let Some(mut cached) = self.cache.lookup(&fingerprint)? {
                cached.cache_hit = true;
                tracing::debug!(hook = hook.name, %fingerprint, "cache hit");
                return Ok(cached);
            }
        }

        // Step 2: acquire the per-hook lock if this hook mutates files.
        let _guard = if hook.requires_lock {
            Some(self.locks.acquire(hook.name).await?)
        } else {
            None
        };

        // Steps 3-4: build the command and spawn with a timeout.
        let args = hook.build_args(&files);
        let timeout = settings.timeout_for(hook.name, hook.timeout_seconds);
        let started = Instant::now();
        tracing::trace!(hook = hook.name, program = hook.program, ?args, "spawning hook");
        let outcome = spawn_and_capture(&self.project_root, hook.program, &args, timeout).await;

        let result = match outcome {
            Err(SpawnOutcome::SpawnFailed(err)) => {
                tracing::warn!(hook = hook.name, %err, "failed to spawn hook");
                HookResultBuilder::new(hook.name)
                    .duration(started.elapsed())
                    .files_scanned(files.len())
                    .finish_error(format!("failed to start `{}`: {err}", hook.program))
            }
            Err(SpawnOutcome::TimedOut) => {
                tracing::warn!(hook = hook.name, ?timeout, "hook timed out");
                HookResultBuilder::new(hook.name).duration(started.elapsed()).files_scanned(files.len()).finish_timeout()
            }
            Ok(output) => {
                // Step 5: initial status from exit code happens inside the
                // builder; steps 6-8 (parse, status override, count
                // reconciliation) are folded into `finish_parsed`.
                if !output.stderr.is_empty() {
                    tracing::debug!(hook = hook.name, stderr = %String::from_utf8_lossy(&output.stderr), "hook stderr");
                }
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                let builder = HookResultBuilder::new(hook.name)
                    .exit_code(output.status.code())
                    .duration(started.elapsed())
                    .output(stdout.clone(), stderr.clone())
                    .files_scanned(files.len());
                let wants_json = hook.json_flag.is_some();
                match self.parsers.parse_hook_output(hook.parser_id, hook.name, wants_json, &stdout, &stderr) {
                    Ok(issues) => builder.finish_parsed(issues, hook.is_reporter()),
                    Err(err) => {
                        tracing::warn!(hook = hook.name, %err, "parser error");
                        builder.finish_error(err.to_string())
                    }
                }
            }
        };

        // Step 9: store and return. Only cache passed/failed outcomes —
        // errors and timeouts reflect infrastructure hiccups, not the
        // tool's verdict on these inputs, so caching them would hide a
        // transient problem behind a stale "it worked" result forever.
        if settings.cache.enabled && matches!(result.status, HookStatus::Passed | HookStatus::Failed) {
            self.cache.store(&fingerprint, &result)?;
        }

        Ok(result)
    }

    fn hash_files(&self, files: &[String]) -> Vec<String> {
        files
            .iter()
            .filter_map(|relative| {
                let bytes = std::fs::read(self.project_root.join(relative)).ok()?;
                Some(hash_file_content(&bytes))
            })
            .collect()
    }
}

fn command_template_string(hook: &HookDefinition) -> String {
    let mut parts = vec![hook.program.to_string()];
    parts.extend(hook.args.iter().map(|arg| arg.to_string()));
    parts.join(" ")
}

enum SpawnOutcome {
    SpawnFailed(std::io::Error),
    TimedOut,
}

async fn spawn_and_capture(
    cwd: &Path,
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<std::process::Output, SpawnOutcome> {
    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(SpawnOutcome::SpawnFailed)?;
    let mut stdout_pipe = child.stdout.take().expect("stdout was requested as piped");
    let mut stderr_pipe = child.stderr.take().expect("stderr was requested as piped");

    // Dedicated readers run concurrently with the wait, mirroring the
    // teacher's stdin-writer/output-waiter thread split: a child that
    // fills stdout while nobody drains it would otherwise deadlock.
    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stdout_pipe.read_to_end(&mut buf).await;
        buf
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr_pipe.read_to_end(&mut buf).await;
        buf
    });

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => {
            let stdout = stdout_task.await.unwrap_or_default();
            let stderr = stderr_task.await.unwrap_or_default();
            Ok(std::process::Output { status, stdout, stderr })
        }
        Ok(Err(err)) => {
            stdout_task.abort();
            stderr_task.abort();
            Err(SpawnOutcome::SpawnFailed(err))
        }
        Err(_elapsed) => {
            try_kill_and_wait(&mut child).await;
            stdout_task.abort();
            stderr_task.abort();
            Err(SpawnOutcome::TimedOut)
        }
    }
}

/// Terminate a child whose timeout fired and reap it, so it never becomes
/// an orphan process.
async fn try_kill_and_wait(child: &mut Child) {
    if let Err(err) = child.start_kill() {
        tracing::warn!(%err, "failed to send kill signal to timed-out hook");
        return;
    }
    if let Err(err) = child.wait().await {
        tracing::warn!(%err, "failed to reap killed hook process");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::catalog::FAST_STRATEGY;

    fn test_env() -> (tempfile::TempDir, Arc<ResultCache>, Arc<LockManager>, Arc<ParserRegistry>) {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(ResultCache::open(dir.path().join("cache"), 1024 * 1024).unwrap());
        let locks = Arc::new(LockManager::new(dir.path().join("locks"), Duration::from_secs(1)));
        let parsers = Arc::new(ParserRegistry::with_builtin_parsers());
        (dir, cache, locks, parsers)
    }

    #[tokio::test]
    async fn spawn_failure_becomes_error_status_not_a_propagated_error() {
        let (dir, cache, locks, parsers) = test_env();
        let executor = HookExecutor::new(dir.path(), cache, locks, parsers);
        let hook = FAST_STRATEGY.iter().find(|h| h.name == "codespell").unwrap();
        let settings = Settings::default();
        // `program` comes from the catalog and isn't installed in the test
        // sandbox, so this exercises the spawn-failure path end to end.
        let result = executor.execute(hook, vec![], &settings).await.unwrap();
        assert_eq!(result.status, HookStatus::Error);
        assert!(result.error_message.is_some());
    }
}
