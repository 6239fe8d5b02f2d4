//! Per-hook cross-process advisory locking.
//!
//! A named lock file under a lock directory, OS-level exclusive locking so
//! separate orchestrator processes also coordinate, released (and
//! unlinked) in `Drop` so a crashed holder's lock is recoverable by the
//! next acquirer. `LockManager` adds the per-hook-name bookkeeping and a
//! timeout/backoff retry policy on top of that primitive.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{EngineError, EngineResult};

/// A held advisory lock on one hook name. Released automatically when
/// dropped, from any exit path (including unwind).
pub struct LockGuard {
    path: PathBuf,
    file: Option<File>,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(err) = file.unlock() {
                tracing::warn!(path = %self.path.display(), %err, "failed to unlock lock file");
            }
        }
        // Unlinking lets the next acquirer re-create the file rather than
        // fighting over the same inode; a crashed holder's lock is released
        // by the OS regardless, so this is purely for filesystem tidiness.
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), %err, "failed to remove lock file");
            }
        }
    }
}

fn try_acquire(lock_dir: &Path, hook_name: &str) -> EngineResult<Option<LockGuard>> {
    std::fs::create_dir_all(lock_dir).map_err(|source| EngineError::LockUnavailable {
        path: lock_dir.to_path_buf(),
        source,
    })?;
    let path = lock_dir.join(format!("{hook_name}.lock"));
    let file = OpenOptions::new().create(true).truncate(false).write(true).open(&path).map_err(|source| {
        EngineError::LockUnavailable { path: path.clone(), source }
    })?;
    match file.try_lock() {
        Ok(()) => Ok(Some(LockGuard { path, file: Some(file) })),
        Err(std::fs::TryLockError::WouldBlock) => Ok(None),
        Err(std::fs::TryLockError::Error(source)) => Err(EngineError::LockUnavailable { path, source }),
    }
}

/// Owns the lock directory and the acquisition policy. One instance is
/// shared (via `Arc`) across all concurrently-running hooks in a run.
pub struct LockManager {
    lock_dir: PathBuf,
    acquire_timeout: Duration,
    poll_interval: Duration,
}

impl LockManager {
    pub fn new(lock_dir: impl Into<PathBuf>, acquire_timeout: Duration) -> Self {
        Self { lock_dir: lock_dir.into(), acquire_timeout, poll_interval: Duration::from_millis(50) }
    }

    /// `spec.md` §4.5 `acquire`: blocks (cooperatively) until granted or the
    /// timeout elapses, at which point the whole acquisition is retried
    /// once after a short backoff (`spec.md` §7 `LockTimeout` recovery); a
    /// second failure is surfaced as `EngineError::LockTimeout`.
    pub async fn acquire(&self, hook_name: &str) -> EngineResult<LockGuard> {
        match self.acquire_once(hook_name).await {
            Ok(guard) => Ok(guard),
            Err(EngineError::LockTimeout { .. }) => {
                tracing::warn!(hook_name, "lock acquisition timed out; retrying once after backoff");
                tokio::time::sleep(self.poll_interval * 4).await;
                self.acquire_once(hook_name).await.map_err(|_| EngineError::LockTimeout {
                    hook_name: hook_name.to_string(),
                    attempts: 2,
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn acquire_once(&self, hook_name: &str) -> EngineResult<LockGuard> {
        let deadline = tokio::time::Instant::now() + self.acquire_timeout;
        loop {
            if let Some(guard) = try_acquire(&self.lock_dir, hook_name)? {
                return Ok(guard);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(EngineError::LockTimeout { hook_name: hook_name.to_string(), attempts: 1 });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_then_release_allows_reacquisition() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LockManager::new(dir.path(), Duration::from_millis(500));
        let guard = manager.acquire("ruff-format").await.unwrap();
        drop(guard);
        let guard2 = manager.acquire("ruff-format").await.unwrap();
        drop(guard2);
    }

    #[tokio::test]
    async fn concurrent_acquire_on_same_hook_serializes() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LockManager::new(dir.path(), Duration::from_millis(300));
        let guard = manager.acquire("ruff-format").await.unwrap();
        let err = manager.acquire("ruff-format").await.unwrap_err();
        assert!(matches!(err, EngineError::LockTimeout { .. }));
        drop(guard);
    }

    #[tokio::test]
    async fn different_hook_names_do_not_contend() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LockManager::new(dir.path(), Duration::from_millis(300));
        let _g1 = manager.acquire("ruff-format").await.unwrap();
        let _g2 = manager.acquire("prettier-markdown").await.unwrap();
    }
}
