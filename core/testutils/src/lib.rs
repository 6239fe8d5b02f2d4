//! Shared fixtures for `crackerjack-core`'s integration tests: a temp git
//! repo builder, a fake-hook script writer, and convenience constructors
//! for `Issue`/`HookDefinition`.
//!
//! Grounded on the teacher's own `testutils` crate (`lib/testutils/src/lib.rs`
//! `TestWorkspace`, a disposable temp-directory-plus-git-repo the rest of
//! the teacher's test suite builds on).

use std::path::{Path, PathBuf};
use std::process::Command;

use crackerjack_core::hook::{Classification, HookDefinition, OutputFormatHint};
use crackerjack_core::issue::{Issue, IssueType, Severity};

/// A disposable git repository for tests that need `git diff`/`HEAD` to
/// resolve, matching what `FileFilter::files_for_scan` shells out to.
pub struct TestRepo {
    dir: tempfile::TempDir,
}

impl TestRepo {
    /// `git init`, configure a throwaway identity, and make one commit so
    /// `HEAD` resolves.
    pub fn init() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["config", "user.email", "test@example.invalid"]);
        run_git(dir.path(), &["config", "user.name", "Test"]);
        std::fs::write(dir.path().join(".gitkeep"), b"").unwrap();
        run_git(dir.path(), &["add", "."]);
        run_git(dir.path(), &["commit", "-q", "-m", "initial"]);
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` at `relative` (creating parent directories) without
    /// staging or committing it, so it shows up as an untracked/modified
    /// change for incremental-scope tests.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let full = self.dir.path().join(relative);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full, content).unwrap();
        full
    }

    pub fn commit_all(&self, message: &str) {
        run_git(self.dir.path(), &["add", "-A"]);
        run_git(self.dir.path(), &["commit", "-q", "-m", message]);
    }
}

fn run_git(cwd: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .status()
        .unwrap_or_else(|err| panic!("failed to run git {args:?}: {err}"));
    assert!(status.success(), "git {args:?} failed");
}

/// Write an executable shell script at `path` that prints `stdout` to its
/// standard output and exits with `exit_code`, standing in for a real
/// hook binary in tests that exercise `HookExecutor::execute` end to end.
#[cfg(unix)]
pub fn write_fake_hook(path: &Path, stdout: &str, exit_code: i32) {
    use std::os::unix::fs::PermissionsExt;
    let script = format!("#!/bin/sh\ncat <<'EOF'\n{stdout}\nEOF\nexit {exit_code}\n");
    std::fs::write(path, script).unwrap();
    let mut perms = std::fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).unwrap();
}

/// A minimal valid [`Issue`] for tests that don't care about its fields
/// beyond "exists and is well-formed".
pub fn sample_issue(file_path: &str, message: &str) -> Issue {
    Issue::new("test-tool", IssueType::Other, Severity::Low, file_path, Some(1), None, None, message, false, vec![]).unwrap()
}

/// A minimal [`HookDefinition`] for tests that need a catalog entry but
/// don't care about its specific program or classification.
pub const fn sample_hook_definition(name: &'static str, program: &'static str) -> HookDefinition {
    HookDefinition {
        name,
        program,
        args: &[],
        accepts_file_paths: true,
        file_extensions: &[],
        timeout_seconds: 5,
        classification: Classification::Analyzer,
        parser_id: "generic",
        json_flag: None,
        requires_lock: false,
        output_format_hint: OutputFormatHint::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_init_produces_a_resolvable_head() {
        let repo = TestRepo::init();
        let output = Command::new("git").args(["rev-parse", "HEAD"]).current_dir(repo.path()).output().unwrap();
        assert!(output.status.success());
    }

    #[test]
    fn sample_issue_is_well_formed() {
        let issue = sample_issue("a.py", "something is wrong");
        assert_eq!(issue.file_path, "a.py");
    }
}
