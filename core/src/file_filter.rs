//! Incremental-scan file discovery.
//!
//! Uses a small typed command builder around `git diff`, `current_dir` set
//! to the project root, stdout captured and parsed line-by-line. The
//! full-scan path uses the `ignore` crate rather than hand-rolled glob
//! matching, for free `.gitignore` semantics.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::hook::HookDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Incremental,
    Full,
    Auto,
}

/// The resolved candidate file set for a run, plus whether it was upgraded
/// to a full scan (so the caller can log it once).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    pub files: Vec<String>,
    pub upgraded_to_full: bool,
}

impl FileSet {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Produces candidate file sets relative to a fixed project root.
pub struct FileFilter {
    project_root: PathBuf,
}

impl FileFilter {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self { project_root: project_root.into() }
    }

    /// Resolves the candidate file set for one run.
    ///
    /// In `Auto`, runs `git diff --name-only base_ref...HEAD`, falling back
    /// to `HEAD~1` when no base is configured; upgrades to `Full` when the
    /// diff set reaches `threshold` entries; downgrades to `Full` on any
    /// git failure (not a repo, detached head, binary missing), logging
    /// once via `tracing::warn!`.
    pub fn files_for_scan(&self, scope: Scope, threshold: usize, base_ref: &str) -> FileSet {
        match scope {
            Scope::Full => FileSet { files: self.full_tree(), upgraded_to_full: false },
            Scope::Incremental => {
                FileSet { files: self.git_diff_names(base_ref).unwrap_or_default(), upgraded_to_full: false }
            }
            Scope::Auto => match self.git_diff_names(base_ref) {
                Some(files) if files.len() >= threshold => {
                    tracing::info!(
                        changed = files.len(),
                        threshold,
                        "change set reached full-scan threshold; upgrading to full scan"
                    );
                    FileSet { files: self.full_tree(), upgraded_to_full: true }
                }
                Some(files) => FileSet { files, upgraded_to_full: false },
                None => {
                    tracing::warn!("git diff unavailable; falling back to full scan");
                    FileSet { files: self.full_tree(), upgraded_to_full: true }
                }
            },
        }
    }

    /// Intersects with the hook's `file_extensions`; hooks with
    /// `accepts_file_paths=false` get no files at all (the command runs
    /// without `{files}`).
    pub fn filter_by_hook(&self, file_set: &FileSet, hook: &HookDefinition) -> Vec<String> {
        if !hook.accepts_file_paths {
            return Vec::new();
        }
        file_set
            .files
            .iter()
            .filter(|path| hook.matches_extension(path))
            .filter(|path| self.exists_under_root(path))
            .cloned()
            .collect()
    }

    fn exists_under_root(&self, relative: &str) -> bool {
        self.project_root.join(relative).is_file()
    }

    fn git_diff_names(&self, base_ref: &str) -> Option<Vec<String>> {
        let spec = format!("{base_ref}...HEAD");
        let output = Command::new("git")
            .arg("diff")
            .arg("--name-only")
            .arg(&spec)
            .current_dir(&self.project_root)
            .output()
            .ok()?;
        let output = if output.status.success() {
            output
        } else {
            Command::new("git")
                .arg("diff")
                .arg("--name-only")
                .arg("HEAD~1")
                .current_dir(&self.project_root)
                .output()
                .ok()?
        };
        if !output.status.success() {
            return None;
        }
        let text = String::from_utf8_lossy(&output.stdout);
        Some(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(normalize_relative)
                .filter(|p| self.exists_under_root(p))
                .collect(),
        )
    }

    fn full_tree(&self) -> Vec<String> {
        let mut out = Vec::new();
        let walker = ignore::WalkBuilder::new(&self.project_root).hidden(false).build();
        for entry in walker.flatten() {
            if entry.file_type().is_some_and(|t| t.is_file()) {
                if let Ok(relative) = entry.path().strip_prefix(&self.project_root) {
                    out.push(normalize_relative(&relative.to_string_lossy()));
                }
            }
        }
        out.sort();
        out
    }
}

/// Normalize a path string to forward-slash, project-relative form so
/// fingerprints and reports are stable across platforms.
fn normalize_relative(path: &str) -> String {
    path.replace('\\', "/")
}

/// Never returns a path outside the project root.
pub fn is_within_root(root: &Path, candidate: &Path) -> bool {
    match candidate.strip_prefix(root) {
        Ok(rest) => !rest.starts_with(".."),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::catalog::FAST_STRATEGY;

    #[test]
    fn hooks_with_no_file_paths_receive_nothing() {
        let filter = FileFilter::new(".");
        let hook = FAST_STRATEGY.iter().find(|h| h.name == "check-added-large-files").unwrap();
        let set = FileSet { files: vec!["a.py".to_string()], upgraded_to_full: false };
        assert!(filter.filter_by_hook(&set, hook).is_empty());
    }

    #[test]
    fn normalize_relative_uses_forward_slashes() {
        assert_eq!(normalize_relative("a\\b\\c.py"), "a/b/c.py");
    }
}
