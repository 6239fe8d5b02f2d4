//! `HookExecutor::execute` against a real spawned process (a disposable
//! shell script standing in for a tool binary), covering the cache-hit
//! short circuit and lock serialization end to end rather than through the
//! synthetic "program is simply missing" path `executor.rs`'s own unit test
//! uses.

#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;

use crackerjack_core::cache::ResultCache;
use crackerjack_core::hook::{Classification, HookDefinition, HookStatus, OutputFormatHint};
use crackerjack_core::lock::LockManager;
use crackerjack_core::parser::ParserRegistry;
use crackerjack_core::settings::Settings;
use crackerjack_core::HookExecutor;
use crackerjack_testutils::write_fake_hook;

fn leak_path(dir: &std::path::Path, name: &str) -> &'static str {
    let path = dir.join(name);
    Box::leak(path.to_string_lossy().into_owned().into_boxed_str())
}

fn test_env(project_root: &std::path::Path) -> (Arc<ResultCache>, Arc<LockManager>, Arc<ParserRegistry>) {
    let cache = Arc::new(ResultCache::open(project_root.join("cache"), 1024 * 1024).unwrap());
    let locks = Arc::new(LockManager::new(project_root.join("locks"), Duration::from_secs(1)));
    let parsers = Arc::new(ParserRegistry::with_builtin_parsers());
    (cache, locks, parsers)
}

#[tokio::test]
async fn a_clean_exit_with_no_findings_passes_and_is_cached_for_the_next_call() {
    let dir = tempfile::tempdir().unwrap();
    let script = leak_path(dir.path(), "clean-hook.sh");
    write_fake_hook(std::path::Path::new(script), "All checks passed!", 0);

    let hook: &'static HookDefinition = Box::leak(Box::new(HookDefinition {
        name: "fake-clean",
        program: script,
        args: &[],
        accepts_file_paths: false,
        file_extensions: &[],
        timeout_seconds: 5,
        classification: Classification::Analyzer,
        parser_id: "generic",
        json_flag: None,
        requires_lock: false,
        output_format_hint: OutputFormatHint::Text,
    }));

    let (cache, locks, parsers) = test_env(dir.path());
    let executor = HookExecutor::new(dir.path(), cache.clone(), locks, parsers);
    let settings = Settings::default();

    let first = executor.execute(hook, vec![], &settings).await.unwrap();
    assert_eq!(first.status, HookStatus::Passed);
    assert!(!first.cache_hit);

    let second = executor.execute(hook, vec![], &settings).await.unwrap();
    assert_eq!(second.status, HookStatus::Passed);
    assert!(second.cache_hit, "second call with identical inputs should be served from cache");
}

#[tokio::test]
async fn a_nonzero_exit_with_parseable_findings_fails_with_those_issues() {
    let dir = tempfile::tempdir().unwrap();
    let script = leak_path(dir.path(), "dirty-hook.sh");
    write_fake_hook(std::path::Path::new(script), "a.py:3:1: E501 line too long", 1);

    let hook: &'static HookDefinition = Box::leak(Box::new(HookDefinition {
        name: "fake-dirty",
        program: script,
        args: &[],
        accepts_file_paths: false,
        file_extensions: &[],
        timeout_seconds: 5,
        classification: Classification::Analyzer,
        parser_id: "generic",
        json_flag: None,
        requires_lock: false,
        output_format_hint: OutputFormatHint::Text,
    }));

    let (cache, locks, parsers) = test_env(dir.path());
    let executor = HookExecutor::new(dir.path(), cache, locks, parsers);
    let settings = Settings::default();

    let result = executor.execute(hook, vec![], &settings).await.unwrap();
    assert_eq!(result.status, HookStatus::Failed);
    assert_eq!(result.issues_count(), 1);
    assert_eq!(result.parsed_issues[0].file_path, "a.py");
}

#[tokio::test]
async fn a_hook_that_outlasts_its_timeout_is_killed_and_reported_as_timed_out() {
    let dir = tempfile::tempdir().unwrap();
    let script_path = dir.path().join("slow-hook.sh");
    std::fs::write(&script_path, "#!/bin/sh\nsleep 5\n").unwrap();
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(&script_path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script_path, perms).unwrap();
    let script: &'static str = Box::leak(script_path.to_string_lossy().into_owned().into_boxed_str());

    let hook: &'static HookDefinition = Box::leak(Box::new(HookDefinition {
        name: "fake-slow",
        program: script,
        args: &[],
        accepts_file_paths: false,
        file_extensions: &[],
        timeout_seconds: 1,
        classification: Classification::Analyzer,
        parser_id: "generic",
        json_flag: None,
        requires_lock: false,
        output_format_hint: OutputFormatHint::Text,
    }));

    let (cache, locks, parsers) = test_env(dir.path());
    let executor = HookExecutor::new(dir.path(), cache, locks, parsers);
    let settings = Settings::default();

    let result = executor.execute(hook, vec![], &settings).await.unwrap();
    assert_eq!(result.status, HookStatus::Timeout);
}
