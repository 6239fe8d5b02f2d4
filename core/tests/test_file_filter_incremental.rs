//! `FileFilter::files_for_scan` boundary behaviors against a real git repo
//! (`spec.md` §4.1, §8 boundary behaviors): an empty diff stays empty, and
//! an `Auto`-scope diff at or past the threshold upgrades to a full scan.

use crackerjack_core::file_filter::{FileFilter, Scope};
use crackerjack_testutils::TestRepo;

#[test]
fn incremental_scope_with_no_changes_since_head_is_empty() {
    let repo = TestRepo::init();
    let filter = FileFilter::new(repo.path());
    let set = filter.files_for_scan(Scope::Incremental, 50, "HEAD");
    assert!(set.is_empty());
    assert!(!set.upgraded_to_full);
}

#[test]
fn incremental_scope_reports_only_changed_files() {
    let repo = TestRepo::init();
    repo.write_file("a.py", "print('a')\n");
    repo.write_file("b.py", "print('b')\n");
    repo.commit_all("add two files");
    repo.write_file("a.py", "print('a changed')\n");
    repo.commit_all("change a only");

    let filter = FileFilter::new(repo.path());
    let set = filter.files_for_scan(Scope::Incremental, 50, "HEAD~1");
    assert_eq!(set.files, vec!["a.py".to_string()]);
    assert!(!set.upgraded_to_full);
}

#[test]
fn auto_scope_upgrades_to_full_scan_at_the_threshold() {
    let repo = TestRepo::init();
    for i in 0..5 {
        repo.write_file(&format!("file_{i}.py"), "x = 1\n");
    }
    repo.commit_all("add five files");

    let filter = FileFilter::new(repo.path());
    // Threshold of 3: the 5-file diff against the initial commit must
    // upgrade rather than scan only the changed set.
    let set = filter.files_for_scan(Scope::Auto, 3, "HEAD~1");
    assert!(set.upgraded_to_full);
    // A full scan also picks up the repo's own `.gitkeep` from `TestRepo::init`.
    assert!(set.files.len() >= 5);
}

#[test]
fn auto_scope_stays_incremental_below_the_threshold() {
    let repo = TestRepo::init();
    repo.write_file("only_changed.py", "x = 1\n");
    repo.commit_all("one change");

    let filter = FileFilter::new(repo.path());
    let set = filter.files_for_scan(Scope::Auto, 50, "HEAD~1");
    assert!(!set.upgraded_to_full);
    assert_eq!(set.files, vec!["only_changed.py".to_string()]);
}

#[test]
fn full_scope_ignores_git_history_entirely() {
    let repo = TestRepo::init();
    repo.write_file("untracked.py", "x = 1\n");
    // Deliberately never committed.

    let filter = FileFilter::new(repo.path());
    let set = filter.files_for_scan(Scope::Full, 50, "HEAD");
    assert!(set.files.contains(&"untracked.py".to_string()));
    assert!(!set.upgraded_to_full);
}
