// Upstream subtree cloning against a local repository.
//
// These tests shell out to the `git` binary, like the cloner itself.

use std::fs;
use std::path::Path;

use git2::{Repository, Signature, Time};
use tempfile::TempDir;

use docs_sync::cloner;
use docs_sync::config::ClonerConfig;

/// Build a local "upstream" repository containing the allowlisted paths
fn setup_upstream() -> TempDir {
    let dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(dir.path()).expect("Could not init repo");

    fs::create_dir_all(dir.path().join("lib/tools")).unwrap();
    fs::write(dir.path().join("lib/tools/helper.py"), "print('hi')\n").unwrap();
    fs::write(dir.path().join("lib/__init__.py"), "").unwrap();
    fs::write(dir.path().join("setup.cfg"), "[metadata]\nname = upstream\n").unwrap();
    fs::write(dir.path().join("unrelated.txt"), "not copied\n").unwrap();

    let sig = Signature::new("Test User", "test@example.com", &Time::new(1000, 0)).unwrap();
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "upstream content", &tree, &[])
        .unwrap();

    dir
}

fn test_config(upstream: &Path) -> ClonerConfig {
    ClonerConfig {
        repo: upstream.to_str().unwrap().to_string(),
        keep_dirs: vec!["lib".to_string()],
        keep_files: vec!["setup.cfg".to_string()],
        ..ClonerConfig::default()
    }
}

#[test]
fn test_clone_copies_allowlisted_subtree() {
    let upstream = setup_upstream();
    let dest = TempDir::new().unwrap();
    let config = test_config(upstream.path());

    cloner::clone_upstream(&config, &config.repo, None, false, dest.path(), true).unwrap();

    assert!(dest.path().join("lib/tools/helper.py").is_file());
    assert!(dest.path().join("setup.cfg").is_file());
    // Copied directories are hidden from version control
    assert_eq!(
        fs::read_to_string(dest.path().join("lib/.gitignore")).unwrap(),
        "*"
    );
    // Paths outside the allowlist stay out
    assert!(!dest.path().join("unrelated.txt").exists());
}

#[test]
fn test_clone_replaces_stale_directory() {
    let upstream = setup_upstream();
    let dest = TempDir::new().unwrap();
    let config = test_config(upstream.path());

    fs::create_dir_all(dest.path().join("lib")).unwrap();
    fs::write(dest.path().join("lib/stale.py"), "old\n").unwrap();

    cloner::clone_upstream(&config, &config.repo, None, false, dest.path(), true).unwrap();

    assert!(!dest.path().join("lib/stale.py").exists());
    assert!(dest.path().join("lib/tools/helper.py").is_file());
}

#[test]
fn test_check_mode_skips_when_current() {
    let upstream = setup_upstream();
    let dest = TempDir::new().unwrap();
    let config = test_config(upstream.path());

    cloner::clone_upstream(&config, &config.repo, None, false, dest.path(), true).unwrap();

    // An unusable repo URL proves the second run never clones
    cloner::clone_upstream(&config, "/nonexistent/repo", None, true, dest.path(), true).unwrap();
}

#[test]
fn test_missing_allowlisted_dir_is_fatal() {
    let upstream = setup_upstream();
    let dest = TempDir::new().unwrap();
    let mut config = test_config(upstream.path());
    config.keep_dirs.push("packaging".to_string());

    let err = cloner::clone_upstream(&config, &config.repo, None, false, dest.path(), true)
        .unwrap_err();
    assert!(err.to_string().contains("packaging"));
}

#[test]
fn test_clone_failure_is_fatal() {
    let dest = TempDir::new().unwrap();
    let config = ClonerConfig::default();

    let err = cloner::clone_upstream(
        &config,
        "/nonexistent/repo",
        None,
        false,
        dest.path(),
        true,
    )
    .unwrap_err();
    assert!(err.to_string().contains("git clone"));
}
