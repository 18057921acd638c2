// Configuration loading from explicit paths and defaults.

use std::fs;

use docs_sync::config::{load_config, Config};

#[test]
fn test_load_config_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docs-sync.toml");
    fs::write(
        &path,
        r#"
[tagger]
branches = ["stable-3.0"]
remote = "upstream"

[cloner]
repo = "https://example.invalid/upstream.git"
keep_dirs = ["lib"]

[labeler]
owner = "example-org"
repo = "example-docs"

[labeler.owner_labels]
"@example/steering-committee" = ["sc_approval"]
"#,
    )
    .unwrap();

    let config = load_config(path.to_str()).unwrap();
    assert_eq!(config.tagger.branches, vec!["stable-3.0".to_string()]);
    assert_eq!(config.tagger.remote, "upstream");
    assert_eq!(config.cloner.repo, "https://example.invalid/upstream.git");
    assert_eq!(config.cloner.keep_dirs, vec!["lib".to_string()]);
    // Unset fields keep their defaults
    assert_eq!(config.cloner.branch_file, "docs/upstream-branch.txt");
    assert_eq!(
        config.labeler.owner_labels["@example/steering-committee"],
        vec!["sc_approval".to_string()]
    );
}

#[test]
fn test_load_config_missing_explicit_path_fails() {
    assert!(load_config(Some("/nonexistent/docs-sync.toml")).is_err());
}

#[test]
fn test_load_config_invalid_toml_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[tagger\nbranches = ").unwrap();

    let err = load_config(path.to_str()).unwrap_err();
    assert!(err.to_string().contains("Cannot parse config"));
}

#[test]
fn test_default_config_is_complete() {
    let config = Config::default();
    assert!(!config.tagger.branches.is_empty());
    assert!(!config.cloner.keep_dirs.is_empty());
    assert!(!config.cloner.keep_files.is_empty());
    assert!(!config.build.docs_commands.is_empty());
    assert!(config.labeler.api_url.starts_with("https://"));
}
