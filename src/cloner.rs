//! Upstream subtree cloner.
//!
//! Copies an allowlisted set of directories and files from a fresh shallow
//! clone of the upstream repository into the docs working tree so the docs
//! site can be built locally. Copied directories are marked ignored for
//! version control.

use std::fs;
use std::path::Path;
use std::process::Command;

use crate::config::ClonerConfig;
use crate::error::{DocsSyncError, Result};
use crate::ui;

/// Read the upstream branch name from the branch file in the docs tree
pub fn default_branch(branch_file: &Path) -> Result<String> {
    let content = fs::read_to_string(branch_file).map_err(|e| {
        DocsSyncError::config(format!(
            "Cannot read branch file '{}': {}",
            branch_file.display(),
            e
        ))
    })?;
    Ok(content.trim().to_string())
}

/// Whether every allowlisted directory and file already exists under `dest`
pub fn looks_current(config: &ClonerConfig, dest: &Path) -> bool {
    config
        .keep_dirs
        .iter()
        .map(|d| dest.join(d))
        .all(|p| p.is_dir())
        && config
            .keep_files
            .iter()
            .map(|f| dest.join(f))
            .all(|p| p.is_file())
}

/// Clone the upstream repository and copy the allowlisted subtree into `dest`
///
/// With `check` set, the operation short-circuits when all expected paths
/// already exist. `branch` of `None` clones the remote default branch.
pub fn clone_upstream(
    config: &ClonerConfig,
    repo_url: &str,
    branch: Option<&str>,
    check: bool,
    dest: &Path,
    quiet: bool,
) -> Result<()> {
    if check && looks_current(config, dest) {
        ui::status(quiet, "Upstream subtree already present, skipping clone");
        return Ok(());
    }

    if repo_url.is_empty() {
        return Err(DocsSyncError::config(
            "No upstream repository configured; set cloner.repo or pass --repo",
        ));
    }

    let temp_dir = tempfile::tempdir()?;

    let mut cmd = Command::new("git");
    cmd.arg("clone").arg(repo_url).arg("--depth=1");
    if let Some(branch) = branch {
        cmd.arg(format!("--branch={}", branch));
    }
    cmd.arg(temp_dir.path());

    let status = cmd.status().map_err(|e| {
        DocsSyncError::clone_error(format!("Cannot run git clone: {}", e))
    })?;
    if !status.success() {
        return Err(DocsSyncError::clone_error(format!(
            "git clone of '{}' failed with {}",
            repo_url, status
        )));
    }

    for keep_dir in &config.keep_dirs {
        let src = temp_dir.path().join(keep_dir);
        let dst = dest.join(keep_dir);

        ui::status(quiet, &format!("Updating '{}' ...", keep_dir));

        if !src.is_dir() {
            return Err(DocsSyncError::clone_error(format!(
                "Directory '{}' is missing from the upstream clone",
                keep_dir
            )));
        }
        if dst.exists() {
            fs::remove_dir_all(&dst)?;
        }
        copy_tree(&src, &dst)?;

        // Keep the copied tree out of version control
        fs::write(dst.join(".gitignore"), "*")?;
    }

    for keep_file in &config.keep_files {
        let src = temp_dir.path().join(keep_file);
        let dst = dest.join(keep_file);

        ui::status(quiet, &format!("Updating '{}' ...", keep_file));

        if !src.is_file() {
            return Err(DocsSyncError::clone_error(format!(
                "File '{}' is missing from the upstream clone",
                keep_file
            )));
        }
        fs::copy(&src, &dst)?;
    }

    Ok(())
}

/// Recursively copy a directory tree, preserving symlinks as symlinks
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = fs::symlink_metadata(&src_path)?.file_type();

        if file_type.is_symlink() {
            copy_symlink(&src_path, &dst_path)?;
        } else if file_type.is_dir() {
            copy_tree(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dst)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    // Symlinks need special privileges here; fall back to copying the target
    fs::copy(src, dst)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_branch_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let branch_file = dir.path().join("upstream-branch.txt");
        fs::write(&branch_file, "stable-2.18\n").unwrap();

        assert_eq!(default_branch(&branch_file).unwrap(), "stable-2.18");
    }

    #[test]
    fn test_default_branch_missing_file() {
        assert!(default_branch(Path::new("/nonexistent/branch.txt")).is_err());
    }

    #[test]
    fn test_copy_tree_recursive() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("sub/deeper")).unwrap();
        fs::write(src.path().join("top.txt"), "top").unwrap();
        fs::write(src.path().join("sub/deeper/leaf.txt"), "leaf").unwrap();

        let target = dst.path().join("copied");
        copy_tree(src.path(), &target).unwrap();

        assert_eq!(fs::read_to_string(target.join("top.txt")).unwrap(), "top");
        assert_eq!(
            fs::read_to_string(target.join("sub/deeper/leaf.txt")).unwrap(),
            "leaf"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_tree_preserves_symlinks() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::write(src.path().join("real.txt"), "data").unwrap();
        std::os::unix::fs::symlink("real.txt", src.path().join("link.txt")).unwrap();

        let target = dst.path().join("copied");
        copy_tree(src.path(), &target).unwrap();

        let meta = fs::symlink_metadata(target.join("link.txt")).unwrap();
        assert!(meta.file_type().is_symlink());
    }

    #[test]
    fn test_looks_current() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClonerConfig {
            keep_dirs: vec!["lib".to_string()],
            keep_files: vec!["setup.cfg".to_string()],
            ..ClonerConfig::default()
        };

        assert!(!looks_current(&config, dir.path()));

        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("setup.cfg"), "").unwrap();
        assert!(looks_current(&config, dir.path()));
    }

    #[test]
    fn test_check_mode_short_circuits_without_repo() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClonerConfig {
            keep_dirs: vec!["lib".to_string()],
            keep_files: vec![],
            ..ClonerConfig::default()
        };
        fs::create_dir_all(dir.path().join("lib")).unwrap();

        // No repo URL configured, but check mode never reaches the clone
        clone_upstream(&config, "", None, true, dir.path(), true).unwrap();
    }

    #[test]
    fn test_missing_repo_url_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClonerConfig::default();
        let err = clone_upstream(&config, "", None, false, dir.path(), true).unwrap_err();
        assert!(err.to_string().contains("No upstream repository"));
    }
}
