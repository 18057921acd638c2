//! Docs build and lint harness.
//!
//! Thin orchestration over external tools: each step is an argv list from
//! configuration, run synchronously with inherited stdio so tool output goes
//! straight to the terminal.

use std::path::Path;
use std::process::Command;

use crate::config::BuildConfig;
use crate::error::{DocsSyncError, Result};
use crate::ui;

/// Run one external command, failing on a nonzero exit
fn run_step(argv: &[String], cwd: Option<&Path>, quiet: bool) -> Result<()> {
    let program = argv
        .first()
        .ok_or_else(|| DocsSyncError::config("Empty command in build configuration"))?;

    ui::status(quiet, &format!("Running {}", argv.join(" ")));

    let mut cmd = Command::new(program);
    cmd.args(&argv[1..]);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }

    let status = cmd
        .status()
        .map_err(|e| DocsSyncError::command(format!("Cannot run '{}': {}", program, e)))?;
    if !status.success() {
        return Err(DocsSyncError::command(format!(
            "'{}' exited with {}",
            argv.join(" "),
            status
        )));
    }
    Ok(())
}

/// Build the docs site: every configured step runs in the docsite directory
pub fn build_docs(config: &BuildConfig, root: &Path, quiet: bool) -> Result<()> {
    let docsite = root.join(&config.docsite_dir);
    for step in &config.docs_commands {
        run_step(step, Some(&docsite), quiet)?;
    }
    Ok(())
}

/// Run the configured lint steps at the repository root
///
/// All steps run even when earlier ones fail, so one run reports every
/// problem.
pub fn lint(config: &BuildConfig, root: &Path, quiet: bool) -> Result<()> {
    let mut failed = 0;
    for step in &config.lint_commands {
        if let Err(e) = run_step(step, Some(root), quiet) {
            ui::display_error(&e.to_string());
            failed += 1;
        }
    }

    if failed > 0 {
        Err(DocsSyncError::command(format!(
            "{} lint step(s) failed",
            failed
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[cfg(unix)]
    #[test]
    fn test_run_step_success() {
        run_step(&step(&["sh", "-c", "exit 0"]), None, true).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_run_step_failure() {
        let err = run_step(&step(&["sh", "-c", "exit 3"]), None, true).unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[test]
    fn test_run_step_empty_command() {
        assert!(run_step(&[], None, true).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_lint_counts_failures() {
        let config = BuildConfig {
            lint_commands: vec![
                step(&["sh", "-c", "exit 1"]),
                step(&["sh", "-c", "exit 0"]),
                step(&["sh", "-c", "exit 1"]),
            ],
            ..BuildConfig::default()
        };

        let err = lint(&config, Path::new("."), true).unwrap_err();
        assert!(err.to_string().contains("2 lint step(s) failed"));
    }
}
