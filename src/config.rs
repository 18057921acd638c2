use crate::error::{DocsSyncError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Represents the complete configuration for docs-sync.
///
/// Contains the tag syncer, upstream cloner, labeler and build harness
/// sections. Every field has a default so a missing or partial config file
/// still produces a working tool.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub tagger: TaggerConfig,

    #[serde(default)]
    pub cloner: ClonerConfig,

    #[serde(default)]
    pub labeler: LabelerConfig,

    #[serde(default)]
    pub build: BuildConfig,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_upstream_path() -> String {
    "../upstream".to_string()
}

/// Returns the default list of release branches scanned for new tags.
fn default_active_branches() -> Vec<String> {
    vec![
        "stable-2.16".to_string(),
        "stable-2.17".to_string(),
        "stable-2.18".to_string(),
    ]
}

fn default_message_template() -> String {
    crate::domain::MessageTemplate::snapshot_default().template
}

/// Configuration for the tag synchronization commands.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TaggerConfig {
    #[serde(default = "default_active_branches")]
    pub branches: Vec<String>,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_upstream_path")]
    pub upstream_path: String,

    #[serde(default = "default_message_template")]
    pub message_template: String,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        TaggerConfig {
            branches: default_active_branches(),
            remote: default_remote(),
            upstream_path: default_upstream_path(),
            message_template: default_message_template(),
        }
    }
}

fn default_branch_file() -> String {
    "docs/upstream-branch.txt".to_string()
}

/// Returns the default upstream directories copied into the working tree.
fn default_keep_dirs() -> Vec<String> {
    vec![
        "bin".to_string(),
        "lib".to_string(),
        "packaging".to_string(),
        "test/lib".to_string(),
    ]
}

/// Returns the default upstream files copied into the working tree.
fn default_keep_files() -> Vec<String> {
    vec![
        "MANIFEST.in".to_string(),
        "pyproject.toml".to_string(),
        "requirements.txt".to_string(),
        "setup.cfg".to_string(),
        "setup.py".to_string(),
    ]
}

/// Configuration for the upstream subtree cloner.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClonerConfig {
    /// Upstream repository URL; may also be supplied with `--repo`
    #[serde(default)]
    pub repo: String,

    /// File in the docs tree naming the upstream branch to clone
    #[serde(default = "default_branch_file")]
    pub branch_file: String,

    #[serde(default = "default_keep_dirs")]
    pub keep_dirs: Vec<String>,

    #[serde(default = "default_keep_files")]
    pub keep_files: Vec<String>,
}

impl Default for ClonerConfig {
    fn default() -> Self {
        ClonerConfig {
            repo: String::new(),
            branch_file: default_branch_file(),
            keep_dirs: default_keep_dirs(),
            keep_files: default_keep_files(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_codeowners_path() -> String {
    ".github/CODEOWNERS".to_string()
}

fn default_new_contributor_label() -> String {
    "new_contributor".to_string()
}

fn default_triage_label() -> String {
    "needs_triage".to_string()
}

fn default_guarded_path_pattern() -> String {
    // Community porting guides, but not core porting guides
    r"docs/docsite/rst/porting_guides/porting_guide_\d.*\.rst".to_string()
}

fn default_release_team() -> String {
    "release-management-wg".to_string()
}

/// Configuration for the issue/PR labeler.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LabelerConfig {
    /// Repository owner (organization or user); may be supplied with `--owner`
    #[serde(default)]
    pub owner: String,

    /// Repository name; may be supplied with `--repo`
    #[serde(default)]
    pub repo: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_codeowners_path")]
    pub codeowners_path: String,

    #[serde(default = "default_new_contributor_label")]
    pub new_contributor_label: String,

    #[serde(default = "default_triage_label")]
    pub triage_label: String,

    /// Labels applied when a changed file is owned by the given owner token
    #[serde(default)]
    pub owner_labels: HashMap<String, Vec<String>>,

    /// Paths that trigger a warning comment when changed by outsiders
    #[serde(default = "default_guarded_path_pattern")]
    pub guarded_path_pattern: String,

    /// Team whose members may change guarded paths without a warning
    #[serde(default = "default_release_team")]
    pub release_team: String,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        LabelerConfig {
            owner: String::new(),
            repo: String::new(),
            api_url: default_api_url(),
            codeowners_path: default_codeowners_path(),
            new_contributor_label: default_new_contributor_label(),
            triage_label: default_triage_label(),
            owner_labels: HashMap::new(),
            guarded_path_pattern: default_guarded_path_pattern(),
            release_team: default_release_team(),
        }
    }
}

fn default_docsite_dir() -> String {
    "docs/docsite".to_string()
}

/// Returns the default docs build steps, run inside the docsite directory.
fn default_docs_commands() -> Vec<Vec<String>> {
    vec![
        vec!["make".to_string(), "clean".to_string()],
        vec!["make".to_string(), "html".to_string()],
    ]
}

/// Returns the default lint steps, run at the repository root.
fn default_lint_commands() -> Vec<Vec<String>> {
    vec![vec![
        "codespell".to_string(),
        "docs/docsite".to_string(),
    ]]
}

/// Configuration for the docs build/lint harness.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BuildConfig {
    #[serde(default = "default_docsite_dir")]
    pub docsite_dir: String,

    #[serde(default = "default_docs_commands")]
    pub docs_commands: Vec<Vec<String>>,

    #[serde(default = "default_lint_commands")]
    pub lint_commands: Vec<Vec<String>>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            docsite_dir: default_docsite_dir(),
            docs_commands: default_docs_commands(),
            lint_commands: default_lint_commands(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `docs-sync.toml` in current directory
/// 3. `docs-sync.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./docs-sync.toml").exists() {
        fs::read_to_string("./docs-sync.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("docs-sync.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| DocsSyncError::config(format!("Cannot parse config: {}", e)))?;
    Ok(config)
}
