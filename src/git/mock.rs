use crate::error::{DocsSyncError, Result};
use crate::git::{CommitInfo, Repository};
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    tags: HashMap<String, i64>,
    branches: HashMap<String, Vec<CommitInfo>>,
    created: Mutex<Vec<(String, String, String)>>,
    pushed: Mutex<Vec<(String, String)>>,
    fetches: Mutex<u32>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            tags: HashMap::new(),
            branches: HashMap::new(),
            created: Mutex::new(Vec::new()),
            pushed: Mutex::new(Vec::new()),
            fetches: Mutex::new(0),
        }
    }

    /// Add a tag with its timestamp
    pub fn add_tag(&mut self, name: impl Into<String>, time: i64) {
        self.tags.insert(name.into(), time);
    }

    /// Set a branch's history, newest first
    pub fn set_branch_commits(&mut self, branch: impl Into<String>, commits: Vec<CommitInfo>) {
        self.branches.insert(branch.into(), commits);
    }

    /// Tags created through the trait, as (name, target, message) triples
    pub fn created_tags(&self) -> Vec<(String, String, String)> {
        self.created.lock().unwrap().clone()
    }

    /// Tags pushed through the trait, as (remote, name) pairs
    pub fn pushed_tags(&self) -> Vec<(String, String)> {
        self.pushed.lock().unwrap().clone()
    }

    /// Number of fetches performed
    pub fn fetch_count(&self) -> u32 {
        *self.fetches.lock().unwrap()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let mut tags: Vec<String> = self.tags.keys().cloned().collect();
        tags.extend(
            self.created
                .lock()
                .unwrap()
                .iter()
                .map(|(name, _, _)| name.clone()),
        );
        Ok(tags)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_tags()?.iter().any(|t| t == name))
    }

    fn tag_time(&self, name: &str) -> Result<i64> {
        self.tags
            .get(name)
            .copied()
            .ok_or_else(|| DocsSyncError::tag(format!("Tag '{}' does not exist", name)))
    }

    fn branch_commits(&self, _remote: &str, branch: &str) -> Result<Vec<CommitInfo>> {
        self.branches
            .get(branch)
            .cloned()
            .ok_or_else(|| DocsSyncError::branch(format!("Branch '{}' not found", branch)))
    }

    fn resolve_commit(&self, refname: &str) -> Result<String> {
        let found = self
            .branches
            .values()
            .flatten()
            .any(|commit| commit.id == refname);
        if found {
            Ok(refname.to_string())
        } else {
            Err(DocsSyncError::branch(format!(
                "Cannot resolve '{}'",
                refname
            )))
        }
    }

    fn create_annotated_tag(&self, name: &str, target: &str, message: &str) -> Result<()> {
        self.created.lock().unwrap().push((
            name.to_string(),
            target.to_string(),
            message.to_string(),
        ));
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        self.pushed
            .lock()
            .unwrap()
            .push((remote.to_string(), name.to_string()));
        Ok(())
    }

    fn fetch(&self, _remote: &str) -> Result<()> {
        *self.fetches.lock().unwrap() += 1;
        Ok(())
    }
}
