//! Tag synchronization between the upstream repository and the docs repo.
//!
//! Release tags created upstream are mirrored here as annotated tags pointing
//! at the docs commit that was current when upstream released.

use std::collections::HashSet;

use crate::domain::{series_branch, v_prefix, MessageTemplate, Version};
use crate::error::{DocsSyncError, Result};
use crate::git::{CommitInfo, Repository};
use crate::ui;

/// The `major.minor` series of a `stable-X.Y` branch name
pub fn branch_series(branch: &str) -> &str {
    branch.strip_prefix("stable-").unwrap_or(branch)
}

/// Tags belonging to a series, sorted newest first by parsed version
///
/// Tag names that do not parse as release versions are skipped; they can
/// never correspond to an upstream release.
pub fn filter_tags(tags: &[String], series: &str) -> Vec<(String, Version)> {
    let mut filtered: Vec<(String, Version)> = tags
        .iter()
        .filter_map(|tag| Version::parse(tag).ok().map(|v| (tag.clone(), v)))
        .filter(|(_, version)| version.series() == series)
        .collect();
    filtered.sort_by(|a, b| b.1.cmp(&a.1));
    filtered
}

/// Upstream tags of a branch's series not yet mirrored locally, newest first
///
/// Walks upstream tags newest to oldest and stops at the first tag that is
/// already mirrored; everything collected before that point is the gap.
pub fn missing_tags(upstream_tags: &[String], docs_tags: &[String], branch: &str) -> Vec<String> {
    let series = branch_series(branch);
    let ours: HashSet<String> = filter_tags(docs_tags, series)
        .into_iter()
        .map(|(tag, _)| tag)
        .collect();

    let mut missing = Vec::new();
    for (tag, _) in filter_tags(upstream_tags, series) {
        if ours.contains(&tag) {
            break;
        }
        missing.push(tag);
    }
    missing
}

/// First commit (walking newest first) committed at or before `before`
pub fn last_commit_before(commits: &[CommitInfo], before: i64) -> Result<&CommitInfo> {
    commits
        .iter()
        .find(|commit| commit.time <= before)
        .ok_or_else(|| DocsSyncError::branch("No commit found before the release time"))
}

/// A fully resolved tag to create: which branch it came from, the tag name
/// and the docs commit it will point at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPlan {
    pub branch: String,
    pub tag: String,
    pub target: String,
}

/// Tag synchronization over a docs and an upstream repository
pub struct Tagger<'a> {
    pub docs: &'a dyn Repository,
    pub upstream: &'a dyn Repository,
    pub docs_remote: String,
    pub upstream_remote: String,
    pub message: MessageTemplate,
    pub quiet: bool,
}

impl<'a> Tagger<'a> {
    /// Fetch both remotes so tag sets and branch histories are current
    pub fn fetch_all(&self) -> Result<()> {
        ui::status(
            self.quiet,
            &format!("Fetching {} from docs repo...", self.docs_remote),
        );
        self.docs.fetch(&self.docs_remote)?;
        ui::status(
            self.quiet,
            &format!("Fetching {} from upstream repo...", self.upstream_remote),
        );
        self.upstream.fetch(&self.upstream_remote)?;
        Ok(())
    }

    /// Upstream tags on `branch`'s series that are not yet tagged here
    pub fn new_tags(&self, branch: &str) -> Result<Vec<String>> {
        let upstream_tags = self.upstream.list_tags()?;
        let docs_tags = self.docs.list_tags()?;
        Ok(missing_tags(&upstream_tags, &docs_tags, branch))
    }

    /// Resolve the branch/tag/target triple for one tag
    ///
    /// The tag gets its `v` prefix, the branch defaults to the tag's
    /// `stable-X.Y` series, and the target (when not given) is the last docs
    /// commit before the upstream release time. The upstream tag must exist
    /// before anything else is attempted.
    pub fn resolve(
        &self,
        branch: Option<&str>,
        tag: &str,
        target: Option<&str>,
    ) -> Result<TagPlan> {
        let tag = v_prefix(tag);
        let branch = match branch {
            Some(b) => b.to_string(),
            None => series_branch(&tag)?,
        };

        if !self.upstream.tag_exists(&tag)? {
            return Err(DocsSyncError::tag(format!(
                "Tag {} does not exist upstream!",
                tag
            )));
        }

        let target = match target {
            Some(t) => self.docs.resolve_commit(t)?,
            None => {
                let released_at = self.upstream.tag_time(&tag)?;
                let commits = self.docs.branch_commits(&self.docs_remote, &branch)?;
                last_commit_before(&commits, released_at)
                    .map_err(|_| {
                        DocsSyncError::branch(format!(
                            "No commit found on '{}' before the {} release time",
                            branch, tag
                        ))
                    })?
                    .id
                    .clone()
            }
        };

        Ok(TagPlan {
            branch,
            tag,
            target,
        })
    }

    /// Create (and optionally push) a tag with the snapshot message
    pub fn create_tag(&self, plan: &TagPlan, push: bool) -> Result<()> {
        let message = self.message.render(&plan.tag, &plan.branch)?;
        ui::status(
            self.quiet,
            &format!("Tagging {} as {}", plan.target, plan.tag),
        );
        self.docs
            .create_annotated_tag(&plan.tag, &plan.target, &message)?;
        if push {
            println!("Pushing {} to {}", plan.tag, self.docs_remote);
            self.docs.push_tag(&self.docs_remote, &plan.tag)?;
        }
        Ok(())
    }

    /// Mirror every missing tag for the given branches
    ///
    /// All tags are resolved before any tag is created, so a bad tag aborts
    /// the run without leaving a partial sync behind.
    pub fn sync(&self, branches: &[String], push: bool) -> Result<Vec<TagPlan>> {
        let mut plans = Vec::new();
        for branch in branches {
            for tag in self.new_tags(branch)? {
                plans.push(self.resolve(Some(branch), &tag, None)?);
            }
        }

        for plan in &plans {
            self.create_tag(plan, push)?;
        }
        Ok(plans)
    }
}
