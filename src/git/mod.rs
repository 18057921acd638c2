//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over Git operations,
//! allowing for multiple implementations including real Git repositories
//! and mock implementations for testing.
//!
//! Most code should depend on the [Repository] trait rather than concrete
//! implementations:
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockRepository]: in-memory implementation for tests

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Commit information for history traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit id
    pub id: String,
    /// First line of the commit message
    pub summary: String,
    /// Committed time as seconds since the Unix epoch
    pub time: i64,
}

/// Common git operation trait for abstraction
///
/// Implementations map their underlying errors (like `git2::Error`) to the
/// appropriate [crate::error::DocsSyncError] variants.
pub trait Repository: Send + Sync {
    /// Get all tag names in the repository
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Whether a tag exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Timestamp of a tag as seconds since the Unix epoch
    ///
    /// For an annotated tag this is the tagged time; for a lightweight tag
    /// it falls back to the tagged commit's committed time.
    fn tag_time(&self, name: &str) -> Result<i64>;

    /// First-parent history of a branch, newest first
    ///
    /// Resolves `refs/remotes/<remote>/<branch>` when the remote-tracking
    /// reference exists, falling back to the local branch.
    fn branch_commits(&self, remote: &str, branch: &str) -> Result<Vec<CommitInfo>>;

    /// Resolve a reference or commit id to a full commit id
    fn resolve_commit(&self, refname: &str) -> Result<String>;

    /// Create an annotated tag pointing at `target` (a commit id or ref)
    fn create_annotated_tag(&self, name: &str, target: &str, message: &str) -> Result<()>;

    /// Push a tag to a remote
    fn push_tag(&self, remote: &str, name: &str) -> Result<()>;

    /// Fetch branches and tags from a remote
    fn fetch(&self, remote: &str) -> Result<()>;
}
