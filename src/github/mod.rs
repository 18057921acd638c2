//! GitHub REST abstraction layer
//!
//! Same shape as the git layer: a trait most code depends on, a real
//! implementation ([client::HttpGithub]) and an in-memory one
//! ([mock::MockGithub]) for tests. All calls are scoped to a single
//! owner/repo pair fixed at construction time.

pub mod client;
pub mod mock;

pub use client::HttpGithub;
pub use mock::MockGithub;

use serde::Deserialize;

use crate::error::Result;

/// A GitHub user or organization account
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub login: String,
}

/// An issue or pull request as returned by the API
///
/// Pull requests deserialize into the same shape; the labeler only needs the
/// fields both share.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    pub number: u64,
    pub state: String,
    #[serde(default)]
    pub body: Option<String>,
    pub user: Account,
    #[serde(default)]
    pub author_association: Option<String>,
}

/// A label attached to a ticket
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Label {
    pub name: String,
}

/// An entry from a ticket's event timeline
#[derive(Debug, Clone, Deserialize)]
pub struct IssueEvent {
    pub event: String,
    #[serde(default)]
    pub label: Option<Label>,
}

/// A comment on a ticket
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub body: String,
}

/// A file changed by a pull request
#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
}

/// GitHub operations the labeler needs, scoped to one repository
pub trait GithubApi: Send + Sync {
    /// Fetch an issue
    fn get_issue(&self, number: u64) -> Result<Ticket>;

    /// Fetch a pull request
    fn get_pull_request(&self, number: u64) -> Result<Ticket>;

    /// Files changed by a pull request
    fn changed_files(&self, number: u64) -> Result<Vec<ChangedFile>>;

    /// Label events from a ticket's timeline (labeled and unlabeled)
    fn issue_events(&self, number: u64) -> Result<Vec<IssueEvent>>;

    /// All comments on a ticket
    fn comments(&self, number: u64) -> Result<Vec<Comment>>;

    /// Attach labels to a ticket
    fn add_labels(&self, number: u64, labels: &[String]) -> Result<()>;

    /// Post a comment on a ticket
    fn create_comment(&self, number: u64, body: &str) -> Result<()>;

    /// Numbers of closed tickets in this repository opened by `author`
    fn closed_ticket_numbers_by(&self, author: &str) -> Result<Vec<u64>>;

    /// Logins of the members of an organization team
    fn team_members(&self, team: &str) -> Result<Vec<String>>;
}
