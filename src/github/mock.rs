use std::sync::Mutex;

use crate::error::{DocsSyncError, Result};
use crate::github::{Account, ChangedFile, Comment, GithubApi, IssueEvent, Label, Ticket};

/// Mock GitHub API for testing the labeler without network access
///
/// Holds one ticket; mutations are recorded so tests can assert exactly
/// which API calls a run would have issued.
pub struct MockGithub {
    ticket: Ticket,
    files: Vec<ChangedFile>,
    events: Vec<IssueEvent>,
    comments: Mutex<Vec<Comment>>,
    author_tickets: Vec<u64>,
    team_members: Option<Vec<String>>,
    labels_added: Mutex<Vec<String>>,
    seeded_comments: usize,
}

impl MockGithub {
    /// Create a mock around an open ticket by the given author
    pub fn new(number: u64, author: &str, body: Option<&str>) -> Self {
        MockGithub {
            ticket: Ticket {
                number,
                state: "open".to_string(),
                body: body.map(|s| s.to_string()),
                user: Account {
                    login: author.to_string(),
                },
                author_association: None,
            },
            files: Vec::new(),
            events: Vec::new(),
            comments: Mutex::new(Vec::new()),
            author_tickets: Vec::new(),
            team_members: Some(Vec::new()),
            labels_added: Mutex::new(Vec::new()),
            seeded_comments: 0,
        }
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.ticket.state = state.to_string();
        self
    }

    pub fn with_author_association(mut self, association: &str) -> Self {
        self.ticket.author_association = Some(association.to_string());
        self
    }

    pub fn with_changed_files(mut self, filenames: &[&str]) -> Self {
        self.files = filenames
            .iter()
            .map(|f| ChangedFile {
                filename: f.to_string(),
            })
            .collect();
        self
    }

    /// Seed the timeline with past label events
    pub fn with_label_history(mut self, labels: &[&str]) -> Self {
        self.events = labels
            .iter()
            .map(|name| IssueEvent {
                event: "labeled".to_string(),
                label: Some(Label {
                    name: name.to_string(),
                }),
            })
            .collect();
        self
    }

    pub fn with_existing_comment(mut self, body: &str) -> Self {
        self.comments.lock().unwrap().push(Comment {
            body: body.to_string(),
        });
        self.seeded_comments += 1;
        self
    }

    /// Closed tickets the author already has in this repository
    pub fn with_author_tickets(mut self, numbers: &[u64]) -> Self {
        self.author_tickets = numbers.to_vec();
        self
    }

    pub fn with_team_members(mut self, members: &[&str]) -> Self {
        self.team_members = Some(members.iter().map(|m| m.to_string()).collect());
        self
    }

    /// Make team membership lookups fail, like a token without org scope
    pub fn with_failing_team_lookup(mut self) -> Self {
        self.team_members = None;
        self
    }

    /// Labels added through the trait
    pub fn labels_added(&self) -> Vec<String> {
        self.labels_added.lock().unwrap().clone()
    }

    /// Comments created through the trait (seeded comments excluded)
    pub fn comment_count(&self) -> usize {
        self.comments.lock().unwrap().len() - self.seeded_comments
    }
}

impl GithubApi for MockGithub {
    fn get_issue(&self, _number: u64) -> Result<Ticket> {
        Ok(self.ticket.clone())
    }

    fn get_pull_request(&self, _number: u64) -> Result<Ticket> {
        Ok(self.ticket.clone())
    }

    fn changed_files(&self, _number: u64) -> Result<Vec<ChangedFile>> {
        Ok(self.files.clone())
    }

    fn issue_events(&self, _number: u64) -> Result<Vec<IssueEvent>> {
        Ok(self.events.clone())
    }

    fn comments(&self, _number: u64) -> Result<Vec<Comment>> {
        Ok(self.comments.lock().unwrap().clone())
    }

    fn add_labels(&self, _number: u64, labels: &[String]) -> Result<()> {
        self.labels_added.lock().unwrap().extend_from_slice(labels);
        Ok(())
    }

    fn create_comment(&self, _number: u64, body: &str) -> Result<()> {
        self.comments.lock().unwrap().push(Comment {
            body: body.to_string(),
        });
        Ok(())
    }

    fn closed_ticket_numbers_by(&self, _author: &str) -> Result<Vec<u64>> {
        Ok(self.author_tickets.clone())
    }

    fn team_members(&self, team: &str) -> Result<Vec<String>> {
        self.team_members
            .clone()
            .ok_or_else(|| DocsSyncError::github(format!("Team '{}' lookup failed", team)))
    }
}
