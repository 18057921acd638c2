use std::cell::OnceCell;
use std::collections::HashSet;

use crate::error::Result;
use crate::github::{GithubApi, Ticket};

/// Which kind of ticket a labeler run is processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    Issue,
    PullRequest,
}

impl TicketKind {
    /// Key of this ticket in a workflow event payload
    pub fn event_key(&self) -> &'static str {
        match self {
            TicketKind::Issue => "issue",
            TicketKind::PullRequest => "pull_request",
        }
    }
}

/// Per-run context for labeler actions
///
/// Wraps the API handle, the ticket under triage and the event payload that
/// triggered the run. The previously-applied label set is computed from the
/// ticket timeline once and cached.
pub struct TicketCtx<'a> {
    pub api: &'a dyn GithubApi,
    pub ticket: Ticket,
    pub kind: TicketKind,
    pub dry_run: bool,
    pub event_info: serde_json::Value,
    previously_labeled: OnceCell<HashSet<String>>,
}

impl<'a> TicketCtx<'a> {
    pub fn new(
        api: &'a dyn GithubApi,
        ticket: Ticket,
        kind: TicketKind,
        dry_run: bool,
        event_info: serde_json::Value,
    ) -> Self {
        TicketCtx {
            api,
            ticket,
            kind,
            dry_run,
            event_info,
            previously_labeled: OnceCell::new(),
        }
    }

    /// Log a line prefixed with the ticket number
    pub fn log(&self, message: &str) {
        println!("{}: {}", self.ticket.number, message);
    }

    /// Labels that were ever applied to this ticket
    ///
    /// Includes labels that were later removed: a label someone took off must
    /// not come back on the next labeler run.
    pub fn previously_labeled(&self) -> Result<&HashSet<String>> {
        if let Some(labels) = self.previously_labeled.get() {
            return Ok(labels);
        }

        let mut labels = HashSet::new();
        for event in self.api.issue_events(self.ticket.number)? {
            if event.event == "labeled" || event.event == "unlabeled" {
                if let Some(label) = event.label {
                    labels.insert(label.name);
                }
            }
        }
        Ok(self.previously_labeled.get_or_init(|| labels))
    }

    /// The ticket's author association from the event payload, falling back
    /// to the API object
    pub fn author_association(&self) -> Option<String> {
        self.event_info
            .get(self.kind.event_key())
            .and_then(|member| member.get("author_association"))
            .and_then(|value| value.as_str())
            .map(String::from)
            .or_else(|| self.ticket.author_association.clone())
    }
}

/// Load workflow event data from the `event_json` environment variable
///
/// Missing or malformed JSON degrades to an empty payload.
pub fn event_info_from_env() -> serde_json::Value {
    std::env::var("event_json")
        .ok()
        .filter(|s| !s.is_empty())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(serde_json::Value::Null)
}
