//! Issue and pull request triage.
//!
//! Stateless per invocation: every action re-derives what it needs from the
//! ticket, its timeline and the event payload, and every mutation is guarded
//! so a re-run never duplicates a label or a boilerplate comment.

pub mod context;
pub mod templates;

pub use context::{event_info_from_env, TicketCtx, TicketKind};

use std::collections::HashMap;

use regex::Regex;

use crate::config::LabelerConfig;
use crate::domain::CodeOwners;
use crate::error::{DocsSyncError, Result};
use crate::github::GithubApi;

/// Options shared by the `label pr` and `label issue` commands
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    pub dry_run: bool,
    pub force_process_closed: bool,
    pub use_author_association: bool,
}

/// Add labels to a ticket unless they were ever applied before
pub fn add_label_if_new(ctx: &TicketCtx<'_>, labels: &[String]) -> Result<()> {
    let previously = ctx.previously_labeled()?;
    let new_labels: Vec<String> = labels
        .iter()
        .filter(|label| !previously.contains(*label))
        .cloned()
        .collect();
    if new_labels.is_empty() {
        return Ok(());
    }

    ctx.log(&format!("Adding labels {:?}", new_labels));
    if !ctx.dry_run {
        ctx.api.add_labels(ctx.ticket.number, &new_labels)?;
    }
    Ok(())
}

/// Post a boilerplate comment if it hasn't already been posted
///
/// Recognition is by the marker line every template ends with: if any
/// existing comment ends with the same marker, nothing is posted.
pub fn post_boilerplate_once(
    ctx: &TicketCtx<'_>,
    name: &str,
    substitutions: &[(&str, &str)],
) -> Result<()> {
    let body = templates::render(name, substitutions)?;
    let marker = templates::marker_line(&body)
        .ok_or_else(|| DocsSyncError::template(format!("Template '{}' has no marker", name)))?;

    for comment in ctx.api.comments(ctx.ticket.number)? {
        if comment.body.lines().last() == Some(marker) {
            ctx.log(&format!("{} boilerplate was already commented", name));
            return Ok(());
        }
    }

    ctx.log(&format!("Templating {} boilerplate", name));
    if !ctx.dry_run {
        ctx.api.create_comment(ctx.ticket.number, &body)?;
    }
    Ok(())
}

/// Apply labels derived from CODEOWNERS matches on the changed files
///
/// Each configured owner's labels are applied at most once; the file walk
/// stops early once every configured owner has matched.
pub fn handle_codeowner_labels(
    ctx: &TicketCtx<'_>,
    owners: &CodeOwners,
    owner_labels: &HashMap<String, Vec<String>>,
) -> Result<()> {
    let mut remaining = owner_labels.clone();
    if remaining.is_empty() {
        return Ok(());
    }

    for file in ctx.api.changed_files(ctx.ticket.number)? {
        for owner in owners.owners_of(&file.filename) {
            if let Some(labels) = remaining.remove(owner) {
                add_label_if_new(ctx, &labels)?;
            }
        }
        if remaining.is_empty() {
            return Ok(());
        }
    }
    Ok(())
}

/// New-contributor check via the author_association metadata
///
/// Only meaningful when authenticated as a regular user; app tokens report
/// associations differently.
fn is_new_contributor_by_association(ctx: &TicketCtx<'_>) -> bool {
    let association = ctx.author_association();
    ctx.log(&format!(
        "author_association is {}",
        association.as_deref().unwrap_or("(unset)")
    ));
    matches!(
        association.as_deref(),
        Some("FIRST_TIMER") | Some("FIRST_TIME_CONTRIBUTOR")
    )
}

/// New-contributor check via a search for the author's prior tickets
///
/// Searches closed tickets only: a new contributor opening several tickets
/// at once is welcomed on each rather than missed on all.
fn is_new_contributor_by_history(ctx: &TicketCtx<'_>) -> Result<bool> {
    let numbers = ctx
        .api
        .closed_ticket_numbers_by(&ctx.ticket.user.login)?;
    Ok(numbers
        .iter()
        .all(|number| *number == ctx.ticket.number))
}

/// Welcome a first-time contributor with a label and a comment
pub fn new_contributor_welcome(
    ctx: &TicketCtx<'_>,
    config: &LabelerConfig,
    use_author_association: bool,
) -> Result<()> {
    // Contributor has already been welcomed
    if ctx
        .previously_labeled()?
        .contains(&config.new_contributor_label)
    {
        return Ok(());
    }

    let is_new = if use_author_association {
        is_new_contributor_by_association(ctx)
    } else {
        is_new_contributor_by_history(ctx)?
    };
    if !is_new {
        return Ok(());
    }

    ctx.log("Welcoming new contributor");
    add_label_if_new(ctx, std::slice::from_ref(&config.new_contributor_label))?;
    post_boilerplate_once(ctx, "welcome", &[])
}

/// Ask for a description when a non-bot user files a ticket with no body
pub fn no_body_nag(ctx: &TicketCtx<'_>) -> Result<()> {
    if ctx.ticket.user.login.ends_with("[bot]")
        || !ctx
            .ticket
            .body
            .as_deref()
            .unwrap_or("")
            .trim()
            .is_empty()
    {
        return Ok(());
    }
    post_boilerplate_once(ctx, "no_body_nag", &[])
}

/// Warn when someone outside the release team changes guarded docs paths
pub fn warn_guarded_path_change(ctx: &TicketCtx<'_>, config: &LabelerConfig) -> Result<()> {
    let user = ctx.ticket.user.login.clone();
    if user.ends_with("[bot]") {
        return Ok(());
    }

    // A token without org permissions cannot list teams; treat that as an
    // empty team rather than aborting the run.
    let members = match ctx.api.team_members(&config.release_team) {
        Ok(members) => members,
        Err(_) => {
            ctx.log(&format!(
                "Failed to get members of {}",
                config.release_team
            ));
            Vec::new()
        }
    };
    if members.contains(&user) {
        return Ok(());
    }

    let pattern = Regex::new(&format!("^(?:{})$", config.guarded_path_pattern))
        .map_err(|e| DocsSyncError::config(format!("Invalid guarded path pattern: {}", e)))?;

    let matches: Vec<String> = ctx
        .api
        .changed_files(ctx.ticket.number)?
        .into_iter()
        .map(|file| file.filename)
        .filter(|filename| pattern.is_match(filename))
        .collect();
    if matches.is_empty() {
        return Ok(());
    }

    let listing = matches
        .iter()
        .map(|filename| format!("- `{}`", filename))
        .collect::<Vec<_>>()
        .join("\n");
    post_boilerplate_once(ctx, "guarded_path_changes", &[("changed_files", &listing)])
}

/// Run all pull request triage actions
pub fn process_pr(
    api: &dyn GithubApi,
    config: &LabelerConfig,
    owners: &CodeOwners,
    number: u64,
    options: &ProcessOptions,
) -> Result<()> {
    let ticket = api.get_pull_request(number)?;
    let ctx = TicketCtx::new(
        api,
        ticket,
        TicketKind::PullRequest,
        options.dry_run,
        event_info_from_env(),
    );

    if !options.force_process_closed && ctx.ticket.state != "open" {
        ctx.log("Refusing to process closed ticket");
        return Ok(());
    }

    handle_codeowner_labels(&ctx, owners, &config.owner_labels)?;
    new_contributor_welcome(&ctx, config, options.use_author_association)?;
    no_body_nag(&ctx)?;
    warn_guarded_path_change(&ctx, config)
}

/// Run all issue triage actions
pub fn process_issue(
    api: &dyn GithubApi,
    config: &LabelerConfig,
    number: u64,
    options: &ProcessOptions,
) -> Result<()> {
    let ticket = api.get_issue(number)?;
    let ctx = TicketCtx::new(
        api,
        ticket,
        TicketKind::Issue,
        options.dry_run,
        event_info_from_env(),
    );

    if !options.force_process_closed && ctx.ticket.state != "open" {
        ctx.log("Refusing to process closed ticket");
        return Ok(());
    }

    add_label_if_new(&ctx, std::slice::from_ref(&config.triage_label))?;
    new_contributor_welcome(&ctx, config, options.use_author_association)?;
    no_body_nag(&ctx)
}
