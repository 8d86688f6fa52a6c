//! Done tickets must not have pull requests still open on GitHub.

use async_trait::async_trait;

use super::{jql_list, DONE_STATUSES};
use crate::adf::{Inline, Mark};
use crate::config::Config;
use crate::error::{PatrolError, Result};
use crate::notice::Notice;
use crate::remediation::{Remediator, REOPEN_CAT};
use crate::responses::SearchParams;
use crate::runner::{Context, Outcome, Rule};
use crate::types::{DevSummary, InstanceType, PullRequest, Ticket};

const GITHUB: &str = "GitHub";
const OPEN: &str = "OPEN";
const REASON: &str = "Open pull request";

pub struct OpenPullRequestRule {
    project_key: String,
    suppress_label: String,
    lookback: String,
    settle_buffer: String,
    max_results: u32,
    reviewer_field: String,
    reason_field: String,
}

impl OpenPullRequestRule {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            project_key: config.project_key()?.to_string(),
            suppress_label: config.suppress_label.clone(),
            lookback: config.lookback.clone(),
            settle_buffer: config.settle_buffer.clone(),
            max_results: config.max_results,
            reviewer_field: config.fields.reviewer.clone(),
            reason_field: config.reason_field()?.to_string(),
        })
    }

    fn notice(&self, ticket: &Ticket, open: &[&PullRequest]) -> Notice {
        let reviewer = ticket.fields.account(&self.reviewer_field);

        let notice = Notice::new(&self.suppress_label)
            .mention(ticket.assignee_id())
            .mention(reviewer.as_ref().and_then(|r| r.id()))
            .paragraph(vec![
                Inline::text("Found some PRs are still "),
                Inline::styled(OPEN, &[Mark::Underline]),
                Inline::text(" on this Done ticket:"),
            ]);

        open.iter()
            .filter_map(|pr| pr.url.as_deref())
            .fold(notice, |n, url| n.finding(vec![Inline::card(url), Inline::text(" ")]))
            .todo(vec![Inline::text("Check the PR status on GitHub;")])
    }
}

#[async_trait]
impl Rule for OpenPullRequestRule {
    fn name(&self) -> &'static str {
        "open pull request"
    }

    fn suppress_label(&self) -> &str {
        &self.suppress_label
    }

    fn search(&self) -> SearchParams {
        // Tickets touched within the settle buffer may still be merging.
        let jql = format!(
            "updated >= -{} and updated < -{} and status IN ({}) and project = {}",
            self.lookback,
            self.settle_buffer,
            jql_list(&DONE_STATUSES),
            self.project_key
        );
        SearchParams::new(
            jql,
            &[
                "assignee",
                "reporter",
                "status",
                "labels",
                self.reviewer_field.as_str(),
            ],
            self.max_results,
        )
    }

    async fn check(&self, ctx: &Context<'_>, ticket: &Ticket) -> Result<Outcome> {
        let key = &ticket.key;
        let issue_id = ticket.issue_id().ok_or_else(|| PatrolError::MissingIssueId {
            key: key.clone(),
        })?;

        let summary = ctx.tracker.get_dev_summary(issue_id).await?;
        let Some(github) = github_instance(&summary) else {
            return Ok(Outcome::Skipped("no GitHub trace found".to_string()));
        };

        for message in &github.dev_status_error_messages {
            tracing::warn!("[{key}] GitHub dev status: {message}");
        }

        let open = open_pull_requests(github);
        if open.is_empty() {
            return Ok(Outcome::Passed);
        }

        tracing::info!("[{key}] Found {} open pull requests", open.len());
        Remediator::new(ctx.tracker, Some(&self.reason_field))
            .remediate(key, REOPEN_CAT, REASON, &self.notice(ticket, &open))
            .await?;

        Ok(Outcome::Flagged(key.clone()))
    }
}

/// The GitHub entry of the development panel, if the ticket has any trace
/// there.
pub fn github_instance(summary: &DevSummary) -> Option<&InstanceType> {
    summary
        .instance_types()
        .iter()
        .find(|instance| instance.instance_type.as_deref() == Some(GITHUB))
}

/// Open pull requests, dangling ones first, then per repository.
pub fn open_pull_requests(instance: &InstanceType) -> Vec<&PullRequest> {
    instance
        .dangling_pull_requests
        .iter()
        .chain(instance.repository.iter().flat_map(|r| r.pull_requests.iter()))
        .filter(|pr| pr.status.as_deref() == Some(OPEN))
        .collect()
}
