//! Tickets linked with Gantt dependencies must be planned in sprints that
//! respect the dependency order.

use async_trait::async_trait;

use super::jql_list;
use crate::adf::Inline;
use crate::config::Config;
use crate::error::Result;
use crate::notice::Notice;
use crate::remediation::Remediator;
use crate::responses::SearchParams;
use crate::runner::{Context, Outcome, Rule};
use crate::types::{earliest_start, IssueLink, Sprint, Ticket};

const BACKLOG_STATUSES: [&str; 2] = ["Backlog", "New"];

const ORDERING_LINK_TYPES: [&str; 2] = [
    // "start is earliest end of" / "earliest end is start of"
    "Gantt Start to End",
    // "has to be done after" / "has to be done before"
    "Gantt End to Start",
];

pub struct SprintOrderRule {
    project_key: String,
    suppress_label: String,
    lookback: String,
    max_results: u32,
    sprint_field: String,
}

impl SprintOrderRule {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            project_key: config.project_key()?.to_string(),
            suppress_label: config.suppress_label.clone(),
            lookback: config.lookback.clone(),
            max_results: config.max_results,
            sprint_field: config.fields.sprint.clone(),
        })
    }

    /// Compare the ticket against every ordering link and describe each
    /// violation. Linked tickets are fetched fresh for every link.
    async fn find_violations(
        &self,
        ctx: &Context<'_>,
        ticket: &Ticket,
        sprints: &[Sprint],
        links: &[IssueLink],
    ) -> Result<Vec<String>> {
        let key = &ticket.key;
        let mut warnings = Vec::new();

        for link in links {
            if !is_ordering_link(link) {
                tracing::debug!("[{key}] Ignoring {link}, not an ordering relation");
                continue;
            }

            tracing::info!("[{key}] Processing ticket on {link}...");

            if let Some(inward) = &link.inward_issue {
                let linked = ctx.tracker.get_ticket(&inward.key).await?;
                let linked_sprints = linked.fields.sprints(&self.sprint_field);

                if !is_origin_started_later(sprints, &linked_sprints) {
                    let msg = format!("{key} should be at later/same sprint than {}", linked.key);
                    tracing::warn!("[{key}] {msg} (Linked ticket)");
                    warnings.push(msg);
                }
            }

            if let Some(outward) = &link.outward_issue {
                let linked = ctx.tracker.get_ticket(&outward.key).await?;
                let linked_sprints = linked.fields.sprints(&self.sprint_field);

                if !is_origin_started_earlier(sprints, &linked_sprints) {
                    let msg = format!("{key} should be at earlier/same sprint than {}", linked.key);
                    tracing::warn!("[{key}] {msg} (Linked ticket)");
                    warnings.push(msg);
                }
            }
        }

        Ok(warnings)
    }

    fn notice(&self, ticket: &Ticket, warnings: &[String]) -> Notice {
        let notice = Notice::new(&self.suppress_label)
            .mention(ticket.reporter_id())
            .paragraph(vec![Inline::text("Found invalid dependency relationships:")]);

        warnings
            .iter()
            .fold(notice, |n, w| n.finding(vec![Inline::text(w.as_str())]))
            .todo(vec![Inline::text(
                "Check if the sprint value or linked relationship is as expected;",
            )])
    }
}

#[async_trait]
impl Rule for SprintOrderRule {
    fn name(&self) -> &'static str {
        "linked dependency"
    }

    fn suppress_label(&self) -> &str {
        &self.suppress_label
    }

    fn search(&self) -> SearchParams {
        let jql = format!(
            "updated >= -{} and sprint != empty and issueLinkType IS NOT EMPTY and status IN ({}) and project = {}",
            self.lookback,
            jql_list(&BACKLOG_STATUSES),
            self.project_key
        );
        SearchParams::new(
            jql,
            &[
                "assignee",
                "reporter",
                "status",
                "labels",
                self.sprint_field.as_str(),
                "issuelinks",
            ],
            self.max_results,
        )
    }

    async fn check(&self, ctx: &Context<'_>, ticket: &Ticket) -> Result<Outcome> {
        let key = &ticket.key;

        let sprints = ticket.fields.sprints(&self.sprint_field);
        if sprints.is_empty() {
            return Ok(Outcome::Skipped("no sprint".to_string()));
        }

        let links = ticket.fields.issue_links();
        if links.is_empty() {
            return Ok(Outcome::Skipped("no linked issues found".to_string()));
        }

        let warnings = self.find_violations(ctx, ticket, &sprints, &links).await?;
        if warnings.is_empty() {
            return Ok(Outcome::Passed);
        }

        tracing::info!(
            "[{key}] Found {} warnings, adding to ticket comments...",
            warnings.len()
        );
        // Comment only; the ticket stays where it is.
        Remediator::new(ctx.tracker, None)
            .post(key, &self.notice(ticket, &warnings))
            .await?;

        Ok(Outcome::Flagged(format!("{key} ({})", warnings.len())))
    }
}

fn is_ordering_link(link: &IssueLink) -> bool {
    ORDERING_LINK_TYPES.contains(&link.link_type.name.as_str())
}

/// Whether `origin` starts no later than `compare`, by earliest sprint start.
/// A side without any start date never counts as a violation.
pub fn is_origin_started_earlier(origin: &[Sprint], compare: &[Sprint]) -> bool {
    match (earliest_start(origin), earliest_start(compare)) {
        (Some(origin), Some(compare)) => origin <= compare,
        _ => true,
    }
}

/// Whether `origin` starts no earlier than `compare`.
pub fn is_origin_started_later(origin: &[Sprint], compare: &[Sprint]) -> bool {
    is_origin_started_earlier(compare, origin)
}
