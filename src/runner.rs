//! Runs one rule over the tickets its search returns.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{PatrolError, Result};
use crate::responses::SearchParams;
use crate::tracker::{IssueTracker, WikiContent};
use crate::types::Ticket;

/// What a rule concluded about one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Skipped(String),
    /// The ticket failed the check and was remediated. Carries the entry for
    /// the bad list.
    Flagged(String),
}

/// Services a rule may call while checking a ticket.
pub struct Context<'a> {
    pub tracker: &'a dyn IssueTracker,
    pub wiki: &'a dyn WikiContent,
}

#[async_trait]
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Label that exempts a ticket from this rule.
    fn suppress_label(&self) -> &str;

    fn search(&self) -> SearchParams;

    /// Validate one ticket and remediate it if it fails.
    async fn check(&self, ctx: &Context<'_>, ticket: &Ticket) -> Result<Outcome>;
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleReport {
    pub rule: String,
    pub scanned: usize,
    pub passed: usize,
    pub skipped: usize,
    pub bad: Vec<String>,
    pub errors: Vec<String>,
    /// Set when the rule could not run at all, e.g. its search failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl RuleReport {
    fn new(rule: &str) -> Self {
        Self {
            rule: rule.to_string(),
            ..Self::default()
        }
    }

    pub fn aborted(rule: &str, error: &PatrolError) -> Self {
        Self {
            failure: Some(error.to_string()),
            ..Self::new(rule)
        }
    }

    /// Findings don't fail a rule; unexpected errors do.
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty() && self.failure.is_none()
    }
}

pub async fn run_rule(rule: &dyn Rule, ctx: &Context<'_>) -> Result<RuleReport> {
    tracing::info!("Checking {}...", rule.name());

    let params = rule.search();
    tracing::info!("Fetching tickets with JQL: '{}'...", params.jql);
    let response = ctx.tracker.search(&params).await?;

    if !response.is_last {
        tracing::warn!(
            "Search returned more than {} tickets; the rest are left for the next run",
            params.max_results
        );
    }

    let keys: Vec<&str> = response.issues.iter().map(|t| t.key.as_str()).collect();
    tracing::info!("Found {} target tickets: {:?}", keys.len(), keys);

    let mut report = RuleReport::new(rule.name());
    report.scanned = response.issues.len();

    for ticket in &response.issues {
        let key = &ticket.key;
        tracing::info!(
            "[{key}] Processing ticket ({})...",
            ticket.status_name().unwrap_or("no status")
        );

        if ticket.has_label(rule.suppress_label()) {
            tracing::info!("[{key}] Skipping due to {} label...", rule.suppress_label());
            report.skipped += 1;
            continue;
        }

        match rule.check(ctx, ticket).await {
            Ok(Outcome::Passed) => report.passed += 1,
            Ok(Outcome::Skipped(reason)) => {
                tracing::info!("[{key}] Skipping due to {reason}...");
                report.skipped += 1;
            }
            Ok(Outcome::Flagged(entry)) => report.bad.push(entry),
            Err(e) => {
                tracing::error!("[{key}] Encountered {}: {e}", e.kind());
                report.errors.push(key.clone());
            }
        }
    }

    tracing::info!(
        "Conclusion: \n{} bad tickets: {:?}, \n{} error tickets: {:?}",
        report.bad.len(),
        report.bad,
        report.errors.len(),
        report.errors
    );

    Ok(report)
}
