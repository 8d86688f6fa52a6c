//! Tickets labelled for a deployment note must be mentioned on the release
//! page of their fix version.

use async_trait::async_trait;
use url::Url;

use super::{jql_list, DONE_STATUSES};
use crate::adf::{Inline, Mark};
use crate::config::Config;
use crate::error::Result;
use crate::notice::Notice;
use crate::remediation::{Remediator, REWORK};
use crate::responses::SearchParams;
use crate::runner::{Context, Outcome, Rule};
use crate::tracker::WikiContent;
use crate::types::{FixVersion, RemoteLink, Ticket};

/// Relationship Confluence uses for "this page mentions the ticket".
const MENTIONED_IN: &str = "mentioned in";
const RELEASE_KEYWORD: &str = "release";
const REASON: &str = "Missing deployment note";

pub struct ReleaseNoteRule {
    project_key: String,
    release_label: String,
    suppress_label: String,
    lookback: String,
    max_results: u32,
    reason_field: String,
}

impl ReleaseNoteRule {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            project_key: config.project_key()?.to_string(),
            release_label: config.release_label.clone(),
            suppress_label: config.suppress_label.clone(),
            lookback: config.lookback.clone(),
            max_results: config.max_results,
            reason_field: config.reason_field()?.to_string(),
        })
    }

    fn notice(&self, ticket: &Ticket) -> Notice {
        Notice::new(&self.suppress_label)
            .mention(ticket.assignee_id())
            .paragraph(vec![
                Inline::text("This issue is reopened because it is labelled with "),
                Inline::code(&self.release_label),
                Inline::text(", and has transitioned to "),
                Inline::code("Done"),
                Inline::text(";"),
            ])
            .paragraph(vec![
                Inline::text("However, cannot find any "),
                Inline::code(MENTIONED_IN),
                Inline::text(" in the "),
                Inline::code("Confluence content"),
                Inline::text(" section."),
            ])
            .todo(vec![Inline::text("Prepare the Deployment Note;")])
            .todo(vec![
                Inline::text("Or, if there is, make sure that the Confluence page for Release has "),
                Inline::styled("explicitly", &[Mark::Em, Mark::Underline]),
                Inline::text(" mentioned this ticket key;"),
            ])
    }
}

#[async_trait]
impl Rule for ReleaseNoteRule {
    fn name(&self) -> &'static str {
        "deployment note"
    }

    fn suppress_label(&self) -> &str {
        &self.suppress_label
    }

    fn search(&self) -> SearchParams {
        let jql = format!(
            "updated >= -{} and labels IN ({}) and status IN ({}) and project = {}",
            self.lookback,
            jql_list(&[self.release_label.as_str()]),
            jql_list(&DONE_STATUSES),
            self.project_key
        );
        SearchParams::new(
            jql,
            &["assignee", "reporter", "status", "labels", "fixVersions"],
            self.max_results,
        )
    }

    async fn check(&self, ctx: &Context<'_>, ticket: &Ticket) -> Result<Outcome> {
        let key = &ticket.key;
        let links = ctx.tracker.get_remote_links(key).await?;

        if has_release_note(ctx.wiki, ticket, &links).await {
            return Ok(Outcome::Passed);
        }

        Remediator::new(ctx.tracker, Some(&self.reason_field))
            .remediate(key, REWORK, REASON, &self.notice(ticket))
            .await?;

        Ok(Outcome::Flagged(key.clone()))
    }
}

/// Whether any "mentioned in" link points at a release page whose version
/// matches one of the ticket's fix versions.
async fn has_release_note(wiki: &dyn WikiContent, ticket: &Ticket, links: &[RemoteLink]) -> bool {
    let key = &ticket.key;

    if links.is_empty() {
        tracing::info!("[{key}] No remote links found");
        return false;
    }

    let versions: Vec<FixVersion> = ticket.fields.fix_versions();

    for link in links.iter().filter(|l| l.relationship == MENTIONED_IN) {
        let Some(page_id) = extract_page_id(&link.object.url) else {
            continue;
        };

        let Some(page) = wiki.get_page(&page_id).await else {
            continue;
        };

        if versions.iter().any(|v| versions_match(&v.name, &page.title)) {
            tracing::info!("[{key}] Found valid remote link for page_id: {page_id}");
            return true;
        }
    }

    tracing::info!("[{key}] No valid remote links found");
    false
}

/// Page id from a Confluence link, either `?pageId=123` or `/pages/123/...`.
pub fn extract_page_id(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let is_id = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    if let Some((_, id)) = url.query_pairs().find(|(k, v)| k == "pageId" && is_id(&**v)) {
        return Some(id.into_owned());
    }

    let mut segments = url.path_segments()?;
    segments
        .find(|segment| *segment == "pages")
        .and_then(|_| segments.next())
        .filter(|id| is_id(*id))
        .map(String::from)
}

/// The version part of a release page title: whatever follows the first
/// "release" keyword, lowercased. `None` for pages that aren't release pages.
pub fn release_version(title: &str) -> Option<String> {
    let lower = title.to_lowercase();
    let start = lower.find(RELEASE_KEYWORD)? + RELEASE_KEYWORD.len();
    let version = lower[start..].trim_matches(|c: char| c.is_whitespace() || c == ':' || c == '-');
    (!version.is_empty()).then(|| version.to_string())
}

/// Case-insensitive substring match in either direction between a fix
/// version name and the version named by a release page title.
pub fn versions_match(fix_version: &str, page_title: &str) -> bool {
    let Some(page_version) = release_version(page_title) else {
        return false;
    };

    let lower = fix_version.trim().to_lowercase();
    let fix_version = match lower.strip_prefix(RELEASE_KEYWORD) {
        Some(rest) => rest.trim_matches(|c: char| c.is_whitespace() || c == ':' || c == '-'),
        None => lower.as_str(),
    };

    !fix_version.is_empty()
        && (page_version.contains(fix_version) || fix_version.contains(page_version.as_str()))
}
