//! In-memory tracker and wiki for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::adf::Document;
use crate::error::{PatrolError, Result};
use crate::responses::{SearchParams, SearchResponse};
use crate::tracker::{FieldUpdates, IssueTracker, WikiContent};
use crate::types::{DevSummary, RemoteLink, Ticket, Transition, UserAccount, WikiPage};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Search(String),
    Transition {
        key: String,
        id: String,
        fields: Option<FieldUpdates>,
    },
    Patch {
        key: String,
        fields: FieldUpdates,
    },
    Comment {
        key: String,
        text: String,
    },
}

/// A tracker with a tiny workflow engine: each ticket sits in a status, and
/// the transitions offered are the ones configured for that status.
#[derive(Default)]
pub struct FakeTracker {
    search_results: Vec<Ticket>,
    fail_search: bool,
    tickets: HashMap<String, Ticket>,
    remote_links: HashMap<String, Vec<RemoteLink>>,
    dev_summaries: HashMap<String, DevSummary>,
    failing: HashSet<String>,
    workflow: HashMap<String, Vec<(String, String)>>,
    statuses: Mutex<HashMap<String, String>>,
    reject_fields: bool,
    bot_name: String,
    calls: Mutex<Vec<Call>>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self {
            bot_name: "Patrol".to_string(),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, tickets: Vec<Ticket>) -> Self {
        self.search_results = tickets;
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn with_ticket(mut self, ticket: Ticket) -> Self {
        self.tickets.insert(ticket.key.clone(), ticket);
        self
    }

    pub fn with_remote_links(mut self, key: &str, links: Vec<RemoteLink>) -> Self {
        self.remote_links.insert(key.to_string(), links);
        self
    }

    pub fn with_dev_summary(mut self, issue_id: &str, summary: DevSummary) -> Self {
        self.dev_summaries.insert(issue_id.to_string(), summary);
        self
    }

    /// Every read for this key (or issue id) fails with a 503.
    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// Offer transitions `(id, target status)` from `status`.
    pub fn with_workflow(mut self, status: &str, transitions: &[(&str, &str)]) -> Self {
        self.workflow.insert(
            status.to_string(),
            transitions
                .iter()
                .map(|(id, to)| (id.to_string(), to.to_string()))
                .collect(),
        );
        self
    }

    pub fn at_status(self, key: &str, status: &str) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(key.to_string(), status.to_string());
        self
    }

    /// Transitions carrying fields fail with a 400.
    pub fn rejecting_fields(mut self) -> Self {
        self.reject_fields = true;
        self
    }

    pub fn status_of(&self, key: &str) -> Option<String> {
        self.statuses.lock().unwrap().get(key).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn comments(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Comment { key, text } => Some((key, text)),
                _ => None,
            })
            .collect()
    }

    /// Every call other than the search.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, Call::Search(_)))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.failing.contains(key) {
            return Err(unavailable());
        }
        Ok(())
    }
}

fn unavailable() -> PatrolError {
    PatrolError::ApiError {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        self.record(Call::Search(params.jql.clone()));
        if self.fail_search {
            return Err(unavailable());
        }
        Ok(SearchResponse {
            issues: self.search_results.clone(),
            next_page_token: None,
            is_last: true,
        })
    }

    async fn get_ticket(&self, key: &str) -> Result<Ticket> {
        self.check(key)?;
        self.tickets.get(key).cloned().ok_or(PatrolError::ApiError {
            status: 404,
            message: format!("Issue {key} does not exist"),
        })
    }

    async fn get_remote_links(&self, key: &str) -> Result<Vec<RemoteLink>> {
        self.check(key)?;
        Ok(self.remote_links.get(key).cloned().unwrap_or_default())
    }

    async fn get_transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let status = self.status_of(key).unwrap_or_default();
        let offered = self.workflow.get(&status).cloned().unwrap_or_default();
        Ok(offered
            .into_iter()
            .map(|(id, to)| {
                serde_json::from_value(json!({ "id": id, "name": to, "to": { "name": to } }))
                    .unwrap()
            })
            .collect())
    }

    async fn execute_transition(
        &self,
        key: &str,
        transition_id: &str,
        fields: Option<&FieldUpdates>,
    ) -> Result<()> {
        self.record(Call::Transition {
            key: key.to_string(),
            id: transition_id.to_string(),
            fields: fields.cloned(),
        });

        if self.reject_fields && fields.is_some() {
            return Err(PatrolError::ApiError {
                status: 400,
                message: "Field cannot be set. It is not on the appropriate screen".to_string(),
            });
        }

        let mut statuses = self.statuses.lock().unwrap();
        let current = statuses.get(key).cloned().unwrap_or_default();
        let target = self
            .workflow
            .get(&current)
            .and_then(|offered| offered.iter().find(|(id, _)| id == transition_id))
            .map(|(_, to)| to.clone())
            .ok_or(PatrolError::ApiError {
                status: 400,
                message: format!("Transition id '{transition_id}' is not valid for this issue"),
            })?;
        statuses.insert(key.to_string(), target);
        Ok(())
    }

    async fn patch_fields(&self, key: &str, fields: &FieldUpdates) -> Result<()> {
        self.record(Call::Patch {
            key: key.to_string(),
            fields: fields.clone(),
        });
        Ok(())
    }

    async fn add_comment(&self, key: &str, body: &Document) -> Result<()> {
        self.record(Call::Comment {
            key: key.to_string(),
            text: body.plain_text(),
        });
        Ok(())
    }

    async fn get_self(&self) -> Result<UserAccount> {
        Ok(UserAccount {
            account_id: "bot".to_string(),
            display_name: self.bot_name.clone(),
            ..UserAccount::default()
        })
    }

    async fn get_dev_summary(&self, issue_id: &str) -> Result<DevSummary> {
        self.check(issue_id)?;
        Ok(self.dev_summaries.get(issue_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeWiki {
    pages: HashMap<String, String>,
}

impl FakeWiki {
    pub fn with_page(mut self, id: &str, title: &str) -> Self {
        self.pages.insert(id.to_string(), title.to_string());
        self
    }
}

#[async_trait]
impl WikiContent for FakeWiki {
    async fn get_page(&self, page_id: &str) -> Option<WikiPage> {
        self.pages.get(page_id).map(|title| WikiPage {
            id: page_id.to_string(),
            title: title.clone(),
        })
    }
}

/// A ticket with the given key, issue id and raw fields.
pub fn ticket(key: &str, id: &str, fields: Value) -> Ticket {
    serde_json::from_value(json!({ "id": id, "key": key, "fields": fields })).unwrap()
}
