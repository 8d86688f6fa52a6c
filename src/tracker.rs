//! The services the rules talk to. `JiraClient` implements both over HTTP.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::adf::Document;
use crate::error::Result;
use crate::responses::{SearchParams, SearchResponse};
use crate::types::{DevSummary, RemoteLink, Ticket, Transition, UserAccount, WikiPage};

/// Field id to value, sent with a transition or a field edit.
pub type FieldUpdates = BTreeMap<String, Value>;

#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse>;

    async fn get_ticket(&self, key: &str) -> Result<Ticket>;

    async fn get_remote_links(&self, key: &str) -> Result<Vec<RemoteLink>>;

    async fn get_transitions(&self, key: &str) -> Result<Vec<Transition>>;

    async fn execute_transition(
        &self,
        key: &str,
        transition_id: &str,
        fields: Option<&FieldUpdates>,
    ) -> Result<()>;

    async fn patch_fields(&self, key: &str, fields: &FieldUpdates) -> Result<()>;

    async fn add_comment(&self, key: &str, body: &Document) -> Result<()>;

    /// The account the bot authenticates as.
    async fn get_self(&self) -> Result<UserAccount>;

    async fn get_dev_summary(&self, issue_id: &str) -> Result<DevSummary>;
}

/// Read-only page lookup. Lookup failures are reported as `None`.
#[async_trait]
pub trait WikiContent: Send + Sync {
    async fn get_page(&self, page_id: &str) -> Option<WikiPage>;
}
