//! Request and response envelopes for the Jira REST API.

use serde::{Deserialize, Serialize};

use crate::adf::Document;
use crate::tracker::FieldUpdates;
use crate::types::{Ticket, Transition};

/// Parameters of `GET /rest/api/3/search/jql`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub jql: String,
    pub fields: Vec<String>,
    pub max_results: u32,
    pub next_page_token: Option<String>,
}

impl SearchParams {
    pub fn new(jql: impl Into<String>, fields: &[&str], max_results: u32) -> Self {
        Self {
            jql: jql.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            max_results,
            next_page_token: None,
        }
    }

    /// Query string pairs as the search endpoint expects them.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("jql", self.jql.clone()),
            ("fields", self.fields.join(",")),
            ("maxResults", self.max_results.to_string()),
        ];
        if let Some(token) = &self.next_page_token {
            query.push(("nextPageToken", token.clone()));
        }
        query
    }
}

/// One page of search results.
#[derive(Deserialize, Debug, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<Ticket>,
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
    #[serde(rename = "isLast", default = "default_true")]
    pub is_last: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Debug, Default)]
pub struct TransitionsResponse {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

#[derive(Serialize, Debug)]
pub struct TransitionRequest<'a> {
    pub transition: TransitionId<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<&'a FieldUpdates>,
}

#[derive(Serialize, Debug)]
pub struct TransitionId<'a> {
    pub id: &'a str,
}

#[derive(Serialize, Debug)]
pub struct EditRequest<'a> {
    pub fields: &'a FieldUpdates,
}

#[derive(Serialize, Debug)]
pub struct CommentRequest<'a> {
    pub body: &'a Document,
}
