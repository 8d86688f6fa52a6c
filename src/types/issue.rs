use std::collections::HashMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{IssueLink, Sprint, UserAccount};

/// A ticket snapshot as returned by search or issue fetch.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Ticket {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: Fields,
}

impl Ticket {
    pub fn issue_id(&self) -> Option<&str> {
        let id = self.id.trim();
        (!id.is_empty()).then_some(id)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.fields
            .labels
            .as_ref()
            .is_some_and(|labels| labels.iter().any(|l| l == label))
    }

    pub fn assignee_id(&self) -> Option<&str> {
        self.fields.assignee.as_ref().and_then(UserAccount::id)
    }

    pub fn reporter_id(&self) -> Option<&str> {
        self.fields.reporter.as_ref().and_then(UserAccount::id)
    }

    pub fn status_name(&self) -> Option<&str> {
        self.fields.status.as_ref().map(|s| s.name.as_str())
    }
}

/// Ticket fields. The well-known ones are typed; everything else the search
/// asked for lands in `extra`, keyed by field id, and is decoded on demand.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Fields {
    #[serde(default)]
    pub assignee: Option<UserAccount>,
    #[serde(default)]
    pub reporter: Option<UserAccount>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Fields {
    pub fn fix_versions(&self) -> Vec<FixVersion> {
        self.decode_list("fixVersions")
    }

    pub fn issue_links(&self) -> Vec<IssueLink> {
        self.decode_list("issuelinks")
    }

    pub fn sprints(&self, field_id: &str) -> Vec<Sprint> {
        self.decode_list(field_id)
    }

    /// Decode a user-picker custom field (e.g. the reviewer).
    pub fn account(&self, field_id: &str) -> Option<UserAccount> {
        self.extra
            .get(field_id)
            .filter(|v| v.is_object())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Decode a list-valued field, skipping entries that don't match `T`.
    fn decode_list<T: DeserializeOwned>(&self, field_id: &str) -> Vec<T> {
        match self.extra.get(field_id) {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|item| item.is_object())
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Status {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct FixVersion {
    pub id: String,
    pub name: String,
    pub description: String,
    pub archived: bool,
    pub released: bool,
    #[serde(rename = "releaseDate")]
    pub release_date: Option<NaiveDate>,
}
