use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct RemoteLink {
    pub id: u64,
    #[serde(rename = "self")]
    pub self_url: String,
    #[serde(rename = "globalId")]
    pub global_id: String,
    pub relationship: String,
    pub object: RemoteLinkObject,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct RemoteLinkObject {
    pub url: String,
    pub title: String,
    pub icon: Value,
    pub status: Option<RemoteLinkStatus>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct RemoteLinkStatus {
    pub resolved: bool,
    pub icon: Value,
}

/// A Confluence page, as far as the release note check cares.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct WikiPage {
    pub id: String,
    pub title: String,
}
