//! Development panel data from the Jira software GraphQL gateway.

use serde::{Deserialize, Deserializer, Serialize};

/// `data` of the `DevSummaryPanelOneClickUrls` query.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DevSummary {
    pub development_information: Option<DevelopmentInformation>,
}

impl DevSummary {
    pub fn instance_types(&self) -> &[InstanceType] {
        self.development_information
            .as_ref()
            .and_then(|info| info.details.as_ref())
            .map(|details| details.instance_types.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DevelopmentInformation {
    pub details: Option<DevSummaryDetails>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DevSummaryDetails {
    #[serde(deserialize_with = "nullable")]
    pub instance_types: Vec<InstanceType>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct InstanceType {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub instance_type: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub dev_status_error_messages: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub repository: Vec<Repository>,
    #[serde(deserialize_with = "nullable")]
    pub dangling_pull_requests: Vec<PullRequest>,
    #[serde(deserialize_with = "nullable")]
    pub build_providers: Vec<BuildProvider>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Repository {
    pub avatar_url: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub branches: Vec<Branch>,
    #[serde(deserialize_with = "nullable")]
    pub commits: Vec<Commit>,
    #[serde(deserialize_with = "nullable")]
    pub pull_requests: Vec<PullRequest>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Branch {
    pub create_pull_request_url: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Commit {
    pub url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PullRequest {
    pub url: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct BuildProvider {
    pub id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub builds: Vec<Build>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Build {
    pub url: Option<String>,
    pub state: Option<String>,
}

/// GraphQL returns `null` for empty lists as often as `[]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
