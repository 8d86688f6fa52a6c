use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;

use crate::adf::Document;
use crate::error::{PatrolError, Result};
use crate::responses::{
    CommentRequest, EditRequest, SearchParams, SearchResponse, TransitionId, TransitionRequest,
    TransitionsResponse,
};
use crate::tracker::{FieldUpdates, IssueTracker, WikiContent};
use crate::types::{DevSummary, RemoteLink, Ticket, Transition, UserAccount, WikiPage};

const DEV_SUMMARY_OPERATION: &str = "DevSummaryPanelOneClickUrls";

const DEV_SUMMARY_QUERY: &str = r#"
query DevSummaryPanelOneClickUrls($issueId: ID!) {
    developmentInformation(issueId: $issueId) {
        details {
            instanceTypes {
                id
                type
                devStatusErrorMessages
                repository {
                    avatarUrl
                    name
                    branches {
                        createPullRequestUrl
                        name
                        url
                    }
                    commits {
                        url
                    }
                    pullRequests {
                        url
                        status
                    }
                }
                danglingPullRequests {
                    url
                    status
                }
                buildProviders {
                    id
                    builds {
                        url
                        state
                    }
                }
            }
        }
    }
}
"#;

/// Jira Cloud REST v3 client. Confluence and the software GraphQL gateway
/// live on the same site and share its credentials.
pub struct JiraClient {
    http: Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    #[serde(rename = "operationName")]
    operation_name: &'a str,
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Deserialize, Debug)]
struct GraphQLError {
    message: String,
}

impl JiraClient {
    /// `domain` is a bare host (`acme.atlassian.net`) or a full base URL.
    pub fn new(domain: &str, token: &str) -> Self {
        let domain = domain.trim().trim_end_matches('/');
        let base_url = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        };

        Self {
            http: Client::new(),
            base_url,
            token: token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Basic {}", self.token))
            .header("Accept", "application/json")
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.authorized(self.http.get(self.url(path))).send().await?;
        read_json(response).await
    }

    async fn send_json<B: Serialize + ?Sized>(&self, request: RequestBuilder, body: &B) -> Result<()> {
        let response = self.authorized(request).json(body).send().await?;
        check_status(response).await.map(|_| ())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    if !response.status().is_success() {
        return Err(PatrolError::ApiError {
            status: response.status().as_u16(),
            message: response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response body>".to_string()),
        });
    }
    Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    Ok(response.json().await?)
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        let response = self
            .authorized(self.http.get(self.url("/rest/api/3/search/jql")))
            .query(&params.to_query())
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_ticket(&self, key: &str) -> Result<Ticket> {
        self.get(&format!("/rest/api/3/issue/{key}")).await
    }

    async fn get_remote_links(&self, key: &str) -> Result<Vec<RemoteLink>> {
        self.get(&format!("/rest/api/3/issue/{key}/remotelink")).await
    }

    async fn get_transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let response: TransitionsResponse = self
            .get(&format!("/rest/api/3/issue/{key}/transitions"))
            .await?;
        Ok(response.transitions)
    }

    async fn execute_transition(
        &self,
        key: &str,
        transition_id: &str,
        fields: Option<&FieldUpdates>,
    ) -> Result<()> {
        let body = TransitionRequest {
            transition: TransitionId { id: transition_id },
            fields,
        };
        let request = self
            .http
            .post(self.url(&format!("/rest/api/3/issue/{key}/transitions")));
        self.send_json(request, &body).await
    }

    async fn patch_fields(&self, key: &str, fields: &FieldUpdates) -> Result<()> {
        let request = self.http.put(self.url(&format!("/rest/api/3/issue/{key}")));
        self.send_json(request, &EditRequest { fields }).await
    }

    async fn add_comment(&self, key: &str, body: &Document) -> Result<()> {
        let request = self
            .http
            .post(self.url(&format!("/rest/api/3/issue/{key}/comment")));
        self.send_json(request, &CommentRequest { body }).await
    }

    async fn get_self(&self) -> Result<UserAccount> {
        self.get("/rest/api/3/myself").await
    }

    async fn get_dev_summary(&self, issue_id: &str) -> Result<DevSummary> {
        let request = GraphQLRequest {
            operation_name: DEV_SUMMARY_OPERATION,
            query: DEV_SUMMARY_QUERY,
            variables: json!({ "issueId": issue_id }),
        };

        let response = self
            .authorized(self.http.post(self.url("/jsw2/graphql")))
            .query(&[("operation", DEV_SUMMARY_OPERATION)])
            .json(&request)
            .send()
            .await?;

        let gql_response: GraphQLResponse<DevSummary> = read_json(response).await?;

        if let Some(errors) = gql_response.errors.filter(|e| !e.is_empty()) {
            return Err(PatrolError::GraphQL {
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }

        gql_response.data.ok_or(PatrolError::EmptyResponse)
    }
}

#[async_trait]
impl WikiContent for JiraClient {
    async fn get_page(&self, page_id: &str) -> Option<WikiPage> {
        match self.get(&format!("/wiki/api/v2/pages/{page_id}")).await {
            Ok(page) => Some(page),
            Err(e) => {
                tracing::warn!("Could not fetch Confluence page {page_id}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        assert_eq!(
            JiraClient::new("acme.atlassian.net", "t").url("/rest/api/3/myself"),
            "https://acme.atlassian.net/rest/api/3/myself"
        );
        assert_eq!(
            JiraClient::new("http://localhost:8080/", "t").url("/wiki/api/v2/pages/1"),
            "http://localhost:8080/wiki/api/v2/pages/1"
        );
    }

    #[test]
    fn test_graphql_request_body() {
        let request = GraphQLRequest {
            operation_name: DEV_SUMMARY_OPERATION,
            query: DEV_SUMMARY_QUERY,
            variables: json!({ "issueId": "10001" }),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["operationName"], "DevSummaryPanelOneClickUrls");
        assert_eq!(body["variables"]["issueId"], "10001");
        assert!(body["query"]
            .as_str()
            .unwrap()
            .contains("danglingPullRequests"));
    }

    #[test]
    fn test_graphql_response_with_errors() {
        let response: GraphQLResponse<DevSummary> = serde_json::from_value(json!({
            "data": null,
            "errors": [{ "message": "issue not found" }]
        }))
        .unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.errors.unwrap()[0].message, "issue not found");
    }
}
