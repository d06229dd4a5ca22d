//! Work item retrieval from the project-tracking service.
//!
//! One authenticated GET against the versioned REST endpoint, field
//! extraction with fallbacks, and sanitization of the acceptance criteria.
//! No retries and no timeout beyond the transport default.

use serde::Deserialize;
use url::Url;

use crate::errors::{Error, Result};
use crate::sanitize::strip_markup;

/// A work item with its acceptance criteria already sanitized to plain text.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub title: String,
    pub acceptance_criteria: String,
}

/// Response document of the work item endpoint. Only the two fields the
/// pipeline needs are extracted; both are optional in the remote schema.
#[derive(Debug, Deserialize)]
struct WorkItemDocument {
    #[serde(default)]
    fields: WorkItemFields,
}

#[derive(Debug, Default, Deserialize)]
struct WorkItemFields {
    #[serde(rename = "System.Title")]
    title: Option<String>,
    #[serde(rename = "Microsoft.VSTS.Common.AcceptanceCriteria")]
    acceptance_criteria: Option<String>,
}

/// Client for the work item tracking service.
#[derive(Debug, Clone)]
pub struct WorkItemClient {
    client: reqwest::Client,
    base_url: Url,
    api_version: String,
}

impl WorkItemClient {
    pub fn new(client: reqwest::Client, base_url: Url, api_version: String) -> Self {
        Self {
            client,
            base_url,
            api_version,
        }
    }

    /// Fetch a work item and sanitize its acceptance criteria.
    ///
    /// Authenticates basic-auth style with an empty username and the access
    /// token as password. A non-success response becomes [`Error::Upstream`]
    /// carrying the remote status and body verbatim; transport failures and
    /// unreadable bodies become [`Error::Connectivity`]. A missing title
    /// falls back to `WorkItem_{id}`; missing criteria to the empty string.
    /// Criteria that sanitize to nothing fail with [`Error::Validation`] so
    /// no completion call is made for them.
    #[tracing::instrument(skip(self, access_token))]
    pub async fn fetch(&self, organization: &str, project: &str, work_item_id: &str, access_token: &str) -> Result<WorkItem> {
        let url = format!(
            "{}/{organization}/{project}/_apis/wit/workitems/{work_item_id}?api-version={}",
            self.base_url.as_str().trim_end_matches('/'),
            self.api_version
        );

        let response = self
            .client
            .get(&url)
            .basic_auth("", Some(access_token))
            .send()
            .await
            .map_err(Error::connectivity)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let document: WorkItemDocument = response.json().await.map_err(Error::connectivity)?;

        let title = document
            .fields
            .title
            .unwrap_or_else(|| format!("WorkItem_{work_item_id}"));
        let acceptance_criteria = strip_markup(document.fields.acceptance_criteria.as_deref().unwrap_or_default());

        if acceptance_criteria.trim().is_empty() {
            return Err(Error::validation("Acceptance criteria is empty for this work item."));
        }

        tracing::debug!(title = %title, "Fetched work item");
        Ok(WorkItem {
            title,
            acceptance_criteria,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server_uri: &str) -> WorkItemClient {
        // Ignore the error if another test already installed the provider.
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        WorkItemClient::new(
            reqwest::Client::new(),
            server_uri.parse().expect("mock server uri"),
            "7.1".to_string(),
        )
    }

    #[tokio::test]
    async fn fetches_and_sanitizes_work_item() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/acme/webshop/_apis/wit/workitems/42"))
            .and(query_param("api-version", "7.1"))
            // basic auth, empty username, token as password
            .and(header("authorization", "Basic OnNlY3JldC1wYXQ="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 42,
                "fields": {
                    "System.Title": "Login works",
                    "Microsoft.VSTS.Common.AcceptanceCriteria": "<p>User must log in</p>"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let item = client_for(&server.uri())
            .fetch("acme", "webshop", "42", "secret-pat")
            .await
            .unwrap();

        assert_eq!(item.title, "Login works");
        assert_eq!(item.acceptance_criteria, "User must log in");
    }

    #[tokio::test]
    async fn missing_title_falls_back_to_synthesized_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fields": {
                    "Microsoft.VSTS.Common.AcceptanceCriteria": "Must work"
                }
            })))
            .mount(&server)
            .await;

        let item = client_for(&server.uri()).fetch("acme", "webshop", "7", "pat").await.unwrap();
        assert_eq!(item.title, "WorkItem_7");
    }

    #[tokio::test]
    async fn non_success_status_propagates_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("work item does not exist"))
            .mount(&server)
            .await;

        let error = client_for(&server.uri())
            .fetch("acme", "webshop", "9999", "pat")
            .await
            .unwrap_err();

        match error {
            Error::Upstream { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "work item does not exist");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_service_is_a_connectivity_error() {
        // Nothing is listening on this port
        let client = client_for("http://127.0.0.1:9");
        let error = client.fetch("acme", "webshop", "1", "pat").await.unwrap_err();
        assert!(matches!(error, Error::Connectivity { .. }));
    }

    #[tokio::test]
    async fn empty_criteria_fails_validation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fields": { "System.Title": "No criteria yet" }
            })))
            .mount(&server)
            .await;

        let error = client_for(&server.uri()).fetch("acme", "webshop", "3", "pat").await.unwrap_err();
        assert!(matches!(error, Error::Validation { .. }));
    }

    #[tokio::test]
    async fn whitespace_only_criteria_after_sanitization_fails_validation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fields": {
                    "System.Title": "Hollow item",
                    "Microsoft.VSTS.Common.AcceptanceCriteria": "<div>   </div>"
                }
            })))
            .mount(&server)
            .await;

        let error = client_for(&server.uri()).fetch("acme", "webshop", "4", "pat").await.unwrap_err();
        assert!(matches!(error, Error::Validation { .. }));
    }
}
