//! API request/response models for scenario generation.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{Error, Result};

/// Work item identifier, accepted as either a JSON number or a string.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum WorkItemId {
    Number(u64),
    Text(String),
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkItemId::Number(id) => write!(f, "{id}"),
            WorkItemId::Text(id) => f.write_str(id),
        }
    }
}

impl WorkItemId {
    fn is_blank(&self) -> bool {
        match self {
            WorkItemId::Number(_) => false,
            WorkItemId::Text(id) => id.trim().is_empty(),
        }
    }
}

/// Inbound generation request. All five fields are required; unknown fields
/// are rejected at the boundary before any downstream call is constructed.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerateRequest {
    /// Tracking service organization name
    pub organization: String,
    /// Project within the organization
    pub project: String,
    /// Work item to generate scenarios for
    pub work_item_id: WorkItemId,
    /// Access token for the tracking service (passed through, never stored)
    pub access_token: String,
    /// API key for the completion service (passed through, never stored)
    pub model_api_key: String,
}

impl GenerateRequest {
    /// Reject blank fields before any network call is attempted.
    pub fn validate(&self) -> Result<()> {
        for (name, blank) in [
            ("organization", self.organization.trim().is_empty()),
            ("project", self.project.trim().is_empty()),
            ("workItemId", self.work_item_id.is_blank()),
            ("accessToken", self.access_token.trim().is_empty()),
            ("modelApiKey", self.model_api_key.trim().is_empty()),
        ] {
            if blank {
                return Err(Error::validation(format!("Missing required field: {name}")));
            }
        }
        Ok(())
    }
}

/// Successful generation response: the artifact metadata plus its content.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateResponse {
    pub success: bool,
    pub message: String,
    /// Human title of the work item
    pub title: String,
    /// Name of the stored feature file
    pub filename: String,
    /// The generated Gherkin text
    pub content: String,
    /// Storage path of the artifact
    pub filepath: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest {
            organization: "acme".to_string(),
            project: "webshop".to_string(),
            work_item_id: WorkItemId::Number(42),
            access_token: "pat".to_string(),
            model_api_key: "sk-test".to_string(),
        }
    }

    #[test]
    fn work_item_id_accepts_number_or_string() {
        let from_number: WorkItemId = serde_json::from_str("42").unwrap();
        let from_string: WorkItemId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_number.to_string(), "42");
        assert_eq!(from_string.to_string(), "42");
    }

    #[test]
    fn complete_request_passes_validation() {
        request().validate().unwrap();
    }

    #[test]
    fn blank_fields_fail_validation() {
        let mut missing_org = request();
        missing_org.organization = "  ".to_string();
        let error = missing_org.validate().unwrap_err();
        assert!(error.user_message().contains("organization"));

        let mut missing_id = request();
        missing_id.work_item_id = WorkItemId::Text(String::new());
        assert!(missing_id.validate().is_err());

        let mut missing_key = request();
        missing_key.model_api_key = String::new();
        assert!(missing_key.validate().is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let body = serde_json::json!({
            "organization": "acme",
            "project": "webshop",
            "workItemId": 42,
            "accessToken": "pat",
            "modelApiKey": "sk-test",
            "surprise": true
        });
        assert!(serde_json::from_value::<GenerateRequest>(body).is_err());
    }

    #[test]
    fn missing_fields_are_rejected() {
        let body = serde_json::json!({
            "project": "webshop",
            "workItemId": 42,
            "accessToken": "pat",
            "modelApiKey": "sk-test"
        });
        assert!(serde_json::from_value::<GenerateRequest>(body).is_err());
    }
}
