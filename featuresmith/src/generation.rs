//! Gherkin scenario generation through an OpenAI-compatible completion API.
//!
//! The prompt template is a contract: it is produced deterministically from
//! the work item title and its sanitized acceptance criteria, and the test
//! suite pins it exactly. Sampling temperature and the system role framing
//! are fixed.

use async_openai::types::chat::CreateChatCompletionResponse;
use serde_json::json;
use url::Url;

use crate::errors::{Error, Result};
use crate::sanitize::strip_code_fence;

/// Fixed system role framing for the completion call.
pub const SYSTEM_PROMPT: &str = "You are an expert QA engineer and BDD specialist.";

/// Fixed sampling temperature for scenario generation.
const TEMPERATURE: f64 = 0.7;

/// Build the user prompt embedding title and criteria verbatim.
pub fn build_prompt(title: &str, acceptance_criteria: &str) -> String {
    format!(
        r#"
I have an Azure DevOps work item titled "{title}".
The Acceptance Criteria is:
{acceptance_criteria}

Please generate a Gherkin feature file for this work item.
- Create at least 5 test cases.
- Include both POSITIVE and NEGATIVE test cases.
- Format the output strictly in standard Gherkin syntax (Feature, Scenario, Given, When, Then).
- Do not include any markdown code blocks (like ```gherkin), just output the raw Gherkin text.
"#
    )
}

/// Client for the completion service.
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    client: reqwest::Client,
    base_url: Url,
    model: String,
}

impl ScenarioGenerator {
    pub fn new(client: reqwest::Client, base_url: Url, model: String) -> Self {
        Self { client, base_url, model }
    }

    /// Issue exactly one completion call and return the sanitized Gherkin.
    ///
    /// The caller-supplied API key is passed through as a bearer token and
    /// never stored. Any failure of the call, and output that is empty once
    /// code fences are stripped, becomes [`Error::Generation`].
    #[tracing::instrument(skip_all, fields(title = %title, model = %self.model))]
    pub async fn generate(&self, title: &str, acceptance_criteria: &str, api_key: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.as_str().trim_end_matches('/'));
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(title, acceptance_criteria) }
            ],
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::generation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!(
                "completion service returned HTTP {}: {body}",
                status.as_u16()
            )));
        }

        let completion: CreateChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("failed to parse completion response: {e}")))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        let gherkin = strip_code_fence(&content);
        if gherkin.is_empty() {
            return Err(Error::generation("completion response contained no usable content"));
        }

        tracing::debug!(chars = gherkin.len(), "Generated Gherkin scenarios");
        Ok(gherkin)
    }
}
