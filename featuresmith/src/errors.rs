//! Error taxonomy for the generation pipeline.
//!
//! Every failure is translated into a response at the API boundary; nothing
//! here is allowed to crash the serving process. Each stage of the pipeline
//! maps its failures onto one variant, and the orchestrator only has to
//! propagate `Result`s.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Missing required input or empty acceptance criteria
    #[error("{message}")]
    Validation { message: String },

    /// The work item service answered with a non-success status
    #[error("work item service returned status {status}")]
    Upstream { status: u16, body: String },

    /// The work item service could not be reached, or its response not read
    #[error("error connecting to work item service: {source}")]
    Connectivity {
        #[source]
        source: reqwest::Error,
    },

    /// The completion call failed or returned no usable content
    #[error("error generating scenarios: {message}")]
    Generation { message: String },

    /// The feature file could not be written
    #[error("failed to store feature file: {source}")]
    Storage {
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation { message: message.into() }
    }

    pub fn connectivity(source: reqwest::Error) -> Self {
        Error::Connectivity { source }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Error::Generation { message: message.into() }
    }

    pub fn storage(source: std::io::Error) -> Self {
        Error::Storage { source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            // The upstream's own status is surfaced to the caller. A code
            // outside the valid HTTP range degrades to 502.
            Error::Upstream { status, .. } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            Error::Connectivity { .. } | Error::Generation { .. } | Error::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message surfaced to the caller.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { message } => message.clone(),
            Error::Upstream { status, body } => {
                format!("Failed to fetch work item. Status: {status}. Response: {body}")
            }
            Error::Connectivity { source } => format!("Error connecting to the work item service: {source}"),
            Error::Generation { message } => format!("Error generating test scenarios: {message}"),
            Error::Storage { .. } => "Failed to store the generated feature file".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details server-side - different levels based on severity
        match &self {
            Error::Connectivity { .. } | Error::Generation { .. } | Error::Storage { .. } => {
                tracing::error!("Pipeline error: {:#}", self);
            }
            Error::Upstream { status, .. } => {
                tracing::warn!(status, "Upstream rejection: {}", self);
            }
            Error::Validation { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

/// Type alias for pipeline results
pub type Result<T> = std::result::Result<T, Error>;
