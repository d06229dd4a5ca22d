//! The generation endpoint: validate, fetch, generate, persist, respond.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::AppState;
use crate::api::models::generate::{GenerateRequest, GenerateResponse};
use crate::errors::{Error, Result};
use crate::filename::to_safe_filename;

/// Run the whole pipeline for one work item.
///
/// The stages run strictly in order - validate, fetch, generate, persist -
/// and the first failing stage short-circuits into an error response via
/// [`Error`]'s `IntoResponse`. A body that does not deserialize into
/// [`GenerateRequest`] is treated as a validation failure, not a 422.
#[utoipa::path(
    post,
    path = "/generate",
    tag = "generation",
    summary = "Generate Gherkin scenarios for a work item",
    description = "Fetches a work item's acceptance criteria from the tracking service, asks the \
                   completion service for Gherkin scenarios, and stores them as a .feature file",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Feature file generated", body = GenerateResponse),
        (status = 400, description = "Missing required input or empty acceptance criteria"),
        (status = 500, description = "Connectivity, generation or storage failure"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn generate_feature(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>> {
    let Json(request) = payload.map_err(|rejection| Error::validation(rejection.body_text()))?;
    request.validate()?;

    let work_item = state
        .work_items
        .fetch(
            &request.organization,
            &request.project,
            &request.work_item_id.to_string(),
            &request.access_token,
        )
        .await?;

    let gherkin = state
        .generator
        .generate(&work_item.title, &work_item.acceptance_criteria, &request.model_api_key)
        .await?;

    let filename = format!("{}.feature", to_safe_filename(&work_item.title));
    let path = state.store.write_feature(&filename, &gherkin).await?;

    tracing::info!(filename = %filename, "Feature file generated");

    Ok(Json(GenerateResponse {
        success: true,
        message: "Feature file generated successfully.".to_string(),
        title: work_item.title,
        filename,
        content: gherkin,
        filepath: path.display().to_string(),
    }))
}
