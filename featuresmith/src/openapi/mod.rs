//! OpenAPI documentation configuration.
//!
//! The generated document is served through Scalar at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "featuresmith",
        description = "Generates Gherkin feature files from work item acceptance criteria"
    ),
    paths(crate::api::handlers::generate::generate_feature),
    components(schemas(
        crate::api::models::generate::GenerateRequest,
        crate::api::models::generate::GenerateResponse,
    )),
    tags((name = "generation", description = "Scenario generation endpoints"))
)]
pub struct ApiDoc;
