//! # featuresmith: Gherkin feature files from work item acceptance criteria
//!
//! `featuresmith` is a small HTTP service that turns the acceptance criteria
//! of a tracked work item into behavior-driven test scenarios. Per request it
//! fetches the work item from an Azure DevOps-style tracking service, strips
//! the rich-text markup from its acceptance criteria, asks an
//! OpenAI-compatible chat-completion endpoint to synthesize Gherkin
//! scenarios, and persists the result as a `.feature` file.
//!
//! ## Request Flow
//!
//! The pipeline is strictly linear and request-scoped; nothing is shared
//! across requests except the output directory:
//!
//! 1. The typed request boundary ([`api::models::generate::GenerateRequest`])
//!    rejects unknown fields and blank values before anything leaves the
//!    process.
//! 2. [`workitems::WorkItemClient`] performs one authenticated GET, extracts
//!    title and acceptance criteria (with fallbacks), and sanitizes the
//!    criteria through [`sanitize::strip_markup`]. Empty criteria end the
//!    request with a validation error - no completion call is made.
//! 3. [`generation::ScenarioGenerator`] assembles a deterministic prompt and
//!    issues exactly one completion call at a fixed temperature, then strips
//!    any code-fence wrapper from the model output.
//! 4. [`storage::FeatureStore`] writes `<safe title>.feature` into the
//!    configured output directory, overwriting same-named artifacts.
//!
//! Every failure maps onto one variant of [`errors::Error`] and surfaces as a
//! JSON `{ "error": ... }` response: validation problems as 400, upstream
//! rejections with the upstream's own status, everything else as 500.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use featuresmith::{Application, Config, config::Args};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     featuresmith::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod filename;
pub mod generation;
pub mod openapi;
pub mod sanitize;
pub mod storage;
pub mod telemetry;
pub mod workitems;

pub use config::Config;
pub use errors::{Error, Result};

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use bon::Builder;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};
use utoipa::OpenApi as _;
use utoipa_scalar::{Scalar, Servable as _};

use generation::ScenarioGenerator;
use storage::FeatureStore;
use workitems::WorkItemClient;

/// Shared application state.
///
/// Holds the configuration and the three pipeline services. Everything here
/// is immutable after startup; requests never share mutable state.
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub work_items: WorkItemClient,
    pub generator: ScenarioGenerator,
    pub store: FeatureStore,
}

impl AppState {
    /// Build the state and its HTTP clients from configuration.
    pub fn from_config(config: Config) -> Self {
        let client = reqwest::Client::new();

        let work_items = WorkItemClient::new(
            client.clone(),
            config.devops.base_url.clone(),
            config.devops.api_version.clone(),
        );
        let generator = ScenarioGenerator::new(client, config.openai.base_url.clone(), config.openai.model.clone());
        let store = FeatureStore::new(config.output_dir.clone());

        AppState::builder()
            .config(config)
            .work_items(work_items)
            .generator(generator)
            .store(store)
            .build()
    }
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));
    }

    let mut origins = Vec::new();
    for origin in &config.allowed_origins {
        origins.push(origin.parse::<HeaderValue>()?);
    }
    Ok(CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any))
}

/// Build the application router: the generation API under `/api/v1`, a
/// liveness route, and Scalar-served API docs, wrapped in CORS and tracing
/// middleware.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors_layer = create_cors_layer(&state.config)?;

    let api_routes = Router::new()
        .route("/generate", post(api::handlers::generate::generate_feature))
        .with_state(state);

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", api_routes)
        .merge(Scalar::with_url("/docs", openapi::ApiDoc::openapi()))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

/// The assembled application, ready to serve.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized.
    ///
    /// Ensures the output directory exists exactly once here, at startup,
    /// rather than on every request.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let state = AppState::from_config(config.clone());
        state.store.ensure_output_dir().await?;

        let router = build_router(state)?;
        Ok(Self { router, config })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("featuresmith listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutdown complete");
        Ok(())
    }
}
