//! HTTP facade over the workflow, validation and template selection.

pub mod error;
pub mod routes;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::SowgenConfig;
use crate::store::store_from_config;
use crate::workflow::WorkflowOrchestrator;

pub use error::{ApiError, ErrorResponse};

/// Origins of the local front-end dev servers.
pub const DEV_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:8080",
];

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<WorkflowOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: WorkflowOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = DEV_ORIGINS
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/api/health", get(routes::health))
        .route("/api/submit-takeoff", post(routes::submit_takeoff))
        .route("/api/validate-only", post(routes::validate_only))
        .route("/api/workflow/:workflow_id", get(routes::workflow_status))
        .route("/api/templates", get(routes::list_templates))
        .route("/api/select-template", post(routes::select_template))
        .route(
            "/api/templates/:template_id/compatibility",
            post(routes::template_compatibility),
        )
        .route("/api/database/projects", get(routes::database_projects))
        .route(
            "/api/database/sow-generations",
            get(routes::database_generations),
        )
        .route("/api/download/pdf/:filename", get(routes::download_document))
        .route("/api/recent-workflows", get(routes::recent_workflows))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
}

/// Binds the configured address and serves until the process stops.
pub async fn serve(config: &SowgenConfig) -> Result<()> {
    let orchestrator = WorkflowOrchestrator::new(config.data_dir.clone(), store_from_config(config))?;
    let app = router(AppState::new(orchestrator));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(address = %addr, data_dir = %config.data_dir.display(), "SOW API listening");
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
