use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::error::ApiError;
use super::AppState;
use crate::store::StoreError;
use crate::takeoff::TakeoffData;
use crate::template::{self, CompatibilityReport};
use crate::validation::TakeoffValidator;
use crate::workflow::WorkflowResult;

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

fn default_limit() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl PageQuery {
    fn limit(&self) -> usize {
        self.limit.min(MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Deserialize)]
pub struct TemplateQuery {
    pub work_type: Option<String>,
    pub membrane_type: Option<String>,
}

fn store_query_error(e: StoreError) -> ApiError {
    match e {
        StoreError::NotConnected => ApiError::unavailable("Database not connected"),
        other => ApiError::internal(format!("Database query error: {}", other)),
    }
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "SOW Generation API is running",
        "status": "healthy",
    }))
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let store = state.orchestrator.store();
    let connected = store.is_connected();
    Json(json!({
        "status": "healthy",
        "service": "sowgen",
        "version": crate::VERSION,
        "database": {
            "connected": connected,
            "url": store.endpoint().filter(|_| connected).unwrap_or("Not connected"),
        },
        "endpoints": {
            "submit_takeoff": "/api/submit-takeoff",
            "validate_only": "/api/validate-only",
            "workflow_status": "/api/workflow/{workflow_id}",
            "templates": "/api/templates",
            "select_template": "/api/select-template",
            "download_pdf": "/api/download/pdf/{filename}",
            "recent_workflows": "/api/recent-workflows",
            "database_projects": "/api/database/projects",
        },
    }))
}

/// POST /api/submit-takeoff
pub async fn submit_takeoff(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Json<WorkflowResult> {
    let result = state.orchestrator.process_submission(raw).await;
    info!(
        workflow_id = %result.workflow_id,
        status = %result.status,
        "Takeoff submission processed"
    );
    Json(result)
}

/// POST /api/validate-only
pub async fn validate_only(State(state): State<AppState>, Json(raw): Json<Value>) -> Json<Value> {
    let report = TakeoffValidator::new().validate_value(&raw);
    Json(json!({
        "is_valid": report.is_valid,
        "error_count": report.errors.len(),
        "warning_count": report.warnings.len(),
        "errors": report.errors,
        "warnings": report.warnings,
        "database_connected": state.orchestrator.store().is_connected(),
    }))
}

/// GET /api/workflow/:workflow_id
pub async fn workflow_status(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let report = state
        .orchestrator
        .workflow_status(&workflow_id)?
        .ok_or_else(|| ApiError::not_found("Workflow not found"))?;

    let mut body = serde_json::to_value(&report).map_err(anyhow::Error::from)?;
    body["database_connected"] = json!(state.orchestrator.store().is_connected());
    Ok(Json(body))
}

/// GET /api/templates
pub async fn list_templates(Query(query): Query<TemplateQuery>) -> Json<Value> {
    let templates =
        template::list_templates(query.work_type.as_deref(), query.membrane_type.as_deref());
    Json(json!({
        "total_count": templates.len(),
        "templates": templates,
    }))
}

/// POST /api/select-template
pub async fn select_template(Json(raw): Json<Value>) -> Json<Value> {
    let takeoff = TakeoffData::from_value_lenient(&raw);
    let selection = template::select_template(&takeoff);
    let compatibility = template::validate_compatibility(selection.template_id, &takeoff);
    Json(json!({
        "selection": selection,
        "compatibility": compatibility,
    }))
}

/// POST /api/templates/:template_id/compatibility
pub async fn template_compatibility(
    Path(template_id): Path<String>,
    Json(raw): Json<Value>,
) -> Json<CompatibilityReport> {
    let takeoff = TakeoffData::from_value_lenient(&raw);
    Json(template::validate_compatibility(&template_id, &takeoff))
}

/// GET /api/database/projects
pub async fn database_projects(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let projects = state
        .orchestrator
        .store()
        .recent_projects(page.limit(), page.offset)
        .await
        .map_err(store_query_error)?;

    Ok(Json(json!({
        "total_retrieved": projects.len(),
        "offset": page.offset,
        "projects": projects,
        "database_connected": true,
    })))
}

/// GET /api/database/sow-generations
pub async fn database_generations(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let generations = state
        .orchestrator
        .store()
        .recent_generations(page.limit(), page.offset)
        .await
        .map_err(store_query_error)?;

    Ok(Json(json!({
        "total_retrieved": generations.len(),
        "offset": page.offset,
        "generations": generations,
        "database_connected": true,
    })))
}

/// GET /api/download/pdf/:filename
pub async fn download_document(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let Some(path) = state.orchestrator.paths().document_path(&filename) else {
        warn!(filename = %filename, "Document not found");
        return Err(ApiError::not_found("PDF file not found"));
    };

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::internal(format!("Error downloading file: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// GET /api/recent-workflows
pub async fn recent_workflows(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let workflows = state.orchestrator.recent_workflows(page.limit())?;
    Ok(Json(json!({
        "total_found": workflows.len(),
        "workflows": workflows,
        "database_connected": state.orchestrator.store().is_connected(),
        "source": "file_system",
    })))
}
