use super::context::{StoreStep, WorkflowContext, WorkflowSteps};
use super::paths::{files_containing, is_plain_filename, workflow_id_from_filename, DataPaths};
use super::phase_trait::{PhaseOutcome, WorkflowPhase};
use super::phases::default_phases;
use super::{new_workflow_id, workflow_timestamp, WorkflowError, WorkflowStatus};
use crate::progress::{ProgressEvent, ProgressHandler};
use crate::store::{ActivityRecord, GenerationStatus, ProjectStore};
use crate::template::{CompatibilityReport, SelectionResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime};
use tracing::{debug, error, info};

/// Outcome of one submission, as returned to CLI and HTTP callers.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub workflow_id: String,
    pub timestamp: String,
    pub status: WorkflowStatus,
    pub project_id: Option<String>,
    pub generation_id: Option<String>,
    pub validation_passed: bool,
    pub validation_errors: Vec<String>,
    pub validation_warnings: Vec<String>,
    pub template: Option<SelectionResult>,
    pub compatibility: Option<CompatibilityReport>,
    pub download_url: Option<String>,
    pub error_message: Option<String>,
    pub database_connected: bool,
    pub database_operations: BTreeMap<String, StoreStep>,
    pub steps: WorkflowSteps,
}

impl WorkflowResult {
    fn from_context(ctx: WorkflowContext, status: WorkflowStatus, error: Option<String>) -> Self {
        let validation = ctx.steps.validate.clone().unwrap_or_default();

        let mut database_operations = BTreeMap::new();
        if let Some(step) = &ctx.steps.create_project {
            database_operations.insert("create_project".to_string(), step.clone());
        }
        if let Some(step) = &ctx.steps.create_generation {
            database_operations.insert("create_generation".to_string(), step.clone());
        }

        let download_url = match status {
            WorkflowStatus::Success => ctx.steps.create_pdf.as_ref().map(|d| d.download_url.clone()),
            _ => None,
        };

        Self {
            workflow_id: ctx.workflow_id,
            timestamp: ctx.timestamp,
            status,
            project_id: ctx.project_id,
            generation_id: ctx.generation_id,
            validation_passed: validation.is_valid,
            validation_errors: validation.errors,
            validation_warnings: validation.warnings,
            template: ctx.selection,
            compatibility: ctx.compatibility,
            download_url,
            error_message: error,
            database_connected: ctx.store.is_connected(),
            database_operations,
            steps: ctx.steps,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == WorkflowStatus::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    Completed,
    InProgress,
}

impl ArtifactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactStatus::Completed => "completed",
            ArtifactStatus::InProgress => "in_progress",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowFiles {
    pub takeoff: Vec<String>,
    pub sow: Vec<String>,
    pub pdf: Vec<String>,
}

impl WorkflowFiles {
    fn is_empty(&self) -> bool {
        self.takeoff.is_empty() && self.sow.is_empty() && self.pdf.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStatusReport {
    pub workflow_id: String,
    pub files_found: WorkflowFiles,
    pub status: ArtifactStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentWorkflow {
    pub workflow_id: String,
    pub filename: String,
    pub project_name: String,
    /// File modification time, RFC 3339.
    pub created: String,
    pub roof_area: f64,
    pub membrane_type: String,
}

pub struct WorkflowOrchestrator {
    paths: DataPaths,
    store: Arc<dyn ProjectStore>,
    phases: Vec<Box<dyn WorkflowPhase>>,
    progress: Option<Arc<dyn ProgressHandler>>,
}

impl WorkflowOrchestrator {
    /// Creates the artifact directories under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>, store: Arc<dyn ProjectStore>) -> Result<Self> {
        let paths = DataPaths::new(data_dir);
        paths.ensure()?;
        Ok(Self {
            paths,
            store,
            phases: default_phases(),
            progress: None,
        })
    }

    pub fn with_progress(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress = Some(handler);
        self
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn store(&self) -> &Arc<dyn ProjectStore> {
        &self.store
    }

    /// Runs a submission through every phase. Never fails: errors come back
    /// as a result with status `error`.
    pub async fn process_submission(&self, raw: Value) -> WorkflowResult {
        let start = Instant::now();
        let mut ctx = WorkflowContext::new(
            new_workflow_id(),
            workflow_timestamp(),
            raw,
            self.paths.clone(),
            Arc::clone(&self.store),
            self.progress.clone(),
        );

        info!(workflow_id = %ctx.workflow_id, "Starting takeoff workflow");
        ctx.emit(ProgressEvent::Started {
            workflow_id: ctx.workflow_id.clone(),
        });

        let (status, error_message) = match self.run_phases(&mut ctx).await {
            Ok(status) => (status, None),
            Err(e) => {
                let message = e.to_string();
                self.record_failure(&ctx, &message).await;
                (WorkflowStatus::Error, Some(message))
            }
        };

        let total_time = start.elapsed();
        info!(
            workflow_id = %ctx.workflow_id,
            status = %status,
            elapsed_ms = total_time.as_millis() as u64,
            "Workflow finished"
        );
        ctx.emit(ProgressEvent::Completed {
            workflow_id: ctx.workflow_id.clone(),
            status: status.to_string(),
            total_time,
        });

        WorkflowResult::from_context(ctx, status, error_message)
    }

    async fn run_phases(&self, ctx: &mut WorkflowContext) -> Result<WorkflowStatus, WorkflowError> {
        for phase in &self.phases {
            let name = phase.name();
            info!("Phase: {}", name);
            ctx.emit(ProgressEvent::PhaseStarted {
                phase: name.to_string(),
            });

            let phase_start = Instant::now();
            let outcome = phase.execute(ctx).await.inspect_err(|e| {
                error!(phase = name, error = %e, "Phase failed");
            })?;
            let duration = phase_start.elapsed();

            debug!(phase = name, elapsed_ms = duration.as_millis() as u64, "Phase complete");
            ctx.emit(ProgressEvent::PhaseComplete {
                phase: name.to_string(),
                duration,
            });

            if let PhaseOutcome::Stop(status) = outcome {
                return Ok(status);
            }
        }
        Ok(WorkflowStatus::Success)
    }

    async fn record_failure(&self, ctx: &WorkflowContext, message: &str) {
        if let Some(generation_id) = &ctx.generation_id {
            self.store
                .update_generation_status(generation_id, GenerationStatus::Failed, Some(message))
                .await;
        }
        if let Some(project_id) = &ctx.project_id {
            let activity = ActivityRecord::new(project_id.as_str(), "workflow_error")
                .notes(format!("Workflow error: {}", message))
                .metadata(json!({ "workflow_id": ctx.workflow_id }));
            self.store.log_activity(activity).await;
        }
        ctx.emit(ProgressEvent::Failed {
            workflow_id: ctx.workflow_id.clone(),
            error: message.to_string(),
        });
    }

    /// Looks up a run by the artifacts it left on disk. `None` when no file
    /// carries the id.
    pub fn workflow_status(&self, workflow_id: &str) -> Result<Option<WorkflowStatusReport>> {
        if !is_plain_filename(workflow_id) {
            return Ok(None);
        }

        let list = |dir: &Path| -> Result<Vec<String>> {
            Ok(files_containing(dir, workflow_id)?
                .into_iter()
                .map(|p| p.display().to_string())
                .collect())
        };
        let files = WorkflowFiles {
            takeoff: list(&self.paths.takeoff_dir)?,
            sow: list(&self.paths.sow_dir)?,
            pdf: list(&self.paths.pdf_dir)?,
        };

        if files.is_empty() {
            return Ok(None);
        }

        let status = if files.pdf.is_empty() {
            ArtifactStatus::InProgress
        } else {
            ArtifactStatus::Completed
        };
        Ok(Some(WorkflowStatusReport {
            workflow_id: workflow_id.to_string(),
            files_found: files,
            status,
        }))
    }

    /// Saved takeoffs, newest first. Unreadable files are skipped.
    pub fn recent_workflows(&self, limit: usize) -> Result<Vec<RecentWorkflow>> {
        let dir = &self.paths.takeoff_dir;
        let mut entries: Vec<(SystemTime, PathBuf)> = Vec::new();
        for entry in
            fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if workflow_id_from_filename(&name).is_none() || !name.ends_with(".json") {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            entries.push((modified, entry.path()));
        }
        entries.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(entries
            .into_iter()
            .filter_map(|(modified, path)| match read_recent(&path, modified) {
                Ok(workflow) => Some(workflow),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping unreadable takeoff");
                    None
                }
            })
            .take(limit)
            .collect())
    }
}

fn read_recent(path: &Path, modified: SystemTime) -> Result<RecentWorkflow> {
    let content = fs::read_to_string(path)?;
    let data: Value = serde_json::from_str(&content)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let workflow_id = workflow_id_from_filename(&filename)
        .unwrap_or("unknown")
        .to_string();

    let text = |key: &str| {
        data.get(key)
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string()
    };

    Ok(RecentWorkflow {
        workflow_id,
        project_name: text("project_name"),
        membrane_type: text("membrane_type"),
        roof_area: data.get("roof_area").and_then(Value::as_f64).unwrap_or(0.0),
        created: chrono::DateTime::<chrono::Utc>::from(modified).to_rfc3339(),
        filename,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DisconnectedStore, MemoryStore};
    use tempfile::TempDir;

    fn valid_takeoff() -> Value {
        json!({
            "project_name": "Distribution Center",
            "address": "1200 Commerce Way, Tampa",
            "roof_area": 42000,
            "membrane_type": "TPO",
            "fastening_pattern": "Mechanically Attached",
            "project_type": "recover",
            "deck_type": "Steel",
        })
    }

    #[tokio::test]
    async fn test_successful_run_without_store() {
        let dir = TempDir::new().unwrap();
        let orchestrator =
            WorkflowOrchestrator::new(dir.path(), Arc::new(DisconnectedStore)).unwrap();

        let result = orchestrator.process_submission(valid_takeoff()).await;

        assert_eq!(result.status, WorkflowStatus::Success, "{:?}", result.error_message);
        assert!(result.validation_passed);
        assert_eq!(result.template.as_ref().unwrap().template_id, "T2");
        assert!(result.project_id.is_none());
        assert!(!result.database_connected);
        let url = result.download_url.unwrap();
        assert!(url.starts_with("/api/download/pdf/sow_document_"));
    }

    #[tokio::test]
    async fn test_validation_failure_stops_run() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let orchestrator = WorkflowOrchestrator::new(dir.path(), store.clone()).unwrap();

        let result = orchestrator
            .process_submission(json!({ "project_name": "No address" }))
            .await;

        assert_eq!(result.status, WorkflowStatus::ValidationFailed);
        assert!(!result.validation_passed);
        assert!(!result.validation_errors.is_empty());
        assert!(result.template.is_none());
        assert!(result.download_url.is_none());
        assert!(store.generations().is_empty());

        let report = orchestrator.workflow_status(&result.workflow_id).unwrap().unwrap();
        assert_eq!(report.status, ArtifactStatus::InProgress);
        assert_eq!(report.files_found.takeoff.len(), 1);
    }

    #[tokio::test]
    async fn test_status_of_completed_run() {
        let dir = TempDir::new().unwrap();
        let orchestrator =
            WorkflowOrchestrator::new(dir.path(), Arc::new(DisconnectedStore)).unwrap();
        let result = orchestrator.process_submission(valid_takeoff()).await;

        let report = orchestrator.workflow_status(&result.workflow_id).unwrap().unwrap();
        assert_eq!(report.status, ArtifactStatus::Completed);
        assert_eq!(report.files_found.sow.len(), 1);
        assert!(orchestrator.workflow_status("ffffffff").unwrap().is_none());
        assert!(orchestrator.workflow_status("").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recent_workflows() {
        let dir = TempDir::new().unwrap();
        let orchestrator =
            WorkflowOrchestrator::new(dir.path(), Arc::new(DisconnectedStore)).unwrap();
        let result = orchestrator.process_submission(valid_takeoff()).await;
        fs::write(orchestrator.paths().takeoff_dir.join("takeoff_broken_1.json"), "{").unwrap();

        let recent = orchestrator.recent_workflows(10).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].workflow_id, result.workflow_id);
        assert_eq!(recent[0].project_name, "Distribution Center");
        assert_eq!(recent[0].roof_area, 42000.0);
    }
}
