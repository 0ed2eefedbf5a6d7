//! Per-submission state shared by the workflow phases.

use super::paths::DataPaths;
use crate::progress::{ProgressEvent, ProgressHandler};
use crate::store::ProjectStore;
use crate::summary::PlaceholderDocument;
use crate::takeoff::TakeoffData;
use crate::template::{CompatibilityReport, SelectionResult};
use crate::validation::ValidationReport;
use crate::summary::SowSummary;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// A JSON artifact written by a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFile {
    pub file_path: PathBuf,
    pub filename: String,
    pub size_bytes: usize,
}

/// Outcome of one best-effort store write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStep {
    pub success: bool,
    pub id: Option<String>,
    pub message: String,
}

impl StoreStep {
    pub fn created(id: Option<String>, what: &str) -> Self {
        match id {
            Some(id) => Self {
                success: true,
                id: Some(id),
                message: format!("{} created", what),
            },
            None => Self::skipped(format!("{} not created", what)),
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStep {
    pub file: SavedFile,
    pub estimated_duration: String,
    pub material_count: usize,
    pub section_count: usize,
}

/// What each phase produced, keyed the way results are reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSteps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_takeoff: Option<SavedFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_project: Option<StoreStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<ValidationReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_generation: Option<StoreStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_sow: Option<SummaryStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_pdf: Option<PlaceholderDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_output: Option<StoreStep>,
}

pub struct WorkflowContext {
    pub workflow_id: String,
    pub timestamp: String,
    /// Submission exactly as received.
    pub raw: Value,
    /// Typed view of `raw`, set once validation passes.
    pub takeoff: Option<TakeoffData>,
    pub paths: DataPaths,
    pub store: Arc<dyn ProjectStore>,
    progress: Option<Arc<dyn ProgressHandler>>,

    pub project_id: Option<String>,
    pub generation_id: Option<String>,
    pub selection: Option<SelectionResult>,
    pub compatibility: Option<CompatibilityReport>,
    pub summary: Option<SowSummary>,
    pub steps: WorkflowSteps,
}

impl WorkflowContext {
    pub fn new(
        workflow_id: String,
        timestamp: String,
        raw: Value,
        paths: DataPaths,
        store: Arc<dyn ProjectStore>,
        progress: Option<Arc<dyn ProgressHandler>>,
    ) -> Self {
        Self {
            workflow_id,
            timestamp,
            raw,
            takeoff: None,
            paths,
            store,
            progress,
            project_id: None,
            generation_id: None,
            selection: None,
            compatibility: None,
            summary: None,
            steps: WorkflowSteps::default(),
        }
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress {
            handler.on_progress(&event);
        }
    }

    pub fn validation(&self) -> Option<&ValidationReport> {
        self.steps.validate.as_ref()
    }
}
