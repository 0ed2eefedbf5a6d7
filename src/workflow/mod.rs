//! Takeoff submission workflow.
//!
//! A submission runs through fixed phases: save the takeoff, create the
//! project record, validate, select a template, create the generation
//! record, render the summary, write the document, and finalize. Store
//! writes are best-effort; validation failure stops the run early; any other
//! error marks the run as failed.

pub mod context;
pub mod orchestrator;
pub mod paths;
pub mod phase_trait;
pub mod phases;

use crate::summary::SummaryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use context::{SavedFile, StoreStep, SummaryStep, WorkflowContext, WorkflowSteps};
pub use orchestrator::{
    ArtifactStatus, RecentWorkflow, WorkflowFiles, WorkflowOrchestrator, WorkflowResult,
    WorkflowStatusReport,
};
pub use paths::DataPaths;
pub use phase_trait::{PhaseOutcome, WorkflowPhase};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Takeoff data could not be read: {0}")]
    InvalidTakeoff(#[source] serde_json::Error),

    #[error("SOW generation failed: {0}")]
    Summary(#[from] SummaryError),

    #[error("{phase} requires {missing}, which an earlier phase did not produce")]
    MissingState {
        phase: &'static str,
        missing: &'static str,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Processing,
    Success,
    ValidationFailed,
    Error,
}

impl WorkflowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStatus::Processing => "processing",
            WorkflowStatus::Success => "success",
            WorkflowStatus::ValidationFailed => "validation_failed",
            WorkflowStatus::Error => "error",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First 8 hex characters of a v4 UUID.
pub fn new_workflow_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Local time as `%Y%m%d_%H%M%S`.
pub fn workflow_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}
