//! Persistence of projects, generations, activities and outputs.
//!
//! Writes are best-effort: a store never returns an error from a write, it
//! logs and reports `None`/`false` instead, so persistence trouble cannot
//! abort a workflow. Read queries used by the HTTP listing endpoints do
//! return [`StoreError`].

pub mod memory;
pub mod rest;

use crate::config::SowgenConfig;
use crate::takeoff::TakeoffData;
use crate::template::normalize::normalize_work_type;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub use memory::MemoryStore;
pub use rest::RestStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store is not connected")]
    NotConnected,

    #[error("HTTP request to {table} failed: {source}")]
    Http {
        table: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{table} returned status {status}: {body}")]
    Status {
        table: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {table} rows: {source}")]
    Decode {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

pub const PROJECTS_TABLE: &str = "projects";
pub const GENERATIONS_TABLE: &str = "sow_generations";
pub const ACTIVITIES_TABLE: &str = "workflow_activities";
pub const OUTPUTS_TABLE: &str = "sow_outputs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationStatus::Pending => "pending",
            GenerationStatus::Processing => "processing",
            GenerationStatus::Completed => "completed",
            GenerationStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationStatus::Completed | GenerationStatus::Failed)
    }

    /// pending -> processing -> completed | failed; failure is allowed from
    /// any non-terminal state.
    pub fn can_transition_to(self, next: GenerationStatus) -> bool {
        use GenerationStatus::*;
        matches!(
            (self, next),
            (Pending, Processing) | (Processing, Completed) | (Pending | Processing, Failed)
        )
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub project_id: String,
    pub activity_type: String,
    pub stage_from: Option<String>,
    pub stage_to: Option<String>,
    pub notes: Option<String>,
    pub metadata: Value,
}

impl ActivityRecord {
    pub fn new(project_id: impl Into<String>, activity_type: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            activity_type: activity_type.into(),
            stage_from: None,
            stage_to: None,
            notes: None,
            metadata: json!({}),
        }
    }

    pub fn stages(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.stage_from = Some(from.into());
        self.stage_to = Some(to.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SowOutputRecord {
    pub project_id: String,
    pub template_name: String,
    pub file_url: Option<String>,
    pub filename: Option<String>,
    pub engineering_summary: Option<Value>,
    pub metadata: Value,
}

/// Row shape returned by [`ProjectStore::recent_projects`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectListing {
    pub id: String,
    pub project_name: String,
    pub address: String,
    pub roof_area: f64,
    pub current_stage: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Row shape returned by [`ProjectStore::recent_generations`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationListing {
    pub id: String,
    pub project_id: String,
    pub template_type: String,
    pub status: GenerationStatus,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

/// Column values for a new `projects` row.
pub fn project_row(id: &str, takeoff: &TakeoffData) -> Value {
    json!({
        "id": id,
        "project_name": takeoff.project_name.clone().unwrap_or_default(),
        "address": takeoff.address.clone().unwrap_or_default(),
        "square_footage": takeoff.roof_area_or_zero() as i64,
        "building_height": takeoff.building_height.unwrap_or(0.0) as i64,
        "project_type": normalize_work_type(takeoff.project_type_text()).as_str(),
        "deck_type": takeoff.deck_type.clone(),
        "exposure_category": takeoff.wind_zone.clone(),
        "insulation_type": takeoff.insulation_type.clone(),
        "insulation_thickness": takeoff.insulation_thickness,
        "current_stage": "inspection",
        "stage_data": takeoff.to_value(),
    })
}

pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Endpoint shown in health output, if any.
    fn endpoint(&self) -> Option<&str> {
        None
    }

    async fn create_project(&self, takeoff: &TakeoffData) -> Option<String>;

    async fn create_sow_generation(
        &self,
        project_id: &str,
        template_type: &str,
        input: &Value,
    ) -> Option<String>;

    async fn update_generation_status(
        &self,
        generation_id: &str,
        status: GenerationStatus,
        error_message: Option<&str>,
    ) -> bool;

    async fn log_activity(&self, activity: ActivityRecord) -> bool;

    async fn create_sow_output(&self, output: SowOutputRecord) -> Option<String>;

    async fn recent_projects(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ProjectListing>, StoreError>;

    async fn recent_generations(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<GenerationListing>, StoreError>;
}

/// Store used when no endpoint is configured. Every write is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisconnectedStore;

#[async_trait]
impl ProjectStore for DisconnectedStore {
    fn is_connected(&self) -> bool {
        false
    }

    async fn create_project(&self, _takeoff: &TakeoffData) -> Option<String> {
        warn!("Store not connected, skipping project creation");
        None
    }

    async fn create_sow_generation(
        &self,
        _project_id: &str,
        _template_type: &str,
        _input: &Value,
    ) -> Option<String> {
        warn!("Store not connected, skipping generation creation");
        None
    }

    async fn update_generation_status(
        &self,
        _generation_id: &str,
        _status: GenerationStatus,
        _error_message: Option<&str>,
    ) -> bool {
        warn!("Store not connected, skipping status update");
        false
    }

    async fn log_activity(&self, _activity: ActivityRecord) -> bool {
        warn!("Store not connected, skipping activity log");
        false
    }

    async fn create_sow_output(&self, _output: SowOutputRecord) -> Option<String> {
        warn!("Store not connected, skipping output creation");
        None
    }

    async fn recent_projects(&self, _: usize, _: usize) -> Result<Vec<ProjectListing>, StoreError> {
        Err(StoreError::NotConnected)
    }

    async fn recent_generations(
        &self,
        _: usize,
        _: usize,
    ) -> Result<Vec<GenerationListing>, StoreError> {
        Err(StoreError::NotConnected)
    }
}

/// Builds the store described by the configuration. A missing endpoint or a
/// client that fails to build yields a [`DisconnectedStore`].
pub fn store_from_config(config: &SowgenConfig) -> Arc<dyn ProjectStore> {
    let (Some(url), Some(key)) = (config.store_url.as_deref(), config.store_key.as_deref()) else {
        info!("No store endpoint configured, running without persistence");
        return Arc::new(DisconnectedStore);
    };

    match RestStore::new(url, key, config.request_timeout()) {
        Ok(store) => {
            info!(endpoint = url, "Store client initialized");
            Arc::new(store)
        }
        Err(e) => {
            warn!(error = %e, "Failed to initialize store client, running without persistence");
            Arc::new(DisconnectedStore)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use GenerationStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Failed));
        assert!(!Completed.can_transition_to(Processing));
        assert!(!Pending.can_transition_to(Completed));
        assert!(Failed.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&GenerationStatus::Processing).unwrap(),
            "\"processing\""
        );
    }

    #[test]
    fn test_project_row() {
        let takeoff = TakeoffData {
            project_name: Some("Warehouse 12".to_string()),
            roof_area: Some(25000.7),
            project_type: Some("Tear-off".to_string()),
            ..Default::default()
        };
        let row = project_row("p1", &takeoff);
        assert_eq!(row["square_footage"], 25000);
        assert_eq!(row["project_type"], "tearoff");
        assert_eq!(row["stage_data"]["project_name"], "Warehouse 12");
    }

    #[tokio::test]
    async fn test_disconnected_store_skips_writes() {
        let store = DisconnectedStore;
        assert!(!store.is_connected());
        assert!(store.create_project(&TakeoffData::default()).await.is_none());
        assert!(!store.log_activity(ActivityRecord::new("p", "validation")).await);
        assert!(matches!(
            store.recent_projects(10, 0).await,
            Err(StoreError::NotConnected)
        ));
    }

    #[test]
    fn test_store_from_config_without_endpoint() {
        let config = SowgenConfig {
            store_url: None,
            ..SowgenConfig::default()
        };
        assert!(!store_from_config(&config).is_connected());
    }
}
