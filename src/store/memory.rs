//! In-process store. Keeps every record in memory; used by tests and by
//! local runs that want persistence calls exercised without a database.

use super::{
    new_record_id, now_rfc3339, project_row, ActivityRecord, GenerationListing, GenerationStatus,
    ProjectListing, ProjectStore, SowOutputRecord, StoreError,
};
use crate::takeoff::TakeoffData;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredProject {
    pub id: String,
    pub row: Value,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredGeneration {
    pub id: String,
    pub project_id: String,
    pub template_type: String,
    pub status: GenerationStatus,
    pub input_data: Value,
    pub error_message: Option<String>,
    pub started_at: String,
    pub completed_at: Option<String>,
    /// Every status the generation has held, oldest first.
    pub history: Vec<GenerationStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredOutput {
    pub id: String,
    pub record: SowOutputRecord,
}

#[derive(Default)]
struct MemoryState {
    projects: Vec<StoredProject>,
    generations: Vec<StoredGeneration>,
    activities: Vec<ActivityRecord>,
    outputs: Vec<StoredOutput>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // a panic while holding the lock leaves plain data behind; keep going
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn projects(&self) -> Vec<StoredProject> {
        self.lock().projects.clone()
    }

    pub fn generations(&self) -> Vec<StoredGeneration> {
        self.lock().generations.clone()
    }

    pub fn generation(&self, id: &str) -> Option<StoredGeneration> {
        self.lock().generations.iter().find(|g| g.id == id).cloned()
    }

    pub fn activities(&self) -> Vec<ActivityRecord> {
        self.lock().activities.clone()
    }

    pub fn outputs(&self) -> Vec<StoredOutput> {
        self.lock().outputs.clone()
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    fn is_connected(&self) -> bool {
        true
    }

    fn endpoint(&self) -> Option<&str> {
        Some("memory")
    }

    async fn create_project(&self, takeoff: &TakeoffData) -> Option<String> {
        let id = new_record_id();
        let row = project_row(&id, takeoff);
        self.lock().projects.push(StoredProject {
            id: id.clone(),
            row,
            created_at: now_rfc3339(),
        });
        Some(id)
    }

    async fn create_sow_generation(
        &self,
        project_id: &str,
        template_type: &str,
        input: &Value,
    ) -> Option<String> {
        let id = new_record_id();
        self.lock().generations.push(StoredGeneration {
            id: id.clone(),
            project_id: project_id.to_string(),
            template_type: template_type.to_string(),
            status: GenerationStatus::Pending,
            input_data: input.clone(),
            error_message: None,
            started_at: now_rfc3339(),
            completed_at: None,
            history: vec![GenerationStatus::Pending],
        });
        Some(id)
    }

    async fn update_generation_status(
        &self,
        generation_id: &str,
        status: GenerationStatus,
        error_message: Option<&str>,
    ) -> bool {
        let mut state = self.lock();
        let Some(generation) = state.generations.iter_mut().find(|g| g.id == generation_id) else {
            warn!(generation_id, "Unknown generation");
            return false;
        };

        if !generation.status.can_transition_to(status) {
            warn!(
                generation_id,
                from = %generation.status,
                to = %status,
                "Rejected generation status transition"
            );
            return false;
        }

        generation.status = status;
        generation.history.push(status);
        match status {
            GenerationStatus::Completed => generation.completed_at = Some(now_rfc3339()),
            GenerationStatus::Failed => generation.error_message = error_message.map(str::to_string),
            _ => {}
        }
        true
    }

    async fn log_activity(&self, activity: ActivityRecord) -> bool {
        self.lock().activities.push(activity);
        true
    }

    async fn create_sow_output(&self, output: SowOutputRecord) -> Option<String> {
        let id = new_record_id();
        self.lock().outputs.push(StoredOutput {
            id: id.clone(),
            record: output,
        });
        Some(id)
    }

    async fn recent_projects(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ProjectListing>, StoreError> {
        let state = self.lock();
        Ok(state
            .projects
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .map(|p| ProjectListing {
                id: p.id.clone(),
                project_name: p.row["project_name"].as_str().unwrap_or_default().to_string(),
                address: p.row["address"].as_str().unwrap_or_default().to_string(),
                roof_area: p.row["square_footage"].as_f64().unwrap_or(0.0),
                current_stage: p.row["current_stage"]
                    .as_str()
                    .unwrap_or("unknown")
                    .to_string(),
                created_at: Some(p.created_at.clone()),
                updated_at: Some(p.created_at.clone()),
            })
            .collect())
    }

    async fn recent_generations(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<GenerationListing>, StoreError> {
        let state = self.lock();
        Ok(state
            .generations
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .map(|g| GenerationListing {
                id: g.id.clone(),
                project_id: g.project_id.clone(),
                template_type: g.template_type.clone(),
                status: g.status,
                started_at: Some(g.started_at.clone()),
                completed_at: g.completed_at.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_generation_lifecycle() {
        let store = MemoryStore::new();
        let id = store
            .create_sow_generation("p1", "T2", &json!({}))
            .await
            .unwrap();

        assert!(store.update_generation_status(&id, GenerationStatus::Processing, None).await);
        assert!(store.update_generation_status(&id, GenerationStatus::Completed, None).await);

        let generation = store.generation(&id).unwrap();
        assert_eq!(
            generation.history,
            vec![
                GenerationStatus::Pending,
                GenerationStatus::Processing,
                GenerationStatus::Completed
            ]
        );
        assert!(generation.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_invalid_transition_rejected() {
        let store = MemoryStore::new();
        let id = store
            .create_sow_generation("p1", "T2", &json!({}))
            .await
            .unwrap();
        assert!(!store.update_generation_status(&id, GenerationStatus::Completed, None).await);
        assert!(!store.update_generation_status("missing", GenerationStatus::Failed, None).await);
    }

    #[tokio::test]
    async fn test_failed_records_message() {
        let store = MemoryStore::new();
        let id = store
            .create_sow_generation("p1", "T2", &json!({}))
            .await
            .unwrap();
        store
            .update_generation_status(&id, GenerationStatus::Failed, Some("disk full"))
            .await;
        assert_eq!(
            store.generation(&id).unwrap().error_message.as_deref(),
            Some("disk full")
        );
    }

    #[tokio::test]
    async fn test_recent_projects_newest_first() {
        let store = MemoryStore::new();
        for name in ["first", "second", "third"] {
            let takeoff = TakeoffData {
                project_name: Some(name.to_string()),
                ..Default::default()
            };
            store.create_project(&takeoff).await;
        }

        let recent = store.recent_projects(2, 0).await.unwrap();
        let names: Vec<&str> = recent.iter().map(|p| p.project_name.as_str()).collect();
        assert_eq!(names, vec!["third", "second"]);

        let page = store.recent_projects(10, 2).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].project_name, "first");
    }
}
