//! PostgREST-style HTTP store.

use super::{
    new_record_id, now_rfc3339, project_row, ActivityRecord, GenerationListing, GenerationStatus,
    ProjectListing, ProjectStore, SowOutputRecord, StoreError, ACTIVITIES_TABLE,
    GENERATIONS_TABLE, OUTPUTS_TABLE, PROJECTS_TABLE,
};
use crate::takeoff::TakeoffData;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info};

pub struct RestStore {
    base_url: String,
    api_key: String,
    http_client: Client,
}

#[derive(Deserialize)]
struct ProjectRow {
    id: String,
    #[serde(default)]
    project_name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    square_footage: Option<f64>,
    #[serde(default)]
    current_stage: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl From<ProjectRow> for ProjectListing {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            project_name: row.project_name.unwrap_or_default(),
            address: row.address.unwrap_or_default(),
            roof_area: row.square_footage.unwrap_or(0.0),
            current_stage: row.current_stage.unwrap_or_else(|| "unknown".to_string()),
            updated_at: row.updated_at.or_else(|| row.created_at.clone()),
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
struct GenerationRow {
    id: String,
    inspection_id: String,
    template_type: String,
    generation_status: GenerationStatus,
    #[serde(default)]
    generation_started_at: Option<String>,
    #[serde(default)]
    generation_completed_at: Option<String>,
}

impl From<GenerationRow> for GenerationListing {
    fn from(row: GenerationRow) -> Self {
        Self {
            id: row.id,
            project_id: row.inspection_id,
            template_type: row.template_type,
            status: row.generation_status,
            started_at: row.generation_started_at,
            completed_at: row.generation_completed_at,
        }
    }
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoreError::Client)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http_client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, table: &'static str, request: RequestBuilder) -> Result<Value, StoreError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|source| StoreError::Http { table, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| StoreError::Http { table, source })?;

        if !status.is_success() {
            return Err(StoreError::Status {
                table,
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|source| StoreError::Decode { table, source })
    }

    async fn insert(&self, table: &'static str, row: Value) -> Result<(), StoreError> {
        debug!(table, "Inserting row");
        let request = self
            .http_client
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(&row);
        self.send(table, request).await.map(|_| ())
    }

    async fn update(&self, table: &'static str, id: &str, changes: Value) -> Result<(), StoreError> {
        debug!(table, id, "Updating row");
        let request = self
            .http_client
            .patch(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(&changes);
        self.send(table, request).await.map(|_| ())
    }

    async fn select<T: serde::de::DeserializeOwned>(
        &self,
        table: &'static str,
        columns: &str,
        order: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<T>, StoreError> {
        let request = self.http_client.get(self.table_url(table)).query(&[
            ("select", columns.to_string()),
            ("order", order.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ]);
        let rows = self.send(table, request).await?;
        if rows.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(rows).map_err(|source| StoreError::Decode { table, source })
    }
}

#[async_trait]
impl ProjectStore for RestStore {
    fn is_connected(&self) -> bool {
        true
    }

    fn endpoint(&self) -> Option<&str> {
        Some(&self.base_url)
    }

    async fn create_project(&self, takeoff: &TakeoffData) -> Option<String> {
        let id = new_record_id();
        match self.insert(PROJECTS_TABLE, project_row(&id, takeoff)).await {
            Ok(()) => {
                info!(project_id = %id, "Project created");
                Some(id)
            }
            Err(e) => {
                error!(error = %e, "Failed to create project");
                None
            }
        }
    }

    async fn create_sow_generation(
        &self,
        project_id: &str,
        template_type: &str,
        input: &Value,
    ) -> Option<String> {
        let id = new_record_id();
        let row = json!({
            "id": id,
            "inspection_id": project_id,
            "template_type": template_type,
            "generation_status": GenerationStatus::Pending,
            "input_data": input,
            "generation_started_at": now_rfc3339(),
        });
        match self.insert(GENERATIONS_TABLE, row).await {
            Ok(()) => {
                info!(generation_id = %id, template_type, "Generation created");
                Some(id)
            }
            Err(e) => {
                error!(error = %e, "Failed to create generation");
                None
            }
        }
    }

    async fn update_generation_status(
        &self,
        generation_id: &str,
        status: GenerationStatus,
        error_message: Option<&str>,
    ) -> bool {
        let now = now_rfc3339();
        let mut changes = json!({
            "generation_status": status,
            "updated_at": now,
        });
        match (status, error_message) {
            (GenerationStatus::Completed, _) => {
                changes["generation_completed_at"] = json!(now);
            }
            (GenerationStatus::Failed, Some(message)) => {
                changes["error_message"] = json!(message);
            }
            _ => {}
        }

        match self.update(GENERATIONS_TABLE, generation_id, changes).await {
            Ok(()) => {
                info!(generation_id, %status, "Generation status updated");
                true
            }
            Err(e) => {
                error!(generation_id, error = %e, "Failed to update generation status");
                false
            }
        }
    }

    async fn log_activity(&self, activity: ActivityRecord) -> bool {
        let activity_type = activity.activity_type.clone();
        let row = json!({
            "id": new_record_id(),
            "project_id": activity.project_id,
            "activity_type": activity.activity_type,
            "stage_from": activity.stage_from,
            "stage_to": activity.stage_to,
            "notes": activity.notes,
            "metadata": activity.metadata,
            "data_changes": {},
        });
        match self.insert(ACTIVITIES_TABLE, row).await {
            Ok(()) => {
                debug!(activity_type, "Activity logged");
                true
            }
            Err(e) => {
                error!(activity_type, error = %e, "Failed to log activity");
                false
            }
        }
    }

    async fn create_sow_output(&self, output: SowOutputRecord) -> Option<String> {
        let id = new_record_id();
        let row = json!({
            "id": id,
            "project_id": output.project_id,
            "template_name": output.template_name,
            "file_url": output.file_url,
            "filename": output.filename,
            "engineering_summary": output.engineering_summary,
            "metadata": output.metadata,
        });
        match self.insert(OUTPUTS_TABLE, row).await {
            Ok(()) => {
                info!(output_id = %id, "Output record created");
                Some(id)
            }
            Err(e) => {
                error!(error = %e, "Failed to create output record");
                None
            }
        }
    }

    async fn recent_projects(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ProjectListing>, StoreError> {
        let rows: Vec<ProjectRow> = self
            .select(
                PROJECTS_TABLE,
                "id,project_name,address,square_footage,current_stage,created_at,updated_at",
                "created_at.desc",
                limit,
                offset,
            )
            .await?;
        Ok(rows.into_iter().map(ProjectListing::from).collect())
    }

    async fn recent_generations(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<GenerationListing>, StoreError> {
        let rows: Vec<GenerationRow> = self
            .select(
                GENERATIONS_TABLE,
                "id,inspection_id,template_type,generation_status,generation_started_at,generation_completed_at",
                "generation_started_at.desc",
                limit,
                offset,
            )
            .await?;
        Ok(rows.into_iter().map(GenerationListing::from).collect())
    }
}
