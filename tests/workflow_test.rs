//! End-to-end workflow runs against an in-memory store

use serde_json::{json, Value};
use sowgen::store::{GenerationStatus, MemoryStore};
use sowgen::{WorkflowOrchestrator, WorkflowStatus};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn takeoff() -> Value {
    json!({
        "project_name": "Lakeside Logistics Center",
        "address": "4500 Lakeside Parkway, Orlando FL",
        "roof_area": 86000,
        "membrane_type": "TPO",
        "fastening_pattern": "Mechanically Attached",
        "project_type": "tearoff",
        "deck_type": "Lightweight Concrete",
        "insulation_type": "Polyiso",
        "insulation_thickness": 2.5,
        "building_height": 32,
        "wind_zone": "III",
        "state": "FL",
    })
}

fn setup() -> (TempDir, Arc<MemoryStore>, WorkflowOrchestrator) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new());
    let orchestrator = WorkflowOrchestrator::new(dir.path(), store.clone()).unwrap();
    (dir, store, orchestrator)
}

#[tokio::test]
async fn test_full_run_records_lifecycle() {
    let (_dir, store, orchestrator) = setup();

    let result = orchestrator.process_submission(takeoff()).await;

    assert_eq!(result.status, WorkflowStatus::Success, "{:?}", result.error_message);
    assert!(result.database_connected);
    assert_eq!(result.template.as_ref().unwrap().template_id, "T7");

    let projects = store.projects();
    assert_eq!(projects.len(), 1);
    assert_eq!(result.project_id.as_deref(), Some(projects[0].id.as_str()));
    assert_eq!(projects[0].row["square_footage"], 86000);

    let generation = store
        .generation(result.generation_id.as_deref().unwrap())
        .unwrap();
    assert_eq!(generation.template_type, "T7");
    assert_eq!(
        generation.history,
        vec![
            GenerationStatus::Pending,
            GenerationStatus::Processing,
            GenerationStatus::Completed
        ]
    );

    let kinds: Vec<String> = store
        .activities()
        .into_iter()
        .map(|a| a.activity_type)
        .collect();
    assert_eq!(kinds, vec!["validation", "sow_generation"]);

    let generated = store
        .activities()
        .into_iter()
        .find(|a| a.activity_type == "sow_generation")
        .unwrap();
    assert_eq!(generated.stage_from.as_deref(), Some("inspection"));
    assert_eq!(generated.stage_to.as_deref(), Some("sow_generated"));

    let outputs = store.outputs();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].record.file_url, result.download_url);
    assert!(result.database_operations["create_project"].success);
    assert!(result.database_operations["create_generation"].success);
}

#[tokio::test]
async fn test_artifacts_written_to_data_dir() {
    let (_dir, _store, orchestrator) = setup();

    let result = orchestrator.process_submission(takeoff()).await;
    let paths = orchestrator.paths();

    let saved = result.steps.save_takeoff.as_ref().unwrap();
    let raw: Value = serde_json::from_str(&fs::read_to_string(&saved.file_path).unwrap()).unwrap();
    assert_eq!(raw, takeoff());
    assert!(saved.filename.starts_with(&format!("takeoff_{}_", result.workflow_id)));

    let summary_step = result.steps.generate_sow.as_ref().unwrap();
    assert!(summary_step.file.file_path.starts_with(&paths.sow_dir));
    let summary: Value =
        serde_json::from_str(&fs::read_to_string(&summary_step.file.file_path).unwrap()).unwrap();
    assert_eq!(summary["project_info"]["name"], "Lakeside Logistics Center");
    assert_eq!(summary["template"]["template_id"], "T7");

    let document = result.steps.create_pdf.as_ref().unwrap();
    assert!(document.path.starts_with(&paths.pdf_dir));
    assert_eq!(
        result.download_url.as_deref(),
        Some(document.download_url.as_str())
    );
}

#[tokio::test]
async fn test_validation_failure_leaves_no_generation() {
    let (_dir, store, orchestrator) = setup();
    let mut data = takeoff();
    data["roof_area"] = json!(50);
    data["membrane_type"] = json!("Slate");

    let result = orchestrator.process_submission(data).await;

    assert_eq!(result.status, WorkflowStatus::ValidationFailed);
    assert_eq!(result.validation_errors.len(), 2, "{:?}", result.validation_errors);
    assert!(result.generation_id.is_none());
    assert!(result.steps.generate_sow.is_none());
    assert!(store.generations().is_empty());

    // project row exists, with the failed validation logged against it
    assert_eq!(store.projects().len(), 1);
    let activities = store.activities();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].activity_type, "validation");
}

#[tokio::test]
async fn test_phase_error_marks_generation_failed() {
    let (_dir, store, orchestrator) = setup();
    let pdf_dir = orchestrator.paths().pdf_dir.clone();
    fs::remove_dir_all(&pdf_dir).unwrap();
    fs::write(&pdf_dir, "not a directory").unwrap();

    let result = orchestrator.process_submission(takeoff()).await;

    assert_eq!(result.status, WorkflowStatus::Error);
    assert!(result.error_message.is_some());
    assert!(result.download_url.is_none());

    let generation = store
        .generation(result.generation_id.as_deref().unwrap())
        .unwrap();
    assert_eq!(generation.status, GenerationStatus::Failed);
    assert!(generation.error_message.is_some());
    assert!(store
        .activities()
        .iter()
        .any(|a| a.activity_type == "workflow_error"));
    assert!(store.outputs().is_empty());
}

#[tokio::test]
async fn test_unparseable_fields_fail_validation_not_workflow() {
    let (_dir, store, orchestrator) = setup();
    let mut data = takeoff();
    data["roof_area"] = json!("eighty thousand");

    let result = orchestrator.process_submission(data).await;

    assert_eq!(result.status, WorkflowStatus::ValidationFailed);
    assert!(result
        .validation_errors
        .contains(&"roof_area: Expected number, got string".to_string()));
    // a takeoff that cannot be typed gets no project row
    assert!(store.projects().is_empty());
}
