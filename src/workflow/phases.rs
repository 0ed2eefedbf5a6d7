//! The phases of a submission run, in execution order.

use super::context::{SavedFile, StoreStep, SummaryStep, WorkflowContext};
use super::paths::DataPaths;
use super::phase_trait::{PhaseOutcome, WorkflowPhase};
use super::{WorkflowError, WorkflowStatus};
use crate::progress::ProgressEvent;
use crate::store::{ActivityRecord, GenerationStatus, SowOutputRecord};
use crate::summary::{write_placeholder_document, SowSummary};
use crate::takeoff::TakeoffData;
use crate::template::{select_template, validate_compatibility, SelectionResult};
use crate::validation::TakeoffValidator;
use async_trait::async_trait;
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

fn write_json(
    dir: &Path,
    filename: String,
    what: &'static str,
    value: &impl serde::Serialize,
) -> Result<SavedFile, WorkflowError> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|source| WorkflowError::Serialize { what, source })?;
    let file_path = dir.join(&filename);
    fs::write(&file_path, &content).map_err(|source| WorkflowError::Io {
        path: file_path.clone(),
        source,
    })?;
    debug!(path = %file_path.display(), bytes = content.len(), "Wrote {}", what);

    Ok(SavedFile {
        file_path,
        filename,
        size_bytes: content.len(),
    })
}

fn require<'a, T>(
    value: &'a Option<T>,
    phase: &'static str,
    missing: &'static str,
) -> Result<&'a T, WorkflowError> {
    value
        .as_ref()
        .ok_or(WorkflowError::MissingState { phase, missing })
}

pub struct SaveTakeoffPhase;

#[async_trait]
impl WorkflowPhase for SaveTakeoffPhase {
    fn name(&self) -> &'static str {
        "SaveTakeoffPhase"
    }

    async fn execute(&self, ctx: &mut WorkflowContext) -> Result<PhaseOutcome, WorkflowError> {
        let filename = DataPaths::takeoff_filename(&ctx.workflow_id, &ctx.timestamp);
        let saved = write_json(&ctx.paths.takeoff_dir, filename, "takeoff", &ctx.raw)?;
        ctx.steps.save_takeoff = Some(saved);
        Ok(PhaseOutcome::Continue)
    }
}

/// Creates the project record before validation so failed submissions are
/// tracked too. A submission whose fields do not fit the typed takeoff is
/// not recorded; validation reports why.
pub struct CreateProjectPhase;

#[async_trait]
impl WorkflowPhase for CreateProjectPhase {
    fn name(&self) -> &'static str {
        "CreateProjectPhase"
    }

    async fn execute(&self, ctx: &mut WorkflowContext) -> Result<PhaseOutcome, WorkflowError> {
        let step = match TakeoffData::from_value(ctx.raw.clone()) {
            Ok(takeoff) => {
                let id = ctx.store.create_project(&takeoff).await;
                ctx.project_id = id.clone();
                StoreStep::created(id, "Project record")
            }
            Err(e) => {
                warn!(error = %e, "Takeoff does not fit project record, skipping");
                StoreStep::skipped(format!("Project record skipped: {}", e))
            }
        };
        ctx.steps.create_project = Some(step);
        Ok(PhaseOutcome::Continue)
    }
}

pub struct ValidatePhase {
    validator: TakeoffValidator,
}

impl ValidatePhase {
    pub fn new(validator: TakeoffValidator) -> Self {
        Self { validator }
    }
}

impl Default for ValidatePhase {
    fn default() -> Self {
        Self::new(TakeoffValidator::default())
    }
}

#[async_trait]
impl WorkflowPhase for ValidatePhase {
    fn name(&self) -> &'static str {
        "ValidatePhase"
    }

    async fn execute(&self, ctx: &mut WorkflowContext) -> Result<PhaseOutcome, WorkflowError> {
        let report = self.validator.validate_value(&ctx.raw);
        info!(
            workflow_id = %ctx.workflow_id,
            valid = report.is_valid,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Takeoff validated"
        );
        ctx.emit(ProgressEvent::ValidationComplete {
            warnings: report.warnings.len(),
            errors: report.errors.len(),
        });

        if let Some(project_id) = &ctx.project_id {
            let notes = if report.is_valid {
                "Validation passed"
            } else {
                "Validation failed"
            };
            let activity = ActivityRecord::new(project_id.as_str(), "validation")
                .notes(notes)
                .metadata(json!({
                    "workflow_id": ctx.workflow_id,
                    "errors": report.errors,
                    "warnings": report.warnings,
                }));
            ctx.store.log_activity(activity).await;
        }

        let is_valid = report.is_valid;
        ctx.steps.validate = Some(report);
        if !is_valid {
            return Ok(PhaseOutcome::Stop(WorkflowStatus::ValidationFailed));
        }

        let takeoff =
            TakeoffData::from_value(ctx.raw.clone()).map_err(WorkflowError::InvalidTakeoff)?;
        ctx.takeoff = Some(takeoff);
        Ok(PhaseOutcome::Continue)
    }
}

pub struct SelectTemplatePhase;

#[async_trait]
impl WorkflowPhase for SelectTemplatePhase {
    fn name(&self) -> &'static str {
        "SelectTemplatePhase"
    }

    async fn execute(&self, ctx: &mut WorkflowContext) -> Result<PhaseOutcome, WorkflowError> {
        let takeoff = require(&ctx.takeoff, self.name(), "takeoff")?;
        let selection = select_template(takeoff);
        let compatibility = validate_compatibility(selection.template_id, takeoff);

        info!(
            template_id = selection.template_id,
            confidence = %selection.confidence,
            fallback = selection.is_fallback(),
            "Template selected"
        );
        if !compatibility.compatible {
            warn!(
                template_id = selection.template_id,
                errors = ?compatibility.errors,
                "Selected template reports compatibility errors"
            );
        }

        ctx.emit(ProgressEvent::TemplateSelected {
            template_id: selection.template_id.to_string(),
            confidence: selection.confidence,
            fallback: selection.is_fallback(),
        });
        ctx.selection = Some(selection);
        ctx.compatibility = Some(compatibility);
        Ok(PhaseOutcome::Continue)
    }
}

fn generation_input(ctx: &WorkflowContext, selection: &SelectionResult) -> serde_json::Value {
    json!({
        "takeoff_data": ctx.raw,
        "workflow_id": ctx.workflow_id,
        "template_selection": {
            "template_id": selection.template_id,
            "template_name": selection.template_name,
            "confidence": selection.confidence,
            "notes": selection.notes,
        },
    })
}

pub struct CreateGenerationPhase;

#[async_trait]
impl WorkflowPhase for CreateGenerationPhase {
    fn name(&self) -> &'static str {
        "CreateGenerationPhase"
    }

    async fn execute(&self, ctx: &mut WorkflowContext) -> Result<PhaseOutcome, WorkflowError> {
        let selection = require(&ctx.selection, self.name(), "template selection")?;

        let Some(project_id) = ctx.project_id.clone() else {
            ctx.steps.create_generation =
                Some(StoreStep::skipped("Generation record skipped: no project record"));
            return Ok(PhaseOutcome::Continue);
        };

        let input = generation_input(ctx, selection);
        let id = ctx
            .store
            .create_sow_generation(&project_id, selection.template_id, &input)
            .await;
        if let Some(generation_id) = &id {
            ctx.store
                .update_generation_status(generation_id, GenerationStatus::Processing, None)
                .await;
        }

        ctx.generation_id = id.clone();
        ctx.steps.create_generation = Some(StoreStep::created(id, "Generation record"));
        Ok(PhaseOutcome::Continue)
    }
}

pub struct GenerateSummaryPhase;

#[async_trait]
impl WorkflowPhase for GenerateSummaryPhase {
    fn name(&self) -> &'static str {
        "GenerateSummaryPhase"
    }

    async fn execute(&self, ctx: &mut WorkflowContext) -> Result<PhaseOutcome, WorkflowError> {
        let takeoff = require(&ctx.takeoff, self.name(), "takeoff")?;
        let selection = require(&ctx.selection, self.name(), "template selection")?;

        let summary = SowSummary::generate(takeoff, Some(selection), chrono::Local::now())?
            .with_workflow(&ctx.workflow_id, &ctx.timestamp);

        let filename = DataPaths::summary_filename(&ctx.workflow_id, &ctx.timestamp);
        let file = write_json(&ctx.paths.sow_dir, filename, "SOW summary", &summary)?;

        ctx.steps.generate_sow = Some(SummaryStep {
            file,
            estimated_duration: summary.estimated_duration.clone(),
            material_count: summary.materials.item_count(),
            section_count: summary.sections.len(),
        });
        ctx.summary = Some(summary);
        Ok(PhaseOutcome::Continue)
    }
}

pub struct CreateDocumentPhase;

#[async_trait]
impl WorkflowPhase for CreateDocumentPhase {
    fn name(&self) -> &'static str {
        "CreateDocumentPhase"
    }

    async fn execute(&self, ctx: &mut WorkflowContext) -> Result<PhaseOutcome, WorkflowError> {
        let document =
            write_placeholder_document(&ctx.paths.pdf_dir, &ctx.workflow_id, &ctx.timestamp)?;
        info!(filename = %document.filename, "Document ready");
        ctx.steps.create_pdf = Some(document);
        Ok(PhaseOutcome::Continue)
    }
}

/// Closes out the store records. Nothing here can fail the run.
pub struct FinalizePhase;

#[async_trait]
impl WorkflowPhase for FinalizePhase {
    fn name(&self) -> &'static str {
        "FinalizePhase"
    }

    async fn execute(&self, ctx: &mut WorkflowContext) -> Result<PhaseOutcome, WorkflowError> {
        if let Some(generation_id) = &ctx.generation_id {
            ctx.store
                .update_generation_status(generation_id, GenerationStatus::Completed, None)
                .await;
        }

        let Some(project_id) = ctx.project_id.clone() else {
            return Ok(PhaseOutcome::Stop(WorkflowStatus::Success));
        };

        let selection = require(&ctx.selection, self.name(), "template selection")?;
        let document = ctx.steps.create_pdf.as_ref();
        let metadata = json!({
            "workflow_id": ctx.workflow_id,
            "timestamp": ctx.timestamp,
            "template_id": selection.template_id,
            "confidence": selection.confidence,
        });

        let output = SowOutputRecord {
            project_id: project_id.clone(),
            template_name: selection.template_name.to_string(),
            file_url: document.map(|d| d.download_url.clone()),
            filename: document.map(|d| d.filename.clone()),
            engineering_summary: ctx
                .summary
                .as_ref()
                .and_then(|s| serde_json::to_value(s).ok()),
            metadata: metadata.clone(),
        };
        let output_id = ctx.store.create_sow_output(output).await;
        ctx.steps.create_output = Some(StoreStep::created(output_id, "Output record"));

        let activity = ActivityRecord::new(project_id, "sow_generation")
            .stages("inspection", "sow_generated")
            .notes(format!("SOW generated with template {}", selection.template_id))
            .metadata(metadata);
        ctx.store.log_activity(activity).await;

        Ok(PhaseOutcome::Stop(WorkflowStatus::Success))
    }
}

/// Phases in execution order.
pub fn default_phases() -> Vec<Box<dyn WorkflowPhase>> {
    vec![
        Box::new(SaveTakeoffPhase),
        Box::new(CreateProjectPhase),
        Box::new(ValidatePhase::default()),
        Box::new(SelectTemplatePhase),
        Box::new(CreateGenerationPhase),
        Box::new(GenerateSummaryPhase),
        Box::new(CreateDocumentPhase),
        Box::new(FinalizePhase),
    ]
}
