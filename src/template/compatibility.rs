//! Advisory check of a chosen template against takeoff data.
//!
//! The takeoff is re-normalized here rather than trusting whatever produced
//! the template id. Attachment method is not checked.

use super::catalog;
use super::confidence::Confidence;
use super::normalize::{normalize_deck_type, normalize_membrane_type, normalize_work_type};
use crate::takeoff::TakeoffData;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub compatible: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    /// Absent when the template id is unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

impl CompatibilityReport {
    fn template_not_found(template_id: &str) -> Self {
        Self {
            compatible: false,
            errors: vec![format!("Template {} not found", template_id)],
            warnings: Vec::new(),
            recommendations: vec!["Please select a valid template".to_string()],
            confidence: None,
        }
    }
}

pub fn validate_compatibility(template_id: &str, takeoff: &TakeoffData) -> CompatibilityReport {
    let Some(record) = catalog::find(template_id) else {
        debug!(template_id, "Compatibility check for unknown template");
        return CompatibilityReport::template_not_found(template_id);
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let work_type = normalize_work_type(takeoff.project_type_text());
    if work_type != record.work_type {
        errors.push(format!(
            "Work type mismatch: Template is for {}, project is {}",
            record.work_type, work_type
        ));
    }

    let membrane = normalize_membrane_type(takeoff.membrane_type_text());
    if !record.supports_membrane(membrane) {
        errors.push(format!(
            "Membrane type '{}' not supported by this template",
            membrane
        ));
    }

    if let Some(deck) = normalize_deck_type(takeoff.deck_type_text()) {
        if !record.supports_deck(deck) {
            warnings.push(format!(
                "Deck type '{}' may not be optimal for this template",
                deck
            ));
        }
    }

    warnings.extend(
        record
            .restrictions
            .iter()
            .map(|r| format!("Template restriction: {}", r)),
    );

    let confidence = match (errors.is_empty(), warnings.is_empty()) {
        (true, true) => Confidence::High,
        (true, false) => Confidence::Medium,
        (false, _) => Confidence::Low,
    };

    debug!(
        template_id,
        errors = errors.len(),
        warnings = warnings.len(),
        %confidence,
        "Compatibility check complete"
    );

    CompatibilityReport {
        compatible: errors.is_empty(),
        errors,
        warnings,
        recommendations: Vec::new(),
        confidence: Some(confidence),
    }
}
