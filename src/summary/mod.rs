//! Scope-of-work summary rendering.
//!
//! Turns a takeoff plus the selected template into a [`SowSummary`], which
//! renders as pretty JSON or plain text, and writes the placeholder document.

pub mod document;
pub mod materials;

use crate::takeoff::TakeoffData;
use crate::template::{Complexity, Confidence, SelectionResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use document::{write_placeholder_document, PlaceholderDocument};
pub use materials::{estimated_duration, MaterialsEstimate};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummaryError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
}

const SUMMARY_REQUIRED: &[&str] = &[
    "project_name",
    "address",
    "roof_area",
    "membrane_type",
    "fastening_pattern",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub address: String,
    pub date_generated: DateTime<Local>,
    pub roof_area: f64,
    pub membrane_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SowSection {
    pub section: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compliance {
    pub building_code: String,
    pub wind_load: String,
    pub hvhz_required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateBlock {
    pub template_id: String,
    pub template_name: String,
    pub description: String,
    pub confidence: Confidence,
    pub complexity: Complexity,
    pub estimated_duration: String,
    pub notes: Vec<String>,
    pub sections: Vec<String>,
}

impl From<&SelectionResult> for TemplateBlock {
    fn from(selection: &SelectionResult) -> Self {
        Self {
            template_id: selection.template_id.to_string(),
            template_name: selection.template_name.to_string(),
            description: selection.description.to_string(),
            confidence: selection.confidence,
            complexity: selection.complexity,
            estimated_duration: selection.estimated_duration.to_string(),
            notes: selection.notes.clone(),
            sections: selection.sections.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    pub workflow_id: String,
    pub timestamp: String,
    pub generated_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SowSummary {
    pub project_info: ProjectInfo,
    pub materials: MaterialsEstimate,
    pub sections: Vec<SowSection>,
    pub estimated_duration: String,
    pub compliance: Compliance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_metadata: Option<WorkflowMetadata>,
}

fn build_sections(takeoff: &TakeoffData, materials: &MaterialsEstimate) -> Vec<SowSection> {
    let membrane = takeoff.membrane_type.as_deref().unwrap_or("TPO");
    let address = takeoff.address.as_deref().unwrap_or("Project Location");
    let fastening = takeoff.fastening_pattern.as_deref().unwrap_or("standard");

    vec![
        SowSection {
            section: "1.0 PROJECT OVERVIEW".to_string(),
            content: format!(
                "This project involves the installation of a {} roofing system at {}. Total roof area: {} square feet.",
                membrane,
                address,
                takeoff.roof_area_or_zero()
            ),
        },
        SowSection {
            section: "2.0 MATERIALS".to_string(),
            content: format!(
                "Membrane: {} sq ft\nFasteners: {} units\nPlates: {} units\nAdhesive: {} gallons",
                materials.membrane_sq_ft,
                materials.fasteners_count,
                materials.plates_count,
                materials.adhesive_gallons
            ),
        },
        SowSection {
            section: "3.0 INSTALLATION".to_string(),
            content: format!(
                "Installation shall follow manufacturer specifications for {} systems with {} fastening pattern.",
                membrane, fastening
            ),
        },
        SowSection {
            section: "4.0 TESTING".to_string(),
            content: "All work shall be subject to pull tests and adhesion tests as required by local building codes and manufacturer specifications.".to_string(),
        },
    ]
}

impl SowSummary {
    /// Builds a summary. The five form fields the summary is built from must
    /// be present; their values are not re-validated here.
    pub fn generate(
        takeoff: &TakeoffData,
        selection: Option<&SelectionResult>,
        generated_at: DateTime<Local>,
    ) -> Result<Self, SummaryError> {
        let value = takeoff.to_value();
        if let Some(missing) = SUMMARY_REQUIRED.iter().find(|f| value.get(*f).is_none()) {
            return Err(SummaryError::MissingField(*missing));
        }

        let roof_area = takeoff.roof_area_or_zero();
        let materials = MaterialsEstimate::for_roof_area(roof_area);
        let sections = build_sections(takeoff, &materials);

        let wind_load = takeoff
            .extra
            .get("wind_load")
            .and_then(|v| v.as_str())
            .unwrap_or("TBD");

        Ok(Self {
            project_info: ProjectInfo {
                name: takeoff
                    .project_name
                    .clone()
                    .unwrap_or_else(|| "Unnamed Project".to_string()),
                address: takeoff
                    .address
                    .clone()
                    .unwrap_or_else(|| "No Address".to_string()),
                date_generated: generated_at,
                roof_area,
                membrane_type: takeoff
                    .membrane_type
                    .clone()
                    .unwrap_or_else(|| "TPO".to_string()),
            },
            materials,
            sections,
            estimated_duration: estimated_duration(roof_area),
            compliance: Compliance {
                building_code: takeoff
                    .building_code
                    .clone()
                    .unwrap_or_else(|| "IBC 2021".to_string()),
                wind_load: wind_load.to_string(),
                hvhz_required: takeoff.hvhz_zone.unwrap_or(false),
            },
            template: selection.map(TemplateBlock::from),
            workflow_metadata: None,
        })
    }

    pub fn with_workflow(mut self, workflow_id: &str, timestamp: &str) -> Self {
        self.workflow_metadata = Some(WorkflowMetadata {
            workflow_id: workflow_id.to_string(),
            timestamp: timestamp.to_string(),
            generated_by: concat!("sowgen ", env!("CARGO_PKG_VERSION")).to_string(),
        });
        self
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SowSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = &self.project_info;

        writeln!(f, "SCOPE OF WORK SUMMARY")?;
        writeln!(f, "=====================")?;
        writeln!(f, "Project:   {}", info.name)?;
        writeln!(f, "Address:   {}", info.address)?;
        writeln!(f, "Roof area: {} sq ft", info.roof_area)?;
        writeln!(f, "Membrane:  {}", info.membrane_type)?;
        writeln!(f, "Generated: {}", info.date_generated.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Duration:  {}", self.estimated_duration)?;

        if let Some(template) = &self.template {
            writeln!(f)?;
            writeln!(
                f,
                "Template:  {} ({}, confidence {})",
                template.template_id, template.template_name, template.confidence
            )?;
            for note in &template.notes {
                writeln!(f, "  note: {}", note)?;
            }
        }

        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}", section.section)?;
            for line in section.content.lines() {
                writeln!(f, "  {}", line)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "COMPLIANCE")?;
        writeln!(f, "  Building code: {}", self.compliance.building_code)?;
        writeln!(f, "  Wind load:     {}", self.compliance.wind_load)?;
        writeln!(
            f,
            "  HVHZ:          {}",
            if self.compliance.hvhz_required { "required" } else { "not required" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::select_template;
    use serde_json::json;

    fn takeoff() -> TakeoffData {
        TakeoffData::from_value(json!({
            "project_name": "Warehouse 12",
            "address": "1200 Commerce Blvd, Tampa FL",
            "roof_area": 25000,
            "membrane_type": "TPO",
            "fastening_pattern": "Mechanically Attached",
            "wind_load": "145 mph"
        }))
        .unwrap()
    }

    #[test]
    fn test_generate_summary() {
        let summary = SowSummary::generate(&takeoff(), None, Local::now()).unwrap();
        assert_eq!(summary.project_info.name, "Warehouse 12");
        assert_eq!(summary.sections.len(), 4);
        assert_eq!(summary.sections[0].section, "1.0 PROJECT OVERVIEW");
        assert!(summary.sections[0].content.contains("Total roof area: 25000 square feet"));
        assert_eq!(summary.estimated_duration, "13 days");
        assert_eq!(summary.compliance.building_code, "IBC 2021");
        assert_eq!(summary.compliance.wind_load, "145 mph");
        assert!(!summary.compliance.hvhz_required);
        assert!(summary.template.is_none());
    }

    #[test]
    fn test_missing_field() {
        let mut data = takeoff();
        data.address = None;
        assert_eq!(
            SowSummary::generate(&data, None, Local::now()).unwrap_err(),
            SummaryError::MissingField("address")
        );
    }

    #[test]
    fn test_template_block_and_metadata() {
        let data = takeoff();
        let selection = select_template(&data);
        let summary = SowSummary::generate(&data, Some(&selection), Local::now())
            .unwrap()
            .with_workflow("ab12cd34", "20250101_120000");

        let value: serde_json::Value =
            serde_json::from_str(&summary.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["template"]["template_id"], "T2");
        assert_eq!(value["workflow_metadata"]["workflow_id"], "ab12cd34");
        assert_eq!(value["materials"]["fasteners_count"], 112_500);
    }

    #[test]
    fn test_display_renders_sections_and_notes() {
        let mut data = takeoff();
        data.deck_type = Some("Wood".to_string());
        let selection = select_template(&data);
        let text = SowSummary::generate(&data, Some(&selection), Local::now())
            .unwrap()
            .to_string();
        assert!(text.starts_with("SCOPE OF WORK SUMMARY\n"));
        assert!(text.contains("Project:   Warehouse 12"));
        assert!(text.contains("4.0 TESTING"));
        assert!(text.contains("  note: Deck type needs verification"));
        assert!(text.contains("COMPLIANCE\n  Building code: IBC 2021"));
        assert!(text.ends_with("HVHZ:          not required\n"));
    }

    #[test]
    fn test_display_without_template_or_notes() {
        let text = SowSummary::generate(&takeoff(), None, Local::now())
            .unwrap()
            .to_string();
        assert!(!text.contains("Template:"));
        assert!(!text.contains("note:"));
        assert!(text.contains("1.0 PROJECT OVERVIEW"));
    }
}
