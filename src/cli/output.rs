//! Output formatting for multiple formats
//!
//! JSON and YAML render the serialized result as-is. Human output is a
//! compact text view per result type.
//!
//! # Example
//!
//! ```
//! use sowgen::cli::output::{OutputFormat, OutputFormatter};
//! use sowgen::template::list_templates;
//!
//! let formatter = OutputFormatter::new(OutputFormat::Human);
//! let output = formatter.format_templates(&list_templates(None, None)).unwrap();
//! assert!(output.contains("T2"));
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;

use crate::summary::SowSummary;
use crate::template::{CompatibilityReport, SelectionResult, TemplateSummary};
use crate::validation::ValidationReport;
use crate::workflow::{WorkflowResult, WorkflowStatusReport};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

/// Human-readable view of a result.
struct Human<'a, T: ?Sized>(&'a T);

struct CompatibilityView<'a> {
    template_id: &'a str,
    report: &'a CompatibilityReport,
}

fn write_list(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    marker: &str,
    items: &[String],
) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "\n{}:", title)?;
    for item in items {
        writeln!(f, "  {} {}", marker, item)?;
    }
    Ok(())
}

impl fmt::Display for Human<'_, WorkflowResult> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let header = if result.succeeded() {
            "\u{2713} SOW Workflow"
        } else {
            "\u{26A0} SOW Workflow"
        };
        writeln!(f, "{}\n{}\n", header, RULE)?;
        writeln!(f, "Workflow ID:  {}", result.workflow_id)?;
        writeln!(f, "Status:       {}", result.status)?;
        writeln!(f, "Timestamp:    {}", result.timestamp)?;
        writeln!(
            f,
            "Database:     {}",
            if result.database_connected { "connected" } else { "not connected" }
        )?;

        if let Some(template) = &result.template {
            writeln!(
                f,
                "Template:     {} ({})",
                template.template_id, template.confidence
            )?;
        }
        if let Some(url) = &result.download_url {
            writeln!(f, "Download:     {}", url)?;
        }
        if let Some(message) = &result.error_message {
            writeln!(f, "Error:        {}", message)?;
        }

        write_list(f, "Validation errors", "\u{2717}", &result.validation_errors)?;
        write_list(f, "Warnings", "-", &result.validation_warnings)?;
        if let Some(compatibility) = &result.compatibility {
            write_list(f, "Compatibility", "-", &compatibility.warnings)?;
        }
        Ok(())
    }
}

impl fmt::Display for Human<'_, ValidationReport> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        if report.is_valid {
            writeln!(f, "\u{2713} Takeoff data is valid")?;
        } else {
            writeln!(
                f,
                "\u{2717} Takeoff data is invalid ({} errors)",
                report.errors.len()
            )?;
        }
        write_list(f, "Errors", "\u{2717}", &report.errors)?;
        write_list(f, "Warnings", "-", &report.warnings)
    }
}

impl fmt::Display for Human<'_, SelectionResult> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selection = self.0;
        let inputs = &selection.normalized_inputs;
        writeln!(f, "Template:    {}", selection.template_id)?;
        writeln!(f, "Name:        {}", selection.template_name)?;
        writeln!(f, "Description: {}", selection.description)?;
        writeln!(f, "Confidence:  {}", selection.confidence)?;
        writeln!(f, "Duration:    {}", selection.estimated_duration)?;
        writeln!(f, "\nNormalized inputs:")?;
        writeln!(f, "\u{251C}\u{2500} Work type:  {}", inputs.work_type)?;
        writeln!(f, "\u{251C}\u{2500} Membrane:   {}", inputs.membrane_type)?;
        writeln!(f, "\u{251C}\u{2500} Attachment: {}", inputs.attachment_method)?;
        writeln!(
            f,
            "\u{2514}\u{2500} Deck:       {}",
            inputs.deck_type.map_or("(unspecified)", |d| d.as_str())
        )?;
        write_list(f, "Notes", "-", &selection.notes)
    }
}

impl fmt::Display for CompatibilityView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let verdict = if report.compatible { "compatible" } else { "not compatible" };
        writeln!(f, "Template {} is {}", self.template_id, verdict)?;
        if let Some(confidence) = report.confidence {
            writeln!(f, "Confidence: {}", confidence)?;
        }
        write_list(f, "Errors", "\u{2717}", &report.errors)?;
        write_list(f, "Warnings", "-", &report.warnings)?;
        write_list(f, "Recommendations", "-", &report.recommendations)
    }
}

impl fmt::Display for Human<'_, [TemplateSummary]> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let templates = self.0;
        writeln!(f, "Available Templates ({})\n{}", templates.len(), RULE)?;
        for template in templates {
            let attachments: Vec<&str> =
                template.attachment_methods.iter().map(|a| a.as_str()).collect();
            let decks: Vec<&str> = template.deck_types.iter().map(|d| d.as_str()).collect();
            writeln!(f, "\n{}  {}", template.template_id, template.template_name)?;
            writeln!(f, "  Attachment: {}", attachments.join(", "))?;
            writeln!(
                f,
                "  Decks:      {}",
                if decks.is_empty() { "any".to_string() } else { decks.join(", ") }
            )?;
            writeln!(
                f,
                "  {} / {}",
                template.complexity, template.estimated_duration
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Human<'_, WorkflowStatusReport> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "Workflow {}: {}", report.workflow_id, report.status.as_str())?;
        write_list(f, "Takeoff", "-", &report.files_found.takeoff)?;
        write_list(f, "Summary", "-", &report.files_found.sow)?;
        write_list(f, "Document", "-", &report.files_found.pdf)
    }
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn render<T: Serialize + ?Sized>(
        &self,
        value: &T,
        what: &str,
        human: impl fmt::Display,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(value)
                .with_context(|| format!("Failed to serialize {} to JSON", what)),
            OutputFormat::Yaml => serde_yaml::to_string(value)
                .with_context(|| format!("Failed to serialize {} to YAML", what)),
            OutputFormat::Human => Ok(human.to_string()),
        }
    }

    pub fn format_workflow(&self, result: &WorkflowResult) -> Result<String> {
        self.render(result, "workflow result", Human(result))
    }

    pub fn format_validation(&self, report: &ValidationReport) -> Result<String> {
        self.render(report, "validation report", Human(report))
    }

    pub fn format_selection(&self, selection: &SelectionResult) -> Result<String> {
        self.render(selection, "template selection", Human(selection))
    }

    pub fn format_compatibility(
        &self,
        template_id: &str,
        report: &CompatibilityReport,
    ) -> Result<String> {
        let view = CompatibilityView {
            template_id,
            report,
        };
        self.render(report, "compatibility report", view)
    }

    pub fn format_templates(&self, templates: &[TemplateSummary]) -> Result<String> {
        self.render(templates, "template list", Human(templates))
    }

    pub fn format_summary(&self, summary: &SowSummary) -> Result<String> {
        self.render(summary, "SOW summary", summary)
    }

    pub fn format_status(&self, report: &WorkflowStatusReport) -> Result<String> {
        self.render(report, "workflow status", Human(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::takeoff::TakeoffData;
    use crate::template::{list_templates, select_template, validate_compatibility};

    fn sample_takeoff() -> TakeoffData {
        TakeoffData {
            project_type: Some("tearoff".to_string()),
            membrane_type: Some("TPO".to_string()),
            fastening_pattern: Some("Fully Adhered".to_string()),
            deck_type: Some("Gypsum".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_selection_json_format() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_selection(&select_template(&sample_takeoff())).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["template_id"], "T8");
        assert_eq!(parsed["confidence"], "high");
    }

    #[test]
    fn test_selection_human_format() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_selection(&select_template(&sample_takeoff())).unwrap();

        assert!(output.contains("Template:    T8"));
        assert!(output.contains("Attachment: fully_adhered"));
        assert!(output.contains("Deck:       gypsum"));
    }

    #[test]
    fn test_templates_yaml_format() {
        let formatter = OutputFormatter::new(OutputFormat::Yaml);
        let output = formatter.format_templates(&list_templates(None, None)).unwrap();

        let parsed: serde_yaml::Value = serde_yaml::from_str(&output).unwrap();
        assert_eq!(parsed.as_sequence().unwrap().len(), 6);
    }

    #[test]
    fn test_compatibility_human_format() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let report = validate_compatibility("T4", &sample_takeoff());
        let output = formatter.format_compatibility("T4", &report).unwrap();

        assert!(output.contains("Template T4 is not compatible"));
        assert!(output.contains("Work type mismatch"));
        assert!(output.contains("Not approved for Prologis projects"));
    }

    #[test]
    fn test_validation_human_format() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let report = ValidationReport {
            is_valid: false,
            errors: vec!["Missing required field: address".to_string()],
            warnings: vec![],
        };
        let output = formatter.format_validation(&report).unwrap();

        assert!(output.contains("invalid (1 errors)"));
        assert!(output.contains("Missing required field: address"));
        assert!(!output.contains("Warnings:"));
    }

    #[test]
    fn test_templates_human_format() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_templates(&list_templates(None, None)).unwrap();

        assert!(output.starts_with("Available Templates (6)\n"));
        assert!(output.contains("\nT8  "));
        assert!(output.contains("  Decks:      gypsum"));
    }

    #[test]
    fn test_summary_human_format_matches_display() {
        let mut data = sample_takeoff();
        data.project_name = Some("Gypsum Deck Replacement".to_string());
        data.address = Some("18 Mill Street, Lowell MA".to_string());
        data.roof_area = Some(12000.0);
        let summary = SowSummary::generate(&data, None, chrono::Local::now()).unwrap();

        let output = OutputFormatter::new(OutputFormat::Human)
            .format_summary(&summary)
            .unwrap();
        assert_eq!(output, summary.to_string());
        assert!(output.contains("Project:   Gypsum Deck Replacement"));
    }
}
