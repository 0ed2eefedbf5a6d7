//! Placeholder document artifact.
//!
//! No real document rendering happens yet; a short text notice is written
//! under the `.pdf` name so downloads work end to end.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DOWNLOAD_ROUTE_PREFIX: &str = "/api/download/pdf/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderDocument {
    pub path: PathBuf,
    pub filename: String,
    pub download_url: String,
    pub file_size: usize,
    pub is_mock: bool,
    pub message: String,
}

pub fn document_filename(workflow_id: &str, timestamp: &str) -> String {
    format!("sow_document_{}_{}.pdf", workflow_id, timestamp)
}

fn placeholder_content(workflow_id: &str, timestamp: &str) -> String {
    format!(
        "Mock SOW PDF Document\n\
         Workflow ID: {}\n\
         Generated: {}\n\
         Status: Ready for Download\n\
         \n\
         This is a placeholder PDF.\n\
         Real PDF generation will be implemented in the next phase.\n",
        workflow_id, timestamp
    )
}

pub fn write_placeholder_document(
    dir: &Path,
    workflow_id: &str,
    timestamp: &str,
) -> Result<PlaceholderDocument> {
    let filename = document_filename(workflow_id, timestamp);
    let path = dir.join(&filename);
    let content = placeholder_content(workflow_id, timestamp);

    fs::write(&path, &content)
        .with_context(|| format!("Failed to write document {}", path.display()))?;

    Ok(PlaceholderDocument {
        download_url: format!("{}{}", DOWNLOAD_ROUTE_PREFIX, filename),
        path,
        filename,
        file_size: content.len(),
        is_mock: true,
        message: "Mock PDF created - real PDF generation coming soon".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_placeholder() {
        let dir = TempDir::new().unwrap();
        let doc = write_placeholder_document(dir.path(), "ab12cd34", "20250101_120000").unwrap();

        assert_eq!(doc.filename, "sow_document_ab12cd34_20250101_120000.pdf");
        assert_eq!(
            doc.download_url,
            "/api/download/pdf/sow_document_ab12cd34_20250101_120000.pdf"
        );
        assert!(doc.is_mock);

        let written = fs::read_to_string(&doc.path).unwrap();
        assert!(written.starts_with("Mock SOW PDF Document\nWorkflow ID: ab12cd34\n"));
        assert_eq!(written.len(), doc.file_size);
    }

    #[test]
    fn test_missing_dir_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(write_placeholder_document(&missing, "x", "y").is_err());
    }
}
