//! On-disk layout of workflow artifacts.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const TAKEOFF_PREFIX: &str = "takeoff_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub root: PathBuf,
    pub takeoff_dir: PathBuf,
    pub sow_dir: PathBuf,
    pub pdf_dir: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            takeoff_dir: root.join("takeoff"),
            sow_dir: root.join("sow"),
            pdf_dir: root.join("pdf"),
            root,
        }
    }

    /// Creates the root and all artifact directories.
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.root, &self.takeoff_dir, &self.sow_dir, &self.pdf_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn takeoff_filename(workflow_id: &str, timestamp: &str) -> String {
        format!("{}{}_{}.json", TAKEOFF_PREFIX, workflow_id, timestamp)
    }

    pub fn summary_filename(workflow_id: &str, timestamp: &str) -> String {
        format!("sow_summary_{}_{}.json", workflow_id, timestamp)
    }

    /// Resolves a download request to a document path. Names with path
    /// separators or parent components are rejected, as are missing files.
    pub fn document_path(&self, filename: &str) -> Option<PathBuf> {
        if !is_plain_filename(filename) {
            return None;
        }
        let path = self.pdf_dir.join(filename);
        path.is_file().then_some(path)
    }
}

pub fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

/// Workflow id embedded in a takeoff file name, `takeoff_<id>_<ts>.json`.
pub fn workflow_id_from_filename(name: &str) -> Option<&str> {
    name.strip_prefix(TAKEOFF_PREFIX)?.split('_').next()
}

/// Files in `dir` whose names contain `needle`, sorted by name.
pub fn files_containing(dir: &Path, needle: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut matches = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_name().to_string_lossy().contains(needle) {
            matches.push(entry.path());
        }
    }
    matches.sort();
    Ok(matches)
}
