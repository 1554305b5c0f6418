use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::components::{NormalizedTarget, TrimProblem, TrimSolution};
use crate::utils::{TrimError, TrimResult};

/// On-disk encoding, chosen from the destination's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Yaml,
    Json,
}

impl RecordFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => RecordFormat::Json,
            _ => RecordFormat::Yaml,
        }
    }
}

/// One named record of a solved trim: the target actually used, the compiled
/// problem and the solution.
#[derive(Debug, Clone, Serialize)]
pub struct TrimRecord<'a> {
    pub id: Uuid,
    pub name: String,
    pub created_at: String,
    pub normalized_target: &'a NormalizedTarget,
    pub problem: &'a TrimProblem,
    pub solution: &'a TrimSolution,
}

impl<'a> TrimRecord<'a> {
    pub fn new(
        name: impl Into<String>,
        normalized_target: &'a NormalizedTarget,
        problem: &'a TrimProblem,
        solution: &'a TrimSolution,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            normalized_target,
            problem,
            solution,
        }
    }

    pub fn encode(&self, format: RecordFormat) -> TrimResult<String> {
        Ok(match format {
            RecordFormat::Yaml => serde_yaml::to_string(self)?,
            RecordFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }

    /// Write the record to `path`, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> TrimResult<()> {
        let contents = self.encode(RecordFormat::for_path(path))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TrimError::io(parent, e))?;
        }
        fs::write(path, contents).map_err(|e| TrimError::io(path, e))
    }
}

/// Persist one solved trim under `path`, naming the record after the file
/// stem. Returns the destination written.
pub fn persist_trim(
    path: &Path,
    normalized_target: &NormalizedTarget,
    problem: &TrimProblem,
    solution: &TrimSolution,
) -> TrimResult<PathBuf> {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trim".to_string());

    let record = TrimRecord::new(name, normalized_target, problem, solution);
    record.write(path)?;

    info!("Saved trim record '{}' to {}", record.name, path.display());
    Ok(path.to_path_buf())
}
