use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::components::Variant;
use crate::physics::{EvaluatorError, ModelError};

#[derive(Error, Debug)]
pub enum TrimError {
    #[error("Contradictory trim target {fields:?}: {reason}")]
    ContradictoryTarget {
        fields: Vec<&'static str>,
        reason: &'static str,
    },

    #[error("Unrecognized trim target field(s) for {variant}: {}", .fields.join(", "))]
    UnrecognizedFields { variant: Variant, fields: Vec<String> },

    #[error("Unknown aircraft variant: {0}")]
    UnknownVariant(String),

    #[error("Invalid value for trim target '{field}': {value}")]
    InvalidTargetValue { field: String, value: f64 },

    #[error("Prior trim bundle does not fit {variant}: {what}")]
    SeedMismatch { variant: Variant, what: String },

    #[error("Failed to load simulation model: {0}")]
    ModelLoad(#[from] ModelError),

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Trim did not converge (residual norm {residual_norm:.3e} after {iterations} iterations)")]
    NotConverged { residual_norm: f64, iterations: u64 },

    #[error("IO error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrimError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TrimError::Io {
            path: path.into(),
            source,
        }
    }

    /// Errors raised before any solving starts.
    pub fn is_specification_error(&self) -> bool {
        matches!(
            self,
            TrimError::ContradictoryTarget { .. }
                | TrimError::UnrecognizedFields { .. }
                | TrimError::UnknownVariant(_)
                | TrimError::InvalidTargetValue { .. }
                | TrimError::SeedMismatch { .. }
        )
    }
}

pub type TrimResult<T> = Result<T, TrimError>;
