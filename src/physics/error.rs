use thiserror::Error;

/// Failures raised by a derivative/output evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluatorError {
    #[error("Expected {expected} states, got {found}")]
    StateDimension { expected: usize, found: usize },

    #[error("Expected {expected} control inputs, got {found}")]
    InputDimension { expected: usize, found: usize },

    #[error("Non-finite {what} at index {index}")]
    NonFinite { what: &'static str, index: usize },

    #[error("Evaluation failed: {0}")]
    ComputationError(String),
}

/// Failures acquiring or releasing the backing simulation model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Model '{name}' could not be loaded: {reason}")]
    LoadFailed { name: String, reason: String },
}
