// src/error.rs
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LccaError {
    #[error("Monte Carlo iteration count must be a positive integer")]
    InvalidIterations,

    #[error("invalid distribution for {field}: {reason}")]
    InvalidDistribution { field: String, reason: String },

    #[error("invalid parameter {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("cannot summarize an empty sample array")]
    EmptySamples,

    #[error("treatment name must not be empty")]
    EmptyTreatmentName,

    #[error("treatment already exists: {0}")]
    DuplicateTreatment(String),

    #[error("treatment not found: {0}")]
    UnknownTreatment(String),

    #[error("built-in treatment cannot be removed: {0}")]
    BuiltInTreatment(String),

    #[error("an analysis run is already in progress")]
    RunInProgress,

    #[error("analysis run was cancelled")]
    Cancelled,
}

pub type LccaResult<T> = Result<T, LccaError>;
