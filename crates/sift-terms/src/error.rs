//! Error types for the sift-terms crate.

use thiserror::Error;

/// Errors that can occur when assembling a term pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A stage name did not match any known stage.
    #[error("unknown pipeline stage: {0}")]
    UnknownStage(String),

    /// A stage was configured with an unusable parameter.
    #[error("invalid parameter for stage {stage}: {message}")]
    InvalidParameter {
        /// Name of the stage.
        stage: String,
        /// What was wrong with the parameter.
        message: String,
    },
}
