//! Error types for the CHSH experiment.

use qbell_hal::{HalError, JobId};
use qbell_ir::IrError;
use thiserror::Error;

use crate::analysis::BasisSetting;

/// Result type for CHSH operations.
pub type ChshResult<T> = Result<T, ChshError>;

/// Errors that can occur while building, running, or analysing a CHSH test.
#[derive(Debug, Error)]
pub enum ChshError {
    /// Backend error.
    #[error("Backend error: {0}")]
    Hal(#[from] HalError),

    /// Circuit construction error.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),

    /// The aggregator needs one task per basis setting.
    #[error("Expected {expected} tasks, got {got}")]
    TaskCount { expected: usize, got: usize },

    /// A result did not describe four two-qubit outcomes.
    #[error("Malformed distribution from job {job}: length {len}")]
    MalformedDistribution { job: JobId, len: usize },

    /// A distribution carried no weight at all.
    #[error("Empty outcome distribution for setting {setting}")]
    EmptyDistribution { setting: BasisSetting },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}
