//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("invalid YAML document: {0}")]
    Structural(#[from] DomainError),

    #[error("failed to parse YAML: {message}")]
    Parse { message: String },

    #[error("failed to render YAML: {message}")]
    Serialize { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
