//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Structural violations of the document model.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("document has no content")]
    EmptyDocument,

    #[error("expected a single document, found {0}")]
    MultipleDocuments(usize),
}
