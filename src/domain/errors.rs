//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use super::contact_parser::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repo(String),

    #[error("State error: {0}")]
    State(String),

    #[error("AI report generation failed: {0}")]
    Ai(String),

    #[error("Import failed: {0}")]
    Import(String),

    /// User-supplied contact data failed the same checks the bulk parser applies.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("UI error: {0}")]
    Ui(String),
}

impl From<ImportError> for DomainError {
    fn from(e: ImportError) -> Self {
        DomainError::Import(e.to_string())
    }
}
