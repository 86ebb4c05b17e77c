//! Application-level errors (wraps domain errors)

use std::fmt;

use thiserror::Error;

use crate::domain::DomainError;

/// Loader pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Hierarchy,
    Metadata,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStage::Hierarchy => write!(f, "hierarchy"),
            LoadStage::Metadata => write!(f, "metadata"),
        }
    }
}

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("cannot load {stage}: {source}")]
    LoadFailure {
        stage: LoadStage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("document information is not available for {node_id}: {source}")]
    LookupFailure {
        node_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// Whether the source document was reached but could not be parsed.
    pub fn is_invalid_document(&self) -> bool {
        match self {
            ApplicationError::LoadFailure { source, .. }
            | ApplicationError::LookupFailure { source, .. } => source
                .downcast_ref::<DomainError>()
                .is_some_and(|e| matches!(e, DomainError::InvalidDocument { .. })),
            ApplicationError::Domain(DomainError::InvalidDocument { .. }) => true,
            _ => false,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
