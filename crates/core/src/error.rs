//! Error types shared across the system

use thiserror::Error;

/// Base error type for the entire system
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    pub fn invalid_state_transition(from: &str, to: &str) -> Self {
        Self::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Machine-readable kind reported to callers.
    ///
    /// Rejected transitions are a form of invalid input, so they share the
    /// `validation_error` kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) | DomainError::InvalidStateTransition { .. } => {
                "validation_error"
            }
            DomainError::NotFound(_) => "not_found",
            DomainError::Conflict(_) => "conflict",
            DomainError::Infrastructure(_) => "internal",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, DomainError::Conflict(_))
    }
}

/// Result alias used by every layer
pub type Result<T, E = DomainError> = std::result::Result<T, E>;
