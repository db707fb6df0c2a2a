//! Error types for the tenant lifecycle module.

use thiserror::Error;

/// Errors that can occur when using the tenant lifecycle API.
#[derive(Debug, Error)]
pub enum TenantLifecycleError {
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity (`tenant`, `tenant profile`, `user credentials`).
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// The request is malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A bounded wait expired before the operation completed.
    #[error("timed out: {0}")]
    Timeout(String),

    /// A dependent subsystem failed.
    #[error("{message}")]
    Collaborator {
        /// Failed step description.
        message: String,
        /// Originating cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TenantLifecycleError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Create a collaborator error with a source error.
    pub fn collaborator_with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Collaborator {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
