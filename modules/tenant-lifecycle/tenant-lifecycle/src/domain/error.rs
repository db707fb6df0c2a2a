//! Domain errors for the tenant lifecycle.

use std::time::Duration;

use tenant_lifecycle_sdk::{TenantId, TenantLifecycleError, TenantProfileId, UserId};
use thiserror::Error;

/// Domain-level errors for tenant lifecycle operations.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Tenant not found: {id}")]
    TenantNotFound { id: TenantId },

    #[error("Tenant profile not found: {id}")]
    TenantProfileNotFound { id: TenantProfileId },

    #[error("Credentials not found for user {user_id}")]
    CredentialsNotFound { user_id: UserId },

    #[error("Validation error: {0}")]
    Validation(String),

    /// Email uniqueness enforced by the user store rejected the candidate.
    #[error("Email already in use: {email}")]
    EmailConflict { email: String },

    /// A collaborator call failed; `step` names the call.
    #[error("{step} failed: {source}")]
    Collaborator {
        step: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Version-control settings deletion did not finish within the bound.
    #[error("Version control settings cleanup for tenant {tenant_id} timed out after {timeout:?}")]
    CleanupTimedOut {
        tenant_id: TenantId,
        timeout: Duration,
    },

    /// Version-control settings deletion finished with an error.
    #[error("Version control settings cleanup for tenant {tenant_id} failed: {source}")]
    CleanupFailed {
        tenant_id: TenantId,
        #[source]
        source: anyhow::Error,
    },
}

impl DomainError {
    pub fn collaborator(step: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Collaborator {
            step,
            source: source.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Tag a collaborator result with the step that produced it.
pub(crate) trait StepContext<T> {
    fn step(self, step: &'static str) -> Result<T, DomainError>;
}

impl<T> StepContext<T> for anyhow::Result<T> {
    fn step(self, step: &'static str) -> Result<T, DomainError> {
        self.map_err(|source| DomainError::Collaborator { step, source })
    }
}

/// Convert domain errors to SDK errors for API boundary.
impl From<DomainError> for TenantLifecycleError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::TenantNotFound { id } => Self::not_found("tenant", id),
            DomainError::TenantProfileNotFound { id } => Self::not_found("tenant profile", id),
            DomainError::CredentialsNotFound { user_id } => {
                Self::not_found("user credentials", user_id)
            }
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::EmailConflict { email } => {
                Self::Conflict(format!("email already in use: {email}"))
            }
            DomainError::Collaborator { step, source } => {
                Self::collaborator_with_source(format!("{step} failed"), source)
            }
            err @ DomainError::CleanupTimedOut { .. } => Self::Timeout(err.to_string()),
            DomainError::CleanupFailed { tenant_id, source } => Self::collaborator_with_source(
                format!("version control settings cleanup for tenant {tenant_id} failed"),
                source,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn timeout_maps_to_sdk_timeout() {
        let err = DomainError::CleanupTimedOut {
            tenant_id: TenantId(Uuid::nil()),
            timeout: Duration::from_secs(60),
        };
        let sdk: TenantLifecycleError = err.into();
        assert!(sdk.is_timeout());
    }

    #[test]
    fn cleanup_failure_is_not_reported_as_timeout() {
        let err = DomainError::CleanupFailed {
            tenant_id: TenantId(Uuid::nil()),
            source: anyhow::anyhow!("remote repository unreachable"),
        };
        let sdk: TenantLifecycleError = err.into();
        assert!(!sdk.is_timeout());
        let source = std::error::Error::source(&sdk).unwrap();
        assert_eq!(source.to_string(), "remote repository unreachable");
    }

    #[test]
    fn collaborator_error_keeps_step_name() {
        let result: anyhow::Result<()> = Err(anyhow::anyhow!("connection reset"));
        let err = result.step("queue reconciliation").unwrap_err();
        assert_eq!(err.to_string(), "queue reconciliation failed: connection reset");
    }

    #[test]
    fn email_conflict_maps_to_sdk_conflict() {
        let sdk: TenantLifecycleError = DomainError::EmailConflict {
            email: "acme@x.io".to_owned(),
        }
        .into();
        assert!(matches!(sdk, TenantLifecycleError::Conflict(_)));
    }
}
