//! Default tenant administrator provisioning.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tenant_lifecycle_sdk::{Authority, TenantId, User};

use super::email::EmailAllocator;
use super::error::{DomainError, StepContext};
use super::ports::{SecretHasher, UserService, UserServiceError};

/// Probe-and-save rounds before a store-level email conflict is reported.
const MAX_SAVE_ATTEMPTS: u32 = 3;

/// Creates the pre-activated administrator every new tenant receives.
pub struct AdminProvisioner {
    users: Arc<dyn UserService>,
    hasher: Arc<dyn SecretHasher>,
    emails: EmailAllocator,
    default_password: SecretString,
}

impl AdminProvisioner {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserService>,
        hasher: Arc<dyn SecretHasher>,
        emails: EmailAllocator,
        default_password: SecretString,
    ) -> Self {
        Self {
            users,
            hasher,
            emails,
            default_password,
        }
    }

    /// Create the tenant administrator and activate its credentials,
    /// bypassing the invitation flow.
    ///
    /// # Errors
    ///
    /// - [`DomainError::EmailConflict`] if the user store keeps rejecting freshly
    ///   probed emails as duplicates
    /// - [`DomainError::CredentialsNotFound`] if the user service did not create credentials
    /// - [`DomainError::Collaborator`] for any other user service or hasher failure
    #[tracing::instrument(skip_all, fields(tenant_id = %tenant_id))]
    pub async fn provision_default_admin(
        &self,
        tenant_id: TenantId,
        tenant_title: &str,
    ) -> Result<User, DomainError> {
        let local_part = self.emails.normalize(Some(tenant_title));
        let mut attempt = 1;
        let (email, saved) = loop {
            let email = self.emails.allocate(&local_part).await?;
            let user = User {
                id: None,
                tenant_id,
                email: email.clone(),
                authority: Authority::TenantAdmin,
            };
            match self.users.save_user(tenant_id, user).await {
                Ok(saved) => break (email, saved),
                Err(UserServiceError::DuplicateEmail { email }) if attempt < MAX_SAVE_ATTEMPTS => {
                    tracing::debug!(
                        email = %email,
                        attempt,
                        "Default admin email taken concurrently, re-probing"
                    );
                    attempt += 1;
                }
                Err(UserServiceError::DuplicateEmail { email }) => {
                    return Err(DomainError::EmailConflict { email });
                }
                Err(UserServiceError::Other(source)) => {
                    return Err(DomainError::collaborator("default admin creation", source));
                }
            }
        };
        let user_id = saved.id.ok_or_else(|| {
            DomainError::collaborator(
                "default admin creation",
                anyhow::anyhow!("user service returned a user without id"),
            )
        })?;

        let mut credentials = self
            .users
            .find_credentials(TenantId::SYSTEM, user_id)
            .await
            .step("credentials lookup")?
            .ok_or(DomainError::CredentialsNotFound { user_id })?;

        let password_hash = self
            .hasher
            .hash(self.default_password.expose_secret())
            .step("password hashing")?;
        credentials.activate_with(password_hash);

        self.users
            .save_credentials(TenantId::SYSTEM, credentials)
            .await
            .step("credentials update")?;

        tracing::info!(
            email = %email,
            tenant_id = %tenant_id,
            "Created default tenant admin account"
        );
        Ok(saved)
    }
}
