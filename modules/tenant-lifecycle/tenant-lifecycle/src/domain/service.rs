//! Domain service sequencing the tenant lifecycle.
//!
//! Neither `save` nor `delete` is atomic across collaborators. The first
//! failing step aborts the call and the effects of earlier steps stay in
//! place: a tenant record can outlive a failed admin provisioning, and a
//! deleted tenant can keep its version-control settings when cleanup fails.

use std::sync::Arc;
use std::time::Duration;

use tenant_lifecycle_sdk::{Tenant, TenantId, TenantProfile, TenantProfileId};
use tracing::{info, warn};

use super::admin::AdminProvisioner;
use super::email::EmailAllocator;
use super::error::{DomainError, StepContext};
use super::ports::{
    DefaultContentInstaller, QueueReconciler, SecretHasher, TenantProfileCache,
    TenantProfileLookup, TenantStore, UserService, VersionControlSettings,
};
use crate::config::TenantLifecycleConfig;

/// Collaborators the service sequences calls between.
#[derive(Clone)]
pub struct Collaborators {
    pub tenants: Arc<dyn TenantStore>,
    pub profiles: Arc<dyn TenantProfileLookup>,
    pub profile_cache: Arc<dyn TenantProfileCache>,
    pub content: Arc<dyn DefaultContentInstaller>,
    pub queues: Arc<dyn QueueReconciler>,
    pub users: Arc<dyn UserService>,
    pub hasher: Arc<dyn SecretHasher>,
    pub version_control: Arc<dyn VersionControlSettings>,
}

/// Tenant lifecycle service.
pub struct Service {
    tenants: Arc<dyn TenantStore>,
    profiles: Arc<dyn TenantProfileLookup>,
    profile_cache: Arc<dyn TenantProfileCache>,
    content: Arc<dyn DefaultContentInstaller>,
    queues: Arc<dyn QueueReconciler>,
    version_control: Arc<dyn VersionControlSettings>,
    admins: AdminProvisioner,
    install_default_dashboards: bool,
    vc_cleanup_timeout: Duration,
}

impl Service {
    #[must_use]
    pub fn new(deps: Collaborators, config: TenantLifecycleConfig) -> Self {
        let emails = EmailAllocator::new(
            Arc::clone(&deps.users),
            config.admin_email_suffix,
            config.admin_local_part_fallback,
        );
        let admins = AdminProvisioner::new(
            deps.users,
            deps.hasher,
            emails,
            config.default_admin_password,
        );

        Self {
            tenants: deps.tenants,
            profiles: deps.profiles,
            profile_cache: deps.profile_cache,
            content: deps.content,
            queues: deps.queues,
            version_control: deps.version_control,
            admins,
            install_default_dashboards: config.install_default_dashboards,
            vc_cleanup_timeout: config.vc_cleanup_timeout,
        }
    }

    /// Create or update a tenant.
    ///
    /// 1. Snapshot the prior tenant (update only)
    /// 2. Persist through the store
    /// 3. Bootstrap default content and the default admin (create only)
    /// 4. Evict the cached profile for the tenant
    /// 5. Reconcile queues against the old and new profile
    ///
    /// # Errors
    ///
    /// - [`DomainError::TenantNotFound`] if an update targets a missing tenant
    /// - [`DomainError::TenantProfileNotFound`] if a referenced profile is missing
    /// - any error of the bootstrap or a collaborator, unrecovered
    #[tracing::instrument(skip_all, fields(tenant_id = ?tenant.id, created = tenant.is_new()))]
    pub async fn save(&self, tenant: Tenant) -> Result<Tenant, DomainError> {
        let created = tenant.is_new();
        let old_tenant = match tenant.id {
            Some(id) => Some(
                self.tenants
                    .find_by_id(id)
                    .await
                    .step("tenant lookup")?
                    .ok_or(DomainError::TenantNotFound { id })?,
            ),
            None => None,
        };
        let title = tenant.title.clone();

        let saved = self.tenants.save(tenant).await.step("tenant save")?;
        let tenant_id = saved.id.ok_or_else(|| {
            DomainError::collaborator(
                "tenant save",
                anyhow::anyhow!("store returned a tenant without identity"),
            )
        })?;

        if created {
            self.bootstrap(tenant_id, &title).await?;
            info!(tenant_id = %tenant_id, "Tenant created");
        }

        self.evict_profile(tenant_id).await?;

        let old_profile = match &old_tenant {
            Some(old) => Some(self.find_profile(old.tenant_profile_id).await?),
            None => None,
        };
        let new_profile = self.find_profile(saved.tenant_profile_id).await?;
        self.queues
            .reconcile(&[tenant_id], &new_profile, old_profile.as_ref())
            .await
            .step("queue reconciliation")?;

        Ok(saved)
    }

    /// Delete a tenant, evict its cached profile and remove its
    /// version-control settings within the configured bound.
    ///
    /// The record and cache entry are gone before the cleanup wait starts,
    /// whatever its outcome.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if the tenant has no identity
    /// - [`DomainError::CleanupTimedOut`] if cleanup exceeds the bound
    /// - [`DomainError::CleanupFailed`] if cleanup itself fails
    /// - [`DomainError::Collaborator`] if the store or cache fails
    #[tracing::instrument(skip_all, fields(tenant_id = ?tenant.id))]
    pub async fn delete(&self, tenant: &Tenant) -> Result<(), DomainError> {
        let tenant_id = tenant
            .id
            .ok_or_else(|| DomainError::validation("cannot delete a tenant without identity"))?;

        self.tenants.delete(tenant_id).await.step("tenant delete")?;
        self.evict_profile(tenant_id).await?;

        let timeout = self.vc_cleanup_timeout;
        match tokio::time::timeout(timeout, self.version_control.delete_settings(tenant_id)).await
        {
            Ok(Ok(())) => {}
            Ok(Err(source)) => return Err(DomainError::CleanupFailed { tenant_id, source }),
            Err(_elapsed) => {
                warn!(
                    tenant_id = %tenant_id,
                    timeout = ?timeout,
                    "Version control settings cleanup timed out"
                );
                return Err(DomainError::CleanupTimedOut { tenant_id, timeout });
            }
        }

        info!(tenant_id = %tenant_id, "Tenant deleted");
        Ok(())
    }

    /// Runs once per tenant, right after identity is first assigned.
    async fn bootstrap(&self, tenant_id: TenantId, title: &str) -> Result<(), DomainError> {
        self.content
            .install_rule_chains(tenant_id)
            .await
            .step("default rule chains installation")?;
        self.content
            .install_edge_rule_chains(tenant_id)
            .await
            .step("default edge rule chains installation")?;
        if self.install_default_dashboards {
            self.content
                .install_dashboards(tenant_id, None)
                .await
                .step("default dashboards installation")?;
        }
        self.admins.provision_default_admin(tenant_id, title).await?;
        Ok(())
    }

    async fn evict_profile(&self, tenant_id: TenantId) -> Result<(), DomainError> {
        tracing::debug!(tenant_id = %tenant_id, "Evicting cached tenant profile");
        self.profile_cache
            .evict(tenant_id)
            .await
            .step("tenant profile cache eviction")
    }

    async fn find_profile(&self, id: TenantProfileId) -> Result<TenantProfile, DomainError> {
        self.profiles
            .find_by_id(TenantId::SYSTEM, id)
            .await
            .step("tenant profile lookup")?
            .ok_or(DomainError::TenantProfileNotFound { id })
    }
}
