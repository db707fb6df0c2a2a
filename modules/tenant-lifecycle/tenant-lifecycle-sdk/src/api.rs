//! Public API trait for the tenant lifecycle module.

use async_trait::async_trait;

use crate::error::TenantLifecycleError;
use crate::models::Tenant;

/// Public API trait for tenant creation, update and deletion.
///
/// Implementations sequence calls across the tenant store, default content
/// installer, user service, profile cache, queue reconciler and the
/// version-control settings service. Neither operation is atomic across
/// those collaborators: a failure aborts the remaining steps and leaves the
/// effects of earlier steps in place.
#[async_trait]
pub trait TenantLifecycleClient: Send + Sync {
    /// Create or update a tenant.
    ///
    /// A tenant without `id` is created: identity is assigned by the store,
    /// default content is installed and a default tenant administrator is
    /// provisioned. A tenant with `id` is updated in place.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the prior tenant (on update) or a referenced profile does not exist
    /// - `Conflict` if the default admin email collides at the store level
    /// - `Collaborator` if any dependent subsystem fails
    async fn save_tenant(&self, tenant: Tenant) -> Result<Tenant, TenantLifecycleError>;

    /// Delete a tenant and its version-control settings.
    ///
    /// # Errors
    ///
    /// - `Validation` if the tenant has no identity
    /// - `Timeout` if the version-control cleanup does not finish in time
    /// - `Collaborator` if the store, cache or cleanup fails
    async fn delete_tenant(&self, tenant: &Tenant) -> Result<(), TenantLifecycleError>;
}
