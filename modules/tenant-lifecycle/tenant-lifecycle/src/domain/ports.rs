//! Output ports (interfaces) for the collaborators the lifecycle depends on.
//!
//! Lookups in the system-wide namespace take an explicit `scope`; callers
//! pass [`TenantId::SYSTEM`].

use async_trait::async_trait;
use tenant_lifecycle_sdk::{
    Tenant, TenantId, TenantProfile, TenantProfileId, User, UserCredentials, UserId,
};
use thiserror::Error;
use uuid::Uuid;

/// Persistence of tenant records.
#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn find_by_id(&self, id: TenantId) -> anyhow::Result<Option<Tenant>>;

    /// Persist the tenant, assigning identity when it is absent.
    ///
    /// The returned tenant always carries an identity.
    async fn save(&self, tenant: Tenant) -> anyhow::Result<Tenant>;

    /// Remove the tenant record. Cascading cleanup of tenant-owned data is
    /// the store's own concern.
    async fn delete(&self, id: TenantId) -> anyhow::Result<()>;
}

/// Cache of resolved tenant profiles keyed by tenant identity.
#[async_trait]
pub trait TenantProfileCache: Send + Sync {
    /// Drop the entry for `tenant_id`. Unknown identities are a no-op.
    async fn evict(&self, tenant_id: TenantId) -> anyhow::Result<()>;
}

/// Read access to tenant profiles.
#[async_trait]
pub trait TenantProfileLookup: Send + Sync {
    async fn find_by_id(
        &self,
        scope: TenantId,
        id: TenantProfileId,
    ) -> anyhow::Result<Option<TenantProfile>>;
}

/// Installs the default content every new tenant starts with.
#[async_trait]
pub trait DefaultContentInstaller: Send + Sync {
    async fn install_rule_chains(&self, tenant_id: TenantId) -> anyhow::Result<()>;

    async fn install_edge_rule_chains(&self, tenant_id: TenantId) -> anyhow::Result<()>;

    /// `customer_id` of `None` installs tenant-level dashboards.
    async fn install_dashboards(
        &self,
        tenant_id: TenantId,
        customer_id: Option<Uuid>,
    ) -> anyhow::Result<()>;
}

/// Applies message-queue topology changes driven by a profile change.
#[async_trait]
pub trait QueueReconciler: Send + Sync {
    /// `old_profile` is `None` when the tenants were just created.
    async fn reconcile(
        &self,
        tenant_ids: &[TenantId],
        new_profile: &TenantProfile,
        old_profile: Option<&TenantProfile>,
    ) -> anyhow::Result<()>;
}

/// Failure of [`UserService::save_user`].
#[derive(Debug, Error)]
pub enum UserServiceError {
    /// The store's uniqueness constraint on email rejected the user.
    #[error("user with email '{email}' already exists")]
    DuplicateEmail { email: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// User and credential persistence.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Persist a user. Creating a user also creates its (disabled)
    /// credentials record.
    async fn save_user(&self, tenant_id: TenantId, user: User) -> Result<User, UserServiceError>;

    async fn find_credentials(
        &self,
        scope: TenantId,
        user_id: UserId,
    ) -> anyhow::Result<Option<UserCredentials>>;

    async fn save_credentials(
        &self,
        scope: TenantId,
        credentials: UserCredentials,
    ) -> anyhow::Result<UserCredentials>;

    /// Email lookup across all tenants. This is the uniqueness oracle.
    async fn find_by_email(&self, scope: TenantId, email: &str) -> anyhow::Result<Option<User>>;
}

/// One-way hashing of secrets.
pub trait SecretHasher: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the underlying primitive fails.
    fn hash(&self, plaintext: &str) -> anyhow::Result<String>;
}

/// Per-tenant version-control sync settings.
#[async_trait]
pub trait VersionControlSettings: Send + Sync {
    /// Completes when the settings are gone. Has no bound of its own.
    async fn delete_settings(&self, tenant_id: TenantId) -> anyhow::Result<()>;
}
