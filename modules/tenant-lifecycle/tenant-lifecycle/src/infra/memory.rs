//! In-memory collaborators.
//!
//! Backed by `DashMap`; used by the CLI simulation and integration tests.
//! Each adapter keeps the contract of its port, including the user store's
//! email uniqueness constraint.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tenant_lifecycle_sdk::{
    ProfileQueue, Tenant, TenantId, TenantProfile, TenantProfileId, User, UserCredentials, UserId,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::Collaborators;
use crate::domain::ports::{
    DefaultContentInstaller, QueueReconciler, SecretHasher, TenantProfileCache,
    TenantProfileLookup, TenantStore, UserService, UserServiceError, VersionControlSettings,
};

/// Lifetime of the activation token issued with new credentials.
const ACTIVATION_TOKEN_TTL: time::Duration = time::Duration::hours(24);

#[derive(Default)]
pub struct InMemoryTenantStore {
    tenants: DashMap<TenantId, Tenant>,
}

impl InMemoryTenantStore {
    #[must_use]
    pub fn get(&self, id: TenantId) -> Option<Tenant> {
        self.tenants.get(&id).map(|t| t.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

#[async_trait]
impl TenantStore for InMemoryTenantStore {
    async fn find_by_id(&self, id: TenantId) -> anyhow::Result<Option<Tenant>> {
        Ok(self.get(id))
    }

    async fn save(&self, mut tenant: Tenant) -> anyhow::Result<Tenant> {
        let id = *tenant.id.get_or_insert_with(TenantId::new_v4);
        self.tenants.insert(id, tenant.clone());
        Ok(tenant)
    }

    async fn delete(&self, id: TenantId) -> anyhow::Result<()> {
        self.tenants.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryTenantProfiles {
    profiles: DashMap<TenantProfileId, TenantProfile>,
}

impl InMemoryTenantProfiles {
    pub fn insert(&self, profile: TenantProfile) {
        self.profiles.insert(profile.id, profile);
    }
}

#[async_trait]
impl TenantProfileLookup for InMemoryTenantProfiles {
    async fn find_by_id(
        &self,
        _scope: TenantId,
        id: TenantProfileId,
    ) -> anyhow::Result<Option<TenantProfile>> {
        Ok(self.profiles.get(&id).map(|p| p.clone()))
    }
}

/// Kinds of default content installed for a new tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultContent {
    RuleChains,
    EdgeRuleChains,
    Dashboards,
}

/// Records which default content was installed for which tenant.
#[derive(Default)]
pub struct RecordingContentInstaller {
    installed: DashMap<TenantId, Vec<DefaultContent>>,
}

impl RecordingContentInstaller {
    #[must_use]
    pub fn installed(&self, tenant_id: TenantId) -> Vec<DefaultContent> {
        self.installed
            .get(&tenant_id)
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    fn record(&self, tenant_id: TenantId, content: DefaultContent) {
        tracing::debug!(tenant_id = %tenant_id, content = ?content, "Installing default content");
        self.installed.entry(tenant_id).or_default().push(content);
    }
}

#[async_trait]
impl DefaultContentInstaller for RecordingContentInstaller {
    async fn install_rule_chains(&self, tenant_id: TenantId) -> anyhow::Result<()> {
        self.record(tenant_id, DefaultContent::RuleChains);
        Ok(())
    }

    async fn install_edge_rule_chains(&self, tenant_id: TenantId) -> anyhow::Result<()> {
        self.record(tenant_id, DefaultContent::EdgeRuleChains);
        Ok(())
    }

    async fn install_dashboards(
        &self,
        tenant_id: TenantId,
        _customer_id: Option<Uuid>,
    ) -> anyhow::Result<()> {
        self.record(tenant_id, DefaultContent::Dashboards);
        Ok(())
    }
}

/// Keeps the per-tenant queue topology implied by each tenant's profile.
///
/// Tenants on a profile with an isolated rule engine own the profile's
/// queues; all others share the system queues and own none.
#[derive(Default)]
pub struct TopologyQueueReconciler {
    topology: DashMap<TenantId, Vec<ProfileQueue>>,
}

impl TopologyQueueReconciler {
    #[must_use]
    pub fn queues_for(&self, tenant_id: TenantId) -> Vec<ProfileQueue> {
        self.topology
            .get(&tenant_id)
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

fn owned_queues(profile: Option<&TenantProfile>) -> &[ProfileQueue] {
    match profile {
        Some(p) if p.isolated_rule_engine => &p.queues,
        _ => &[],
    }
}

#[async_trait]
impl QueueReconciler for TopologyQueueReconciler {
    async fn reconcile(
        &self,
        tenant_ids: &[TenantId],
        new_profile: &TenantProfile,
        old_profile: Option<&TenantProfile>,
    ) -> anyhow::Result<()> {
        let before = owned_queues(old_profile);
        let after = owned_queues(Some(new_profile));
        let added = after.iter().filter(|q| !before.contains(q)).count();
        let removed = before.iter().filter(|q| !after.contains(q)).count();

        for tenant_id in tenant_ids {
            if after.is_empty() {
                self.topology.remove(tenant_id);
            } else {
                self.topology.insert(*tenant_id, after.to_vec());
            }
        }

        tracing::debug!(
            tenants = tenant_ids.len(),
            profile = %new_profile.name,
            added,
            removed,
            "Reconciled tenant queues"
        );
        Ok(())
    }
}

/// User store with a system-wide unique email index.
#[derive(Default)]
pub struct InMemoryUserService {
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
    credentials: DashMap<UserId, UserCredentials>,
}

impl InMemoryUserService {
    #[must_use]
    pub fn credentials(&self, user_id: UserId) -> Option<UserCredentials> {
        self.credentials.get(&user_id).map(|c| c.clone())
    }

    fn reserve_email(&self, email: &str, id: UserId) -> Result<(), UserServiceError> {
        match self.emails.entry(email.to_owned()) {
            Entry::Occupied(_) => Err(UserServiceError::DuplicateEmail {
                email: email.to_owned(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn users_of(&self, tenant_id: TenantId) -> Vec<User> {
        self.users
            .iter()
            .filter(|u| u.tenant_id == tenant_id)
            .map(|u| u.clone())
            .collect()
    }
}

#[async_trait]
impl UserService for InMemoryUserService {
    async fn save_user(
        &self,
        tenant_id: TenantId,
        mut user: User,
    ) -> Result<User, UserServiceError> {
        user.tenant_id = tenant_id;
        if let Some(id) = user.id {
            let previous = self
                .users
                .get(&id)
                .map(|u| u.email.clone())
                .ok_or_else(|| anyhow::anyhow!("unknown user {id}"))?;
            if previous != user.email {
                self.reserve_email(&user.email, id)?;
                self.emails.remove(&previous);
            }
            self.users.insert(id, user.clone());
            return Ok(user);
        }

        let id = UserId(Uuid::new_v4());
        self.reserve_email(&user.email, id)?;

        user.id = Some(id);
        self.users.insert(id, user.clone());
        self.credentials.insert(
            id,
            UserCredentials::pending(
                id,
                Uuid::new_v4().simple().to_string(),
                OffsetDateTime::now_utc() + ACTIVATION_TOKEN_TTL,
            ),
        );
        Ok(user)
    }

    async fn find_credentials(
        &self,
        _scope: TenantId,
        user_id: UserId,
    ) -> anyhow::Result<Option<UserCredentials>> {
        Ok(self.credentials(user_id))
    }

    async fn save_credentials(
        &self,
        _scope: TenantId,
        credentials: UserCredentials,
    ) -> anyhow::Result<UserCredentials> {
        if !self.users.contains_key(&credentials.user_id) {
            anyhow::bail!("unknown user {}", credentials.user_id);
        }
        self.credentials.insert(credentials.user_id, credentials.clone());
        Ok(credentials)
    }

    async fn find_by_email(&self, _scope: TenantId, email: &str) -> anyhow::Result<Option<User>> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }
}

/// Version-control repository settings per tenant.
#[derive(Default)]
pub struct InMemoryVersionControlSettings {
    repositories: DashMap<TenantId, String>,
}

impl InMemoryVersionControlSettings {
    pub fn set_repository(&self, tenant_id: TenantId, uri: impl Into<String>) {
        self.repositories.insert(tenant_id, uri.into());
    }

    #[must_use]
    pub fn repository(&self, tenant_id: TenantId) -> Option<String> {
        self.repositories.get(&tenant_id).map(|r| r.clone())
    }
}

#[async_trait]
impl VersionControlSettings for InMemoryVersionControlSettings {
    async fn delete_settings(&self, tenant_id: TenantId) -> anyhow::Result<()> {
        self.repositories.remove(&tenant_id);
        Ok(())
    }
}

/// All in-memory collaborators, wired together.
#[derive(Default)]
pub struct InMemoryBackend {
    pub tenants: Arc<InMemoryTenantStore>,
    pub profiles: Arc<InMemoryTenantProfiles>,
    pub content: Arc<RecordingContentInstaller>,
    pub queues: Arc<TopologyQueueReconciler>,
    pub users: Arc<InMemoryUserService>,
    pub version_control: Arc<InMemoryVersionControlSettings>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collaborators for [`crate::Service::new`].
    #[must_use]
    pub fn collaborators(
        &self,
        profile_cache: Arc<dyn TenantProfileCache>,
        hasher: Arc<dyn SecretHasher>,
    ) -> Collaborators {
        Collaborators {
            tenants: self.tenants.clone(),
            profiles: self.profiles.clone(),
            profile_cache,
            content: self.content.clone(),
            queues: self.queues.clone(),
            users: self.users.clone(),
            hasher,
            version_control: self.version_control.clone(),
        }
    }
}
