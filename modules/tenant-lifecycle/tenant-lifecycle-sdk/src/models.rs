//! Domain models for the tenant lifecycle module.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Unique identifier for a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub Uuid);

impl TenantId {
    /// Well-known identity of the system scope.
    ///
    /// System-wide lookups (tenant profiles, credentials, email uniqueness)
    /// are performed in this scope rather than in the tenant's own.
    pub const SYSTEM: Self = Self(Uuid::nil());

    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn is_system(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a tenant profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantProfileId(pub Uuid);

impl fmt::Display for TenantProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An isolated customer partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Identity assigned by the store on first save. `None` until then.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TenantId>,
    /// Human-readable display title.
    pub title: String,
    /// Profile governing resource and queue policy.
    pub tenant_profile_id: TenantProfileId,
}

impl Tenant {
    /// Build a tenant that has not been persisted yet.
    #[must_use]
    pub fn new(title: impl Into<String>, tenant_profile_id: TenantProfileId) -> Self {
        Self {
            id: None,
            title: title.into(),
            tenant_profile_id,
        }
    }

    /// Returns `true` until the store has assigned an identity.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// A message queue declared by a tenant profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileQueue {
    pub name: String,
    pub topic: String,
    pub partitions: u32,
}

/// Named bundle of tenant-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantProfile {
    pub id: TenantProfileId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether tenants of this profile get dedicated rule-engine queues.
    #[serde(default)]
    pub isolated_rule_engine: bool,
    /// Queues declared when `isolated_rule_engine` is set.
    #[serde(default)]
    pub queues: Vec<ProfileQueue>,
}

/// Role granted to a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Authority {
    SysAdmin,
    TenantAdmin,
    #[default]
    CustomerUser,
}

/// A user scoped to a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity assigned by the user service on first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub tenant_id: TenantId,
    /// Globally unique across all tenants.
    pub email: String,
    pub authority: Authority,
}

/// Credentials attached one-to-one to a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    pub user_id: UserId,
    /// Opaque digest produced by the secret hasher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub enabled: bool,
    /// Pending activation token for the invitation flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activate_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activate_token_exp_time: Option<OffsetDateTime>,
}

impl UserCredentials {
    /// Credentials as created alongside a new user: disabled, awaiting activation.
    #[must_use]
    pub fn pending(user_id: UserId, activate_token: String, expires_at: OffsetDateTime) -> Self {
        Self {
            user_id,
            password_hash: None,
            enabled: false,
            activate_token: Some(activate_token),
            activate_token_exp_time: Some(expires_at),
        }
    }

    /// Set the secret and bypass the invitation flow.
    pub fn activate_with(&mut self, password_hash: String) {
        self.password_hash = Some(password_hash);
        self.enabled = true;
        self.activate_token = None;
        self.activate_token_exp_time = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && self.password_hash.is_some() && self.activate_token.is_none()
    }
}
