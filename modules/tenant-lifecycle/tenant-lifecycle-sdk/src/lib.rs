//! Tenant Lifecycle SDK
//!
//! This crate provides the public API for the `tenant-lifecycle` module:
//!
//! - [`TenantLifecycleClient`] - Public API trait for consumers
//! - [`Tenant`], [`TenantProfile`], [`User`], [`UserCredentials`] - Domain models
//! - [`TenantLifecycleError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use tenant_lifecycle_sdk::{Tenant, TenantLifecycleClient, TenantProfileId};
//!
//! // Create: the tenant has no identity yet
//! let created = client.save_tenant(Tenant::new("Acme", profile_id)).await?;
//!
//! // Update: identity present, profile may change
//! let mut updated = created.clone();
//! updated.tenant_profile_id = other_profile_id;
//! let updated = client.save_tenant(updated).await?;
//!
//! // Delete: waits for version-control cleanup with a bounded timeout
//! client.delete_tenant(&updated).await?;
//! ```
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;

pub use api::TenantLifecycleClient;
pub use error::TenantLifecycleError;
pub use models::{
    Authority, ProfileQueue, Tenant, TenantId, TenantProfile, TenantProfileId, User,
    UserCredentials, UserId,
};
