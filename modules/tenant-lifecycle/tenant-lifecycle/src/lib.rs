//! Tenant Lifecycle Module
//!
//! Sequences tenant creation, first-time bootstrap of the default tenant
//! administrator, and tenant deletion across the subsystems that depend on
//! a tenant: the tenant store, default content installer, user service,
//! tenant-profile cache, queue reconciler and version-control settings.
//!
//! The module exposes [`domain::TenantLifecycleLocalClient`], an
//! implementation of [`tenant_lifecycle_sdk::TenantLifecycleClient`].
//! Collaborators are injected as trait objects (see [`domain::ports`]);
//! [`infra`] ships in-memory and library-backed adapters for them.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;

#[cfg(test)]
mod config_tests;

pub use config::{ProfileCacheConfig, TenantLifecycleConfig};
pub use domain::{Collaborators, DomainError, Service, TenantLifecycleLocalClient};
