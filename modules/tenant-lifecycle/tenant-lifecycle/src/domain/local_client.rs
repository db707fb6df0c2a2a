//! Local (in-process) client for the tenant lifecycle module.

use std::sync::Arc;

use async_trait::async_trait;
use tenant_lifecycle_sdk::{Tenant, TenantLifecycleClient, TenantLifecycleError};

use super::{DomainError, Service};

/// Local client wrapping the lifecycle service.
pub struct TenantLifecycleLocalClient {
    svc: Arc<Service>,
}

impl TenantLifecycleLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> TenantLifecycleError {
    tracing::error!(operation = op, error = %e, "tenant-lifecycle call failed");
    e.into()
}

#[async_trait]
impl TenantLifecycleClient for TenantLifecycleLocalClient {
    async fn save_tenant(&self, tenant: Tenant) -> Result<Tenant, TenantLifecycleError> {
        self.svc
            .save(tenant)
            .await
            .map_err(|e| log_and_convert("save_tenant", e))
    }

    async fn delete_tenant(&self, tenant: &Tenant) -> Result<(), TenantLifecycleError> {
        self.svc
            .delete(tenant)
            .await
            .map_err(|e| log_and_convert("delete_tenant", e))
    }
}
