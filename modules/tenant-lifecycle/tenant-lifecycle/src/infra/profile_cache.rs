//! In-memory tenant-profile cache with TTL support.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tenant_lifecycle_sdk::{TenantId, TenantProfile};

use crate::config::ProfileCacheConfig;
use crate::domain::ports::TenantProfileCache;

/// Resolved tenant profiles keyed by tenant identity.
///
/// Advisory only: a load racing an eviction may leave a stale entry until
/// the TTL expires. Readers always have a path back to the profile store.
pub struct MokaTenantProfileCache {
    cache: Cache<TenantId, TenantProfile>,
}

impl MokaTenantProfileCache {
    #[must_use]
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    #[must_use]
    pub fn from_config(config: &ProfileCacheConfig) -> Self {
        Self::new(config.ttl, config.max_entries)
    }

    /// Returns `None` if no entry exists or the entry has expired.
    pub async fn get(&self, tenant_id: TenantId) -> Option<TenantProfile> {
        self.cache.get(&tenant_id).await
    }

    pub async fn insert(&self, tenant_id: TenantId, profile: TenantProfile) {
        self.cache.insert(tenant_id, profile).await;
    }

    /// Return the cached profile, or run `load` and cache its result.
    ///
    /// Concurrent callers for the same tenant share a single load.
    ///
    /// # Errors
    ///
    /// Returns the error of `load`; nothing is cached in that case.
    pub async fn get_or_load<F>(&self, tenant_id: TenantId, load: F) -> anyhow::Result<TenantProfile>
    where
        F: Future<Output = anyhow::Result<TenantProfile>>,
    {
        self.cache
            .try_get_with(tenant_id, load)
            .await
            .map_err(|e| anyhow::anyhow!("{e:#}"))
    }
}

#[async_trait]
impl TenantProfileCache for MokaTenantProfileCache {
    async fn evict(&self, tenant_id: TenantId) -> anyhow::Result<()> {
        self.cache.invalidate(&tenant_id).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenant_lifecycle_sdk::TenantProfileId;
    use uuid::Uuid;

    fn make_profile(name: &str) -> TenantProfile {
        TenantProfile {
            id: TenantProfileId(Uuid::new_v4()),
            name: name.to_owned(),
            description: None,
            isolated_rule_engine: false,
            queues: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_cache_miss_when_no_entry_exists() {
        let cache = MokaTenantProfileCache::new(Duration::from_secs(60), 100);
        assert!(cache.get(TenantId::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_evict_removes_entry() {
        let cache = MokaTenantProfileCache::new(Duration::from_secs(60), 100);
        let tenant_id = TenantId::new_v4();
        cache.insert(tenant_id, make_profile("Default")).await;
        assert!(cache.get(tenant_id).await.is_some());

        cache.evict(tenant_id).await.unwrap();

        assert!(cache.get(tenant_id).await.is_none());
    }

    #[tokio::test]
    async fn test_evict_unknown_tenant_is_noop() {
        let cache = MokaTenantProfileCache::new(Duration::from_secs(60), 100);
        let tenant_id = TenantId::new_v4();

        cache.evict(tenant_id).await.unwrap();
        cache.evict(tenant_id).await.unwrap();

        assert!(cache.get(tenant_id).await.is_none());
    }

    #[tokio::test]
    async fn test_get_or_load_caches_loaded_profile() {
        let cache = MokaTenantProfileCache::new(Duration::from_secs(60), 100);
        let tenant_id = TenantId::new_v4();
        let profile = make_profile("Default");

        let loaded = cache
            .get_or_load(tenant_id, {
                let profile = profile.clone();
                async move { Ok(profile) }
            })
            .await
            .unwrap();
        assert_eq!(loaded, profile);

        let cached = cache
            .get_or_load(tenant_id, async { Err(anyhow::anyhow!("loader must not run on hit")) })
            .await
            .unwrap();
        assert_eq!(cached, profile);
    }

    #[tokio::test]
    async fn test_get_or_load_does_not_cache_failures() {
        let cache = MokaTenantProfileCache::new(Duration::from_secs(60), 100);
        let tenant_id = TenantId::new_v4();

        let err = cache
            .get_or_load(tenant_id, async { Err(anyhow::anyhow!("profile store down")) })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("profile store down"));
        assert!(cache.get(tenant_id).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_expires_after_ttl() {
        let cache = MokaTenantProfileCache::new(Duration::from_millis(200), 100);
        let tenant_id = TenantId::new_v4();
        cache.insert(tenant_id, make_profile("Default")).await;

        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(cache.get(tenant_id).await.is_none());
    }
}
