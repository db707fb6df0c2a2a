//! Adapters for the domain ports.

pub mod hasher;
pub mod memory;
pub mod profile_cache;

pub use hasher::Argon2SecretHasher;
pub use memory::{
    DefaultContent, InMemoryBackend, InMemoryTenantProfiles, InMemoryTenantStore,
    InMemoryUserService, InMemoryVersionControlSettings, RecordingContentInstaller,
    TopologyQueueReconciler,
};
pub use profile_cache::MokaTenantProfileCache;
