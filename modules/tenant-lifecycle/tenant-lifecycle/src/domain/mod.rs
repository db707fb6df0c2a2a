//! Domain layer for the tenant lifecycle module.

pub mod admin;
pub mod email;
pub mod error;
pub mod local_client;
pub mod ports;
pub mod service;

pub use admin::AdminProvisioner;
pub use email::{EmailAllocator, normalize_title};
pub use error::DomainError;
pub use local_client::TenantLifecycleLocalClient;
pub use service::{Collaborators, Service};
