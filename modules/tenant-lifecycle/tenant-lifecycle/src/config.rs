//! Configuration for the tenant lifecycle module.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::domain::email::{DEFAULT_LOCAL_PART, is_local_part_token};

/// Prefix of environment variables overriding file configuration.
///
/// Nested keys are separated by `__`, e.g.
/// `TENANT_LIFECYCLE__PROFILE_CACHE__TTL=30s`.
pub const ENV_PREFIX: &str = "TENANT_LIFECYCLE__";

/// Free-text keys whose environment value is taken verbatim. Other values are
/// parsed, which would turn `0702341350` into the integer `702341350`.
const VERBATIM_ENV_KEYS: [&str; 3] = [
    "admin_email_suffix",
    "admin_local_part_fallback",
    "default_admin_password",
];

/// Module configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TenantLifecycleConfig {
    /// Appended to the normalized local part (and probe counter) to form
    /// the default admin email.
    pub admin_email_suffix: String,

    /// Local part used when a tenant title normalizes to nothing.
    #[serde(deserialize_with = "scalar_text::string")]
    pub admin_local_part_fallback: String,

    /// Secret assigned to every default tenant administrator.
    #[serde(skip_serializing, deserialize_with = "scalar_text::secret")]
    pub default_admin_password: SecretString,

    /// Install default tenant dashboards on creation. Disabled for
    /// lightweight and test deployments.
    pub install_default_dashboards: bool,

    /// Upper bound on waiting for version-control settings deletion.
    #[serde(with = "humantime_serde")]
    pub vc_cleanup_timeout: Duration,

    /// In-memory tenant-profile cache settings.
    pub profile_cache: ProfileCacheConfig,
}

/// Settings of the in-memory tenant-profile cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileCacheConfig {
    /// Time-to-live for cached entries.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,

    /// Maximum number of entries in cache.
    pub max_entries: u64,
}

fn default_admin_password() -> SecretString {
    SecretString::from("changeme".to_owned())
}

impl Default for TenantLifecycleConfig {
    fn default() -> Self {
        Self {
            admin_email_suffix: ".admin@tenants.local".to_owned(),
            admin_local_part_fallback: DEFAULT_LOCAL_PART.to_owned(),
            default_admin_password: default_admin_password(),
            install_default_dashboards: true,
            vc_cleanup_timeout: Duration::from_secs(60),
            profile_cache: ProfileCacheConfig::default(),
        }
    }
}

impl Default for ProfileCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_entries: 10_000,
        }
    }
}

impl TenantLifecycleConfig {
    /// Load configuration: defaults, then the YAML file (if any), then
    /// `TENANT_LIFECYCLE__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the merged
    /// configuration fails [`validate`](Self::validate).
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .split("__")
                .ignore(&VERBATIM_ENV_KEYS),
        );
        for (key, value) in Env::prefixed(ENV_PREFIX).only(&VERBATIM_ENV_KEYS).iter() {
            figment = figment.merge(Serialized::default(key.as_str(), value));
        }
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the domain relies on.
    ///
    /// The fallback local part must survive normalization unchanged, so it
    /// is restricted to lowercase ASCII letters and digits.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first offending field.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.admin_email_suffix.is_empty() {
            anyhow::bail!("admin_email_suffix must not be empty");
        }
        if !self.admin_email_suffix.contains('@') {
            anyhow::bail!(
                "admin_email_suffix must contain a domain ('@'), got '{}'",
                self.admin_email_suffix
            );
        }
        let fallback = &self.admin_local_part_fallback;
        if !is_local_part_token(fallback) {
            anyhow::bail!(
                "admin_local_part_fallback must be a non-empty [a-z0-9] token, got '{fallback}'"
            );
        }
        if self.vc_cleanup_timeout.is_zero() {
            anyhow::bail!("vc_cleanup_timeout must be greater than zero");
        }
        Ok(())
    }
}

/// Deserializers for free-text fields that YAML may present as a bare
/// number or boolean (`default_admin_password: 123456`).
mod scalar_text {
    use std::fmt;

    use secrecy::SecretString;
    use serde::Deserializer;
    use serde::de::{Error, Visitor};

    struct ScalarText;

    impl Visitor<'_> for ScalarText {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, integer or boolean")
        }

        fn visit_str<E: Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    pub(super) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        d.deserialize_any(ScalarText)
    }

    pub(super) fn secret<'de, D: Deserializer<'de>>(d: D) -> Result<SecretString, D::Error> {
        string(d).map(SecretString::from)
    }
}
