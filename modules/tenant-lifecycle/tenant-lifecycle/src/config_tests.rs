//! Tests for configuration parsing.

#[cfg(test)]
mod tests {
    use crate::config::TenantLifecycleConfig;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_config_default() {
        let config = TenantLifecycleConfig::default();
        assert_eq!(config.admin_email_suffix, ".admin@tenants.local");
        assert_eq!(config.admin_local_part_fallback, "tenant");
        assert!(config.install_default_dashboards);
        assert_eq!(config.vc_cleanup_timeout, Duration::from_secs(60));
        assert_eq!(config.profile_cache.ttl, Duration::from_secs(300));
        assert_eq!(config.profile_cache.max_entries, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_from_yaml() {
        let yaml = r#"
admin_email_suffix: ".ops@example.com"
admin_local_part_fallback: "org"
default_admin_password: "s3cret"
install_default_dashboards: false
vc_cleanup_timeout: "90s"
profile_cache:
  ttl: "1m"
  max_entries: 50
"#;
        let config: TenantLifecycleConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.admin_email_suffix, ".ops@example.com");
        assert_eq!(config.admin_local_part_fallback, "org");
        assert_eq!(config.default_admin_password.expose_secret(), "s3cret");
        assert!(!config.install_default_dashboards);
        assert_eq!(config.vc_cleanup_timeout, Duration::from_secs(90));
        assert_eq!(config.profile_cache.ttl, Duration::from_secs(60));
        assert_eq!(config.profile_cache.max_entries, 50);
    }

    #[test]
    fn test_config_applies_defaults() {
        let yaml = r#"
install_default_dashboards: false
"#;
        let config: TenantLifecycleConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(!config.install_default_dashboards);
        assert_eq!(config.admin_local_part_fallback, "tenant");
        assert_eq!(config.vc_cleanup_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_config_reject_unknown_fields() {
        let yaml = r#"
admin_email_suffix: "@example.com"
unknown_field: "should fail"
"#;
        let result: Result<TenantLifecycleConfig, _> = serde_saphyr::from_str(yaml);
        assert!(
            result.is_err(),
            "Config should reject unknown fields due to deny_unknown_fields"
        );
    }

    #[test]
    fn test_validate_rejects_symbolic_fallback() {
        let config = TenantLifecycleConfig {
            admin_local_part_fallback: "Tenant!".to_owned(),
            ..TenantLifecycleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_suffix_without_domain() {
        let config = TenantLifecycleConfig {
            admin_email_suffix: ".admin".to_owned(),
            ..TenantLifecycleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = TenantLifecycleConfig {
            vc_cleanup_timeout: Duration::ZERO,
            ..TenantLifecycleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialized_config_omits_password() {
        let json = serde_json::to_value(TenantLifecycleConfig::default()).unwrap();
        assert!(json.get("default_admin_password").is_none());
        assert_eq!(json["vc_cleanup_timeout"], "1m");
    }

    #[test]
    fn test_load_layers_file_and_env() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "admin_email_suffix: \"@file.example\"").unwrap();
        writeln!(file, "vc_cleanup_timeout: \"2m\"").unwrap();

        temp_env::with_vars(
            [
                ("TENANT_LIFECYCLE__VC_CLEANUP_TIMEOUT", Some("15s")),
                ("TENANT_LIFECYCLE__PROFILE_CACHE__MAX_ENTRIES", Some("7")),
            ],
            || {
                let config = TenantLifecycleConfig::load(Some(file.path())).unwrap();
                assert_eq!(config.admin_email_suffix, "@file.example");
                assert_eq!(config.vc_cleanup_timeout, Duration::from_secs(15));
                assert_eq!(config.profile_cache.max_entries, 7);
            },
        );
    }

    #[test]
    fn test_load_keeps_numeric_env_values_verbatim() {
        temp_env::with_vars(
            [
                ("TENANT_LIFECYCLE__DEFAULT_ADMIN_PASSWORD", Some("0702341350")),
                ("TENANT_LIFECYCLE__ADMIN_LOCAL_PART_FALLBACK", Some("42")),
                ("TENANT_LIFECYCLE__PROFILE_CACHE__MAX_ENTRIES", Some("64")),
            ],
            || {
                let config = TenantLifecycleConfig::load(None).unwrap();
                assert_eq!(config.default_admin_password.expose_secret(), "0702341350");
                assert_eq!(config.admin_local_part_fallback, "42");
                assert_eq!(config.profile_cache.max_entries, 64);
            },
        );
    }

    #[test]
    fn test_config_accepts_numeric_yaml_scalars_for_text_fields() {
        let yaml = r#"
admin_local_part_fallback: 42
default_admin_password: 123456
"#;
        let config: TenantLifecycleConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.admin_local_part_fallback, "42");
        assert_eq!(config.default_admin_password.expose_secret(), "123456");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_invalid_merged_config() {
        temp_env::with_var(
            "TENANT_LIFECYCLE__ADMIN_LOCAL_PART_FALLBACK",
            Some("NOT OK"),
            || {
                assert!(TenantLifecycleConfig::load(None).is_err());
            },
        );
    }
}
