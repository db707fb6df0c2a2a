#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the tenant-lifecycle-cli binary
//!
//! These tests run the compiled binary and check configuration handling,
//! email preview and the in-memory lifecycle simulation.

use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Helper to run the tenant-lifecycle-cli binary with given arguments
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tenant-lifecycle-cli"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute tenant-lifecycle-cli")
}

fn write_config(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_str().unwrap().to_owned()
}

#[test]
fn test_cli_help_command() {
    let output = run_cli(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("check"));
    assert!(stdout.contains("email"));
    assert!(stdout.contains("simulate"));
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_missing_config_file() {
    let output = run_cli(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not exist"),
        "Should indicate config file not found: {stderr}"
    );
}

#[test]
fn test_cli_check_redacts_password() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        "valid.yaml",
        r#"
admin_email_suffix: ".owner@acme.test"
default_admin_password: "s3cret-value"
vc_cleanup_timeout: "30s"
"#,
    );

    let output = run_cli(&["--config", &config_path, "check"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Should succeed with valid config: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Configuration is valid"));
    assert!(stdout.contains(".owner@acme.test"));
    assert!(stdout.contains("30s"));
    assert!(!stdout.contains("s3cret-value"), "Password must not be printed");
}

#[test]
fn test_cli_check_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(&temp_dir, "invalid.yaml", "admin_email_suffix: \"no-domain\"\n");

    let output = run_cli(&["--config", &config_path, "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("admin_email_suffix"), "{stderr}");
}

#[test]
fn test_cli_check_rejects_unknown_field() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(&temp_dir, "unknown.yaml", "admin_mail: \"x\"\n");

    let output = run_cli(&["--config", &config_path, "check"]);

    assert!(!output.status.success());
}

#[test]
fn test_cli_print_config() {
    let output = run_cli(&["--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Effective configuration"));
    assert!(stdout.contains(".admin@tenants.local"));
    assert!(!stdout.contains("default_admin_password"));
}

#[test]
fn test_cli_email_preview() {
    let output = run_cli(&["email", "Acme Corp", "!!!"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("acmecorp.admin@tenants.local"), "{stdout}");
    assert!(stdout.contains("tenant.admin@tenants.local"), "{stdout}");
}

#[test]
fn test_cli_simulate_creates_and_deletes() {
    let output = run_cli(&["simulate", "Acme", "Acme"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Simulation should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("acme.admin@tenants.local"), "{stdout}");
    assert!(stdout.contains("acme1.admin@tenants.local"), "{stdout}");
    assert_eq!(stdout.matches("created\t").count(), 2);
    assert_eq!(stdout.matches("deleted\t").count(), 2);
}

#[test]
fn test_cli_email_requires_title() {
    let output = run_cli(&["email"]);

    assert!(!output.status.success());
}
