//! Integration tests for configuration resolution and graceful degradation
//!
//! Tests that manipulate SCLS_CONFIG are marked with #[serial] so they do
//! not race each other on the process environment.

use scls_common::config::{write_config, ConfigResolver, LandingConfig, CONFIG_ENV_VAR};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_cli_path_takes_precedence_over_env() {
    let temp_dir = TempDir::new().unwrap();
    let cli = temp_dir.path().join("cli.toml");
    let from_env = temp_dir.path().join("env.toml");

    env::set_var(CONFIG_ENV_VAR, &from_env);
    let resolver = ConfigResolver::new(Some(cli.clone()));
    assert_eq!(resolver.resolve_path(), Some(cli));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_cli_path() {
    let temp_dir = TempDir::new().unwrap();
    let from_env = temp_dir.path().join("env.toml");
    std::fs::write(&from_env, "[scroll]\ntransition_ms = 500\n").unwrap();

    env::set_var(CONFIG_ENV_VAR, &from_env);
    let resolver = ConfigResolver::new(None);
    assert_eq!(resolver.resolve_path(), Some(from_env));

    let config = resolver.load().unwrap();
    assert_eq!(config.scroll.transition_ms, 500);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_file_degrades_to_defaults() {
    env::remove_var(CONFIG_ENV_VAR);

    let resolver = ConfigResolver::new(Some(PathBuf::from(
        "/nonexistent/scoliscan/definitely-missing.toml",
    )));
    let config = resolver.load().expect("missing config must not be an error");
    assert_eq!(config, LandingConfig::default());
}

#[test]
fn test_invalid_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    std::fs::write(&path, "[services]\nwindow_ms = 0\n").unwrap();

    let resolver = ConfigResolver::new(Some(path));
    assert!(resolver.load().is_err());
}

#[test]
fn test_write_then_load_preserves_values() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("nested").join("config.toml");

    let mut config = LandingConfig::default();
    config.services.wheel_threshold = 320.0;
    config.logging.level = "debug".to_string();

    write_config(&config, &target).unwrap();

    assert!(target.exists());
    assert!(!target.with_extension("toml.tmp").exists());
    assert_eq!(LandingConfig::load(&target).unwrap(), config);
}
