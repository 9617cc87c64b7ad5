//! Tests for TOML config loading, creation, and path resolution.

use super::paths::resolve_config_path;
use super::template::default_config_toml;
use super::*;
use crate::schema::{FramelinkConfig, LogLevel};
use framelink_common::{ConfigError, RoutingPolicy};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_framelink_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[transport]
target_origin = "https://desktop.example.org"
routing = "verified"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.transport.target_origin, "https://desktop.example.org");
    assert_eq!(config.transport.routing, RoutingPolicy::Verified);
    // Defaults preserved
    assert_eq!(config.frame.width, "100%");
    assert_eq!(config.logging.level, LogLevel::Info);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_config_with_invalid_values_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[transport]
target_origin = "*"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.transport.target_origin, "framelink://localhost");
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("framelink").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.transport.target_origin, "framelink://localhost");
    assert_eq!(config.frame.border, 0);
}

#[test]
fn default_config_toml_is_valid() {
    let config: FramelinkConfig = toml::from_str(&default_config_toml()).unwrap();
    assert_eq!(config.transport.routing, RoutingPolicy::Trusting);
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("framelink"));
        assert!(path_str.ends_with("config.toml"));
    }
}

#[test]
fn env_override_replaces_platform_path() {
    let path = resolve_config_path(
        Some(OsString::from("/srv/desk/framelink.toml")),
        Some(PathBuf::from("/home/u/.config")),
    )
    .unwrap();
    assert_eq!(path, PathBuf::from("/srv/desk/framelink.toml"));
}

#[test]
fn empty_env_override_is_ignored() {
    let path = resolve_config_path(Some(OsString::new()), Some(PathBuf::from("/home/u/.config"))).unwrap();
    assert_eq!(path, PathBuf::from("/home/u/.config/framelink/config.toml"));
}

#[test]
fn missing_config_dir_without_override_is_an_error() {
    assert!(matches!(
        resolve_config_path(None, None),
        Err(ConfigError::ParseError(_))
    ));
    assert_eq!(CONFIG_PATH_ENV, "FRAMELINK_CONFIG");
}
