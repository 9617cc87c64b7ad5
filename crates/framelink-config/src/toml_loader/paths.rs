//! Config path resolution and default file creation.

use framelink_common::ConfigError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_config_toml;

/// Environment variable naming a config file to use instead of the
/// platform default.
pub const CONFIG_PATH_ENV: &str = "FRAMELINK_CONFIG";

/// Resolve the config file path.
///
/// `FRAMELINK_CONFIG` wins when set and non-empty; otherwise
/// `<config_dir>/framelink/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    resolve_config_path(std::env::var_os(CONFIG_PATH_ENV), dirs::config_dir())
}

pub(crate) fn resolve_config_path(
    env_override: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = env_override.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let config_dir = config_dir
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("framelink").join("config.toml"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}
