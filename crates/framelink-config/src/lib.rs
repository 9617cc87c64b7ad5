//! Framelink configuration system.
//!
//! TOML-based configuration for the frame bridge: outbound origin
//! restriction, inbound routing policy, frame styling and logging. All
//! sections use defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use framelink_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{FramelinkConfig, CONFIG_SCHEMA_VERSION};

use framelink_common::ConfigError;

/// Load config from the platform default path.
///
/// Creates a commented default file if none exists, then validates.
pub fn load_config() -> Result<FramelinkConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &FramelinkConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&FramelinkConfig::default());
        assert!(json.contains("\"transport\""));
        assert!(json.contains("\"frame\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"trusting\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&FramelinkConfig::default());
        let parsed: FramelinkConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.transport.target_origin, "framelink://localhost");
        assert_eq!(parsed.frame.width, "100%");
        assert_eq!(parsed.frame.border, 0);
    }
}
