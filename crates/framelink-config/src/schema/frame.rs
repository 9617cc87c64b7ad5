//! Embedded frame styling.

use serde::{Deserialize, Serialize};

/// Style applied to every frame the factory creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// CSS width (valid: number with px, em, rem or %).
    pub width: String,
    /// CSS height (valid: number with px, em, rem or %).
    pub height: String,
    /// Border width in pixels (valid range: 0-16).
    pub border: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: "100%".into(),
            height: "100%".into(),
            border: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_config_defaults_fill_container() {
        let config = FrameConfig::default();
        assert_eq!(config.width, "100%");
        assert_eq!(config.height, "100%");
        assert_eq!(config.border, 0);
    }

    #[test]
    fn frame_config_partial_toml() {
        let config: FrameConfig = toml::from_str("border = 2").unwrap();
        assert_eq!(config.border, 2);
        assert_eq!(config.width, "100%");
    }
}
