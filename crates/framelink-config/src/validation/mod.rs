//! Full configuration validation.
//!
//! Each section pushes its problems into a shared list; the caller gets a
//! single `ConfigError` with all of them.

mod helpers;


use crate::schema::FramelinkConfig;
use framelink_common::ConfigError;

use helpers::{validate_css_length, validate_range};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &FramelinkConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_transport(&mut errors, config);
    validate_frame(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_transport(errors: &mut Vec<String>, config: &FramelinkConfig) {
    let origin = config.transport.target_origin.trim();
    if origin.is_empty() {
        errors.push("transport.target_origin must not be empty".into());
    } else if origin == "*" {
        errors.push("transport.target_origin = \"*\" would post to any origin".into());
    } else if !origin.contains("://") {
        errors.push(format!(
            "transport.target_origin = \"{origin}\" is not an origin (missing scheme)"
        ));
    }
}

fn validate_frame(errors: &mut Vec<String>, config: &FramelinkConfig) {
    validate_css_length(errors, "frame.width", &config.frame.width);
    validate_css_length(errors, "frame.height", &config.frame.height);
    validate_range(errors, "frame.border", config.frame.border, 0, 16);
}
