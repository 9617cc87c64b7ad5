//! TOML config file loading and creation.
//!
//! The file lives at `<config_dir>/framelink/config.toml` unless
//! `FRAMELINK_CONFIG` points elsewhere; a commented default is written the
//! first time it is missing.

mod loader;
mod paths;
mod template;

#[cfg(test)]
mod tests;

pub use loader::{load_default, load_from_path};
pub use paths::{create_default_config, default_config_path, CONFIG_PATH_ENV};
