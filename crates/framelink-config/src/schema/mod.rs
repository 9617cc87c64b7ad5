//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod frame;
mod logging;
mod transport;

pub use frame::*;
pub use logging::*;
pub use transport::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FramelinkConfig {
    pub transport: TransportConfig,
    pub frame: FrameConfig,
    pub logging: LoggingConfig,
}
