//! Transport settings.

use framelink_common::RoutingPolicy;
use serde::{Deserialize, Serialize};

/// Outbound and inbound message channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Origin every outbound envelope is restricted to.
    pub target_origin: String,
    /// Trust level applied to the window id children stamp on messages.
    pub routing: RoutingPolicy,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            target_origin: "framelink://localhost".into(),
            routing: RoutingPolicy::Trusting,
        }
    }
}
