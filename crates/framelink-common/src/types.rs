use serde::{Deserialize, Serialize};

/// How the inbound dispatcher treats the window id a child puts on its
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutingPolicy {
    /// Route on the child-asserted window id as-is.
    #[default]
    Trusting,
    /// Only route when the sending frame was handshaken with that window.
    Verified,
}
