pub mod errors;
pub mod id;
pub mod types;

pub use errors::{BridgeError, ConfigError, FramelinkError, TransportError};
pub use id::{new_id, FrameId, WindowId};
pub use types::RoutingPolicy;

pub type Result<T> = std::result::Result<T, FramelinkError>;
