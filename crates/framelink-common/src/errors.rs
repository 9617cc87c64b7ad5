use std::path::PathBuf;

use crate::id::{FrameId, WindowId};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the outbound postal channel to a child frame.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("frame endpoint disconnected: {0}")]
    Disconnected(FrameId),

    #[error("delivery to origin '{target}' rejected, frame is at '{actual}'")]
    OriginRejected { target: String, actual: String },

    #[error("envelope encode error: {0}")]
    Encode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("inbound dispatcher is already installed")]
    AlreadyInitialized,

    #[error("a live window already claims {0}")]
    DuplicateWindow(WindowId),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, thiserror::Error)]
pub enum FramelinkError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<TransportError> for FramelinkError {
    fn from(e: TransportError) -> Self {
        Self::Bridge(BridgeError::Transport(e))
    }
}
