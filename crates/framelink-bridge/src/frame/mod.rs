//! Embedded frame creation.
//!
//! `FrameFactory` asks the platform [`FrameBackend`] for a new frame
//! endpoint, wraps it in an unattached [`FrameNode`] styled to fill its
//! container, and arms a one-shot load hook on it.

use std::sync::Arc;

use framelink_common::{FrameId, TransportError};

use crate::envelope::Envelope;

mod factory;
mod node;

pub use factory::FrameFactory;
pub use node::{FrameNode, ReadyCallback};

/// Style applied to created frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStyle {
    pub width: String,
    pub height: String,
    /// Border width in pixels.
    pub border: u32,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            width: "100%".to_string(),
            height: "100%".to_string(),
            border: 0,
        }
    }
}

/// The message endpoint of one embedded frame.
pub trait ChildEndpoint: Send + Sync {
    /// Post an envelope to the frame. Implementations must refuse delivery
    /// when the frame's origin is not `target_origin`.
    fn post_message(&self, envelope: &Envelope, target_origin: &str)
        -> Result<(), TransportError>;

    fn focus(&self);

    fn blur(&self);

    /// Point the frame at a new document.
    fn navigate(&self, src: &str);
}

/// Platform hook that materializes frames.
pub trait FrameBackend: Send + Sync {
    fn create_endpoint(&self, id: &FrameId, style: &FrameStyle) -> Arc<dyn ChildEndpoint>;

    /// The frame's window is gone; drop any bookkeeping kept for it.
    fn release(&self, _id: &FrameId) {}
}
