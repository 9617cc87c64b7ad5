//! Window event types.

use serde_json::Value;

use crate::bridge::FrameContext;
use crate::envelope::Correlation;

/// Names of the events a window emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Focus,
    Blur,
    /// Raw routed message from the dispatcher.
    Message,
    /// The bridge finished its handshake.
    FrameInit,
    /// A routed message, interpreted by the bridge.
    FrameMessage,
    /// The window is being torn down.
    Destroy,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::Message => "message",
            EventKind::FrameInit => "iframe:init",
            EventKind::FrameMessage => "iframe:message",
            EventKind::Destroy => "destroy",
        }
    }
}

/// Events carried on a window's local event stream.
#[derive(Debug, Clone)]
pub enum WindowEvent {
    Focus,
    Blur,
    Message {
        reference: Correlation,
        payload: Value,
    },
    FrameInit(FrameContext),
    /// `context.responder` is set only when the message was a request.
    FrameMessage {
        context: FrameContext,
        payload: Value,
    },
    Destroy,
}

impl WindowEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            WindowEvent::Focus => EventKind::Focus,
            WindowEvent::Blur => EventKind::Blur,
            WindowEvent::Message { .. } => EventKind::Message,
            WindowEvent::FrameInit(_) => EventKind::FrameInit,
            WindowEvent::FrameMessage { .. } => EventKind::FrameMessage,
            WindowEvent::Destroy => EventKind::Destroy,
        }
    }
}

/// A frame finished loading. Carries the URL it loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLoadEvent {
    pub url: String,
}

impl FrameLoadEvent {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
