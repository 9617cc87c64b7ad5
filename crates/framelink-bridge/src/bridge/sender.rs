use std::sync::Arc;

use framelink_common::{FrameId, TransportError, WindowId};
use serde_json::Value;
use tracing::trace;

use crate::envelope::{Correlation, Envelope, EnvelopeKind};
use crate::frame::ChildEndpoint;

/// Posts envelopes to one frame, restricted to the host's target origin.
#[derive(Clone)]
pub struct FrameSender {
    frame_id: FrameId,
    endpoint: Arc<dyn ChildEndpoint>,
    target_origin: Arc<str>,
}

impl FrameSender {
    pub fn new(frame_id: FrameId, endpoint: Arc<dyn ChildEndpoint>, target_origin: Arc<str>) -> Self {
        Self {
            frame_id,
            endpoint,
            target_origin,
        }
    }

    pub fn frame_id(&self) -> &FrameId {
        &self.frame_id
    }

    pub fn target_origin(&self) -> &str {
        &self.target_origin
    }

    /// Send an unsolicited message.
    pub fn send(&self, payload: Value) -> Result<(), TransportError> {
        self.send_with(payload, Correlation::Unsolicited, EnvelopeKind::Message)
    }

    /// Send a message tagged with a correlation id the frame should echo
    /// in its reply.
    pub fn request(&self, payload: Value, reference: u64) -> Result<(), TransportError> {
        self.send_with(payload, Correlation::Request(reference), EnvelopeKind::Message)
    }

    pub fn send_with(
        &self,
        payload: Value,
        reference: Correlation,
        kind: EnvelopeKind,
    ) -> Result<(), TransportError> {
        let envelope = Envelope {
            kind,
            reference,
            payload,
        };
        trace!(frame_id = %self.frame_id, ?kind, reference = %reference, "posting envelope");
        self.endpoint.post_message(&envelope, &self.target_origin)
    }

    pub(crate) fn handshake(&self, window: WindowId) -> Result<(), TransportError> {
        let envelope = Envelope::handshake(window);
        trace!(frame_id = %self.frame_id, window_id = %window, "posting handshake");
        self.endpoint.post_message(&envelope, &self.target_origin)
    }
}

impl std::fmt::Debug for FrameSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSender")
            .field("frame_id", &self.frame_id)
            .field("target_origin", &self.target_origin)
            .finish()
    }
}

/// Answers one correlated request from a frame.
#[derive(Debug, Clone)]
pub struct Responder {
    sender: FrameSender,
    reference: u64,
}

impl Responder {
    pub(crate) fn new(sender: FrameSender, reference: u64) -> Self {
        Self { sender, reference }
    }

    pub fn reference(&self) -> u64 {
        self.reference
    }

    /// Reply with the request's own correlation id.
    pub fn respond(&self, response: Value) -> Result<(), TransportError> {
        self.sender.request(response, self.reference)
    }
}
