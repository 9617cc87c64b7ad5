//! The embedded page's side of the protocol.
//!
//! A [`ChildSession`] learns its window id from the handshake and stamps it
//! on everything it sends back. Used by the headless demo and tests; real
//! pages use the equivalent JavaScript from
//! [`child_init_script`](crate::envelope::child_init_script).

use std::collections::HashSet;

use framelink_common::WindowId;
use serde_json::Value;
use tracing::trace;

use crate::envelope::{Correlation, Envelope, EnvelopeKind, InboundEnvelope};

/// How a child interprets one envelope from its host.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildInbound {
    /// The host told us our window id.
    Handshake(WindowId),
    /// Answer to a request this session made.
    Reply { reference: u64, payload: Value },
    /// The host expects an answer carrying `reference`.
    Request { reference: u64, payload: Value },
    Message(Value),
    /// A handshake without a usable id.
    Ignored,
}

#[derive(Debug, Default)]
pub struct ChildSession {
    window: Option<WindowId>,
    next_reference: u64,
    pending: HashSet<u64>,
}

impl ChildSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The window id learned from the handshake.
    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    pub fn is_connected(&self) -> bool {
        self.window.is_some()
    }

    /// Requests sent and not yet answered.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn receive(&mut self, envelope: &Envelope) -> ChildInbound {
        match envelope.kind {
            EnvelopeKind::Handshake => match WindowId::from_wire(&envelope.payload) {
                Some(wid) => {
                    trace!(window_id = %wid, "child handshake");
                    self.window = Some(wid);
                    ChildInbound::Handshake(wid)
                }
                None => ChildInbound::Ignored,
            },
            EnvelopeKind::Message => match envelope.reference {
                Correlation::Request(reference) if self.pending.remove(&reference) => {
                    ChildInbound::Reply {
                        reference,
                        payload: envelope.payload.clone(),
                    }
                }
                Correlation::Request(reference) => ChildInbound::Request {
                    reference,
                    payload: envelope.payload.clone(),
                },
                Correlation::Unsolicited => ChildInbound::Message(envelope.payload.clone()),
            },
        }
    }

    /// Data for an unsolicited message, or `None` before the handshake.
    pub fn send(&self, payload: Value) -> Option<Value> {
        self.compose(Correlation::Unsolicited, payload)
    }

    /// Data for a request plus the reference its reply will carry.
    pub fn request(&mut self, payload: Value) -> Option<(u64, Value)> {
        let reference = self.next_reference;
        let data = self.compose(Correlation::Request(reference), payload)?;
        self.next_reference += 1;
        self.pending.insert(reference);
        Some((reference, data))
    }

    /// Data answering a host request.
    pub fn respond(&self, reference: u64, payload: Value) -> Option<Value> {
        self.compose(Correlation::Request(reference), payload)
    }

    fn compose(&self, reference: Correlation, payload: Value) -> Option<Value> {
        let window = self.window?;
        Some(InboundEnvelope::new(window, reference, payload).to_data())
    }
}
