//! The single inbound subscription point of the shared transport.
//!
//! Every message any frame posts to the host passes through
//! [`InboundDispatcher::dispatch`], which reads the destination window id
//! and correlation id the frame stamped on it, finds that window in the
//! registry and re-emits the payload on the window's own event stream.
//! Unaddressed traffic and messages for windows that no longer exist are
//! dropped without error: the transport is shared with unrelated senders
//! and windows close while messages are in flight.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use framelink_common::{FrameId, RoutingPolicy, WindowId};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::envelope::InboundEnvelope;
use crate::events::WindowEvent;
use crate::registry::WindowRegistry;

/// A raw inbound message as delivered by the transport.
#[derive(Debug, Clone, Default)]
pub struct MessageEvent {
    /// Structured message data, if any.
    pub data: Option<Value>,
    /// Origin of the sender, as reported by the transport.
    pub origin: String,
    /// The frame that posted the message, when the transport can tell.
    pub source: Option<FrameId>,
}

impl MessageEvent {
    pub fn new(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn from_frame(source: FrameId, origin: impl Into<String>, data: Value) -> Self {
        Self {
            data: Some(data),
            origin: origin.into(),
            source: Some(source),
        }
    }
}

/// What the dispatcher did with one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered(WindowId),
    /// No data (or falsy data) on the event.
    NoData,
    /// Data without a usable window id.
    Unaddressed,
    /// No live window has that id.
    UnknownWindow(WindowId),
    /// Verified routing: the sender was not handshaken with that window.
    Rejected(WindowId),
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered(_))
    }
}

/// Which window each frame was handshaken with.
#[derive(Debug, Default)]
pub struct FrameBindings {
    bound: RwLock<HashMap<FrameId, WindowId>>,
}

impl FrameBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, frame: FrameId, window: WindowId) {
        if let Ok(mut bound) = self.bound.write() {
            bound.insert(frame, window);
        }
    }

    pub fn unbind(&self, frame: &FrameId) -> Option<WindowId> {
        self.bound.write().ok()?.remove(frame)
    }

    pub fn window_for(&self, frame: &FrameId) -> Option<WindowId> {
        self.bound.read().ok()?.get(frame).copied()
    }

    pub fn len(&self) -> usize {
        self.bound.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub type InboundListener = Arc<dyn Fn(&MessageEvent) + Send + Sync>;

/// The platform's global subscription point for inbound messages.
pub trait InboundTransport {
    fn subscribe(&self, listener: InboundListener);
}

/// Routes inbound messages to live windows.
pub struct InboundDispatcher {
    registry: Arc<dyn WindowRegistry>,
    bindings: Arc<FrameBindings>,
    policy: RoutingPolicy,
}

impl InboundDispatcher {
    pub fn new(
        registry: Arc<dyn WindowRegistry>,
        bindings: Arc<FrameBindings>,
        policy: RoutingPolicy,
    ) -> Self {
        Self {
            registry,
            bindings,
            policy,
        }
    }

    pub fn bindings(&self) -> &Arc<FrameBindings> {
        &self.bindings
    }

    pub fn policy(&self) -> RoutingPolicy {
        self.policy
    }

    /// Route one inbound message.
    ///
    /// Performs at most one registry lookup and at most one emission; never
    /// fails.
    pub fn dispatch(&self, event: &MessageEvent) -> DispatchOutcome {
        let data = match event.data.as_ref() {
            Some(data) if !is_falsy(data) => data,
            _ => {
                trace!(origin = %event.origin, "inbound message without data dropped");
                return DispatchOutcome::NoData;
            }
        };

        let Some(inbound) = InboundEnvelope::from_data(data) else {
            trace!(origin = %event.origin, "inbound message without window id dropped");
            return DispatchOutcome::Unaddressed;
        };
        let wid = inbound.window;

        if self.policy == RoutingPolicy::Verified && !self.is_bound_sender(event, wid) {
            warn!(
                window_id = %wid,
                source = ?event.source,
                "inbound message rejected: sender not bound to claimed window"
            );
            return DispatchOutcome::Rejected(wid);
        }

        let Some(window) = self.registry.find(wid) else {
            debug!(window_id = %wid, "inbound message for unknown window dropped");
            return DispatchOutcome::UnknownWindow(wid);
        };

        trace!(window_id = %wid, reference = %inbound.reference, "inbound message routed");
        window.emit(&WindowEvent::Message {
            reference: inbound.reference,
            payload: inbound.payload,
        });
        DispatchOutcome::Delivered(wid)
    }

    fn is_bound_sender(&self, event: &MessageEvent, wid: WindowId) -> bool {
        event
            .source
            .as_ref()
            .and_then(|source| self.bindings.window_for(source))
            .is_some_and(|bound| bound == wid)
    }
}

/// Mirrors the platform's truthiness test on message data.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
