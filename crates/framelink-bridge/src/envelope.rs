//! Wire format of the frame messaging protocol.
//!
//! Messages flow in both directions over the platform's postal channel:
//! - **Host -> frame**: an [`Envelope`] posted to one frame's endpoint,
//!   restricted to the configured target origin. No address is needed on
//!   the way out because every endpoint is point-to-point.
//! - **Frame -> host**: a structured object carrying the destination window
//!   id, a correlation id and the payload, read by the inbound dispatcher
//!   as an [`InboundEnvelope`].

use framelink_common::{TransportError, WindowId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Channel marker: names the envelope kind and tags it as ours.
pub const MESSAGE_FIELD: &str = "__framelink_message";
/// Destination window id, stamped by the frame on everything it sends.
pub const WINDOW_FIELD: &str = "__framelink_window";
/// Correlation id; `-1` means no reply is expected.
pub const REFERENCE_FIELD: &str = "__framelink_reference";
/// Application payload.
pub const PAYLOAD_FIELD: &str = "payload";

/// Wire value of [`Correlation::Unsolicited`].
pub const UNSOLICITED: i64 = -1;

/// Envelope kind carried in the channel marker field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    Message,
    Handshake,
}

/// Correlation id pairing a request with its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Correlation {
    /// No reply expected (`-1` on the wire).
    Unsolicited,
    /// Tag of an outstanding request.
    Request(u64),
}

impl Correlation {
    /// Read a correlation id from a wire value. Anything that is not a
    /// non-negative integer counts as unsolicited.
    pub fn from_wire(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_u64) {
            Some(n) => Correlation::Request(n),
            None => Correlation::Unsolicited,
        }
    }

    pub fn request_id(&self) -> Option<u64> {
        match self {
            Correlation::Request(n) => Some(*n),
            Correlation::Unsolicited => None,
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(self, Correlation::Request(_))
    }

    pub fn to_wire(&self) -> Value {
        match self {
            Correlation::Request(n) => Value::from(*n),
            Correlation::Unsolicited => Value::from(UNSOLICITED),
        }
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Request(n) => write!(f, "{n}"),
            Correlation::Unsolicited => write!(f, "{UNSOLICITED}"),
        }
    }
}

impl Serialize for Correlation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Correlation::Request(n) => serializer.serialize_u64(*n),
            Correlation::Unsolicited => serializer.serialize_i64(UNSOLICITED),
        }
    }
}

impl<'de> Deserialize<'de> for Correlation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Correlation::from_wire(Some(&value)))
    }
}

/// A host -> frame message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "__framelink_message")]
    pub kind: EnvelopeKind,
    #[serde(rename = "__framelink_reference")]
    pub reference: Correlation,
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    /// A regular message, optionally tagged with a correlation id.
    pub fn message(payload: Value, reference: Correlation) -> Self {
        Self {
            kind: EnvelopeKind::Message,
            reference,
            payload,
        }
    }

    /// The one-time message telling a frame which window owns it.
    pub fn handshake(window: WindowId) -> Self {
        Self {
            kind: EnvelopeKind::Handshake,
            reference: Correlation::Unsolicited,
            payload: Value::from(window.0),
        }
    }

    /// Encode to the structured value handed to the platform's post call.
    pub fn to_value(&self) -> Result<Value, TransportError> {
        serde_json::to_value(self).map_err(|e| TransportError::Encode(e.to_string()))
    }

    /// Decode an envelope a host posted. `None` if the value is not ours.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.get(MESSAGE_FIELD)?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// A frame -> host message, as read by the inbound dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEnvelope {
    pub window: WindowId,
    pub reference: Correlation,
    pub payload: Value,
}

impl InboundEnvelope {
    pub fn new(window: WindowId, reference: Correlation, payload: Value) -> Self {
        Self {
            window,
            reference,
            payload,
        }
    }

    /// Read the reserved fields out of inbound message data.
    ///
    /// Returns `None` when the data carries no usable window id; the
    /// correlation id and payload are lenient (missing reads as
    /// unsolicited / `null`).
    pub fn from_data(data: &Value) -> Option<Self> {
        let window = WindowId::from_wire(data.get(WINDOW_FIELD)?)?;
        Some(Self {
            window,
            reference: Correlation::from_wire(data.get(REFERENCE_FIELD)),
            payload: data.get(PAYLOAD_FIELD).cloned().unwrap_or(Value::Null),
        })
    }

    /// Build the data object a frame posts to its host.
    pub fn to_data(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(WINDOW_FIELD.to_string(), Value::from(self.window.0));
        map.insert(REFERENCE_FIELD.to_string(), self.reference.to_wire());
        map.insert(PAYLOAD_FIELD.to_string(), self.payload.clone());
        Value::Object(map)
    }
}

/// JavaScript shim for the embedded page's side of the protocol.
///
/// Injected (or bundled) into every framed page. It waits for the
/// handshake, then stamps the learned window id on every outgoing message.
/// `__HOST_ORIGIN__` is replaced by [`child_init_script`].
const CHILD_INIT_SCRIPT: &str = r#"
(function() {
    var hostOrigin = __HOST_ORIGIN__;
    var api = window.framelink = window.framelink || {};
    api.windowId = null;
    api._handlers = {};
    api._pending = {};
    api._nextReference = 0;

    api.on = function(kind, callback) {
        api._handlers[kind] = callback;
    };

    api._post = function(reference, payload) {
        if (api.windowId === null) {
            return false;
        }
        var msg = { payload: payload === undefined ? null : payload };
        msg["__framelink_window"] = api.windowId;
        msg["__framelink_reference"] = reference;
        window.parent.postMessage(msg, hostOrigin);
        return true;
    };

    api.send = function(payload) {
        return api._post(-1, payload);
    };

    api.request = function(payload, callback) {
        var reference = api._nextReference++;
        api._pending[reference] = callback;
        if (!api._post(reference, payload)) {
            delete api._pending[reference];
            return -1;
        }
        return reference;
    };

    api.respond = function(reference, payload) {
        return api._post(reference, payload);
    };

    window.addEventListener('message', function(ev) {
        var data = ev.data;
        if (ev.origin !== hostOrigin || !data || !data["__framelink_message"]) {
            return;
        }
        var kind = data["__framelink_message"];
        var reference = data["__framelink_reference"];
        if (kind === 'handshake') {
            api.windowId = data.payload;
            var onHandshake = api._handlers['handshake'];
            if (onHandshake) { onHandshake(api.windowId); }
            return;
        }
        if (reference >= 0 && api._pending[reference]) {
            var callback = api._pending[reference];
            delete api._pending[reference];
            callback(data.payload);
            return;
        }
        if (reference >= 0) {
            var onRequest = api._handlers['request'];
            if (onRequest) {
                onRequest(data.payload, function(response) {
                    api.respond(reference, response);
                });
            }
            return;
        }
        var onMessage = api._handlers['message'];
        if (onMessage) { onMessage(data.payload); }
    });
})();
"#;

/// Render the child-side shim bound to the host's origin.
pub fn child_init_script(host_origin: &str) -> String {
    let origin = serde_json::to_string(host_origin).unwrap_or_else(|_| "\"\"".to_string());
    CHILD_INIT_SCRIPT.replace("__HOST_ORIGIN__", &origin)
}
