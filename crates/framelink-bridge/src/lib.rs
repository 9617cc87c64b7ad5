//! Host-side bridge between windows and the sandboxed frames they embed.
//!
//! Provides:
//! - A single inbound dispatcher that routes every message on the shared
//!   transport to the window it is addressed to
//! - A frame factory that creates styled, unattached frames with a one-shot
//!   load hook
//! - A per-window bridge: handshake, focus/blur proxying, correlated
//!   request/response routing and teardown
//! - An open helper that attaches the frame once the window content exists
//! - A headless backend that runs the whole protocol in memory

pub mod bridge;
pub mod child;
pub mod dispatcher;
pub mod emitter;
pub mod envelope;
pub mod events;
pub mod frame;
pub mod headless;
pub mod host;
pub mod registry;
pub mod window;

pub use bridge::{BridgeState, FrameBridge, FrameContext, FrameSender, FramedWindow, Responder};
pub use child::{ChildInbound, ChildSession};
pub use dispatcher::{
    DispatchOutcome, FrameBindings, InboundDispatcher, InboundListener, InboundTransport,
    MessageEvent,
};
pub use emitter::{EventEmitter, EventHandler};
pub use envelope::{Correlation, Envelope, EnvelopeKind, InboundEnvelope};
pub use events::{EventKind, FrameLoadEvent, WindowEvent};
pub use frame::{ChildEndpoint, FrameBackend, FrameFactory, FrameNode, FrameStyle};
pub use host::{FrameHost, HostOptions};
pub use registry::{WindowList, WindowRegistry};
pub use window::{ContentArea, Process, RenderCallback, Window};
