//! Per-window bridge between a window and the frame it embeds.
//!
//! A [`FrameBridge`] is created together with its frame. When the frame
//! finishes loading it proxies focus/blur into the frame, binds a
//! [`FrameSender`] to the frame's endpoint, starts interpreting the
//! window's routed messages, sends the handshake and announces itself with
//! `iframe:init`. Closing the window ends the conversation.

use std::sync::{Arc, Mutex, OnceLock, Weak};

use framelink_common::{FrameId, WindowId};
use tracing::{debug, trace, warn};

use crate::dispatcher::FrameBindings;
use crate::events::{EventKind, FrameLoadEvent, WindowEvent};
use crate::frame::{ChildEndpoint, FrameNode};
use crate::window::Window;

mod context;
mod framed;
mod sender;

pub use context::FrameContext;
pub use framed::FramedWindow;
pub use sender::{FrameSender, Responder};

/// Lifecycle of one bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// Frame created, nothing navigated yet.
    Created,
    /// Navigation requested, waiting for the frame to load.
    Loading,
    /// Handlers installed and handshake sent.
    Ready,
    /// `iframe:init` emitted; messages are flowing.
    Active,
    /// The window was destroyed.
    Closed,
}

pub struct FrameBridge {
    window_id: WindowId,
    window: Weak<dyn Window>,
    target_origin: Arc<str>,
    bindings: Arc<FrameBindings>,
    state: Mutex<BridgeState>,
    frame_id: OnceLock<FrameId>,
    sender: OnceLock<FrameSender>,
}

impl FrameBridge {
    pub(crate) fn new(
        window: &Arc<dyn Window>,
        target_origin: Arc<str>,
        bindings: Arc<FrameBindings>,
    ) -> Arc<Self> {
        let bridge = Arc::new(Self {
            window_id: window.wid(),
            window: Arc::downgrade(window),
            target_origin,
            bindings,
            state: Mutex::new(BridgeState::Created),
            frame_id: OnceLock::new(),
            sender: OnceLock::new(),
        });

        // Window handlers own the bridge; the bridge only holds the window
        // weakly, so there is no cycle.
        let owned = Arc::clone(&bridge);
        window.on(EventKind::Destroy, Arc::new(move |_| owned.close()));

        bridge
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn state(&self) -> BridgeState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(BridgeState::Closed)
    }

    /// The sender bound to the frame, once the frame has loaded.
    pub fn sender(&self) -> Option<FrameSender> {
        self.sender.get().cloned()
    }

    pub fn frame_id(&self) -> Option<&FrameId> {
        self.frame_id.get()
    }

    pub(crate) fn set_frame_id(&self, id: FrameId) {
        let _ = self.frame_id.set(id);
    }

    pub(crate) fn begin_loading(&self) {
        if self.state() == BridgeState::Created {
            self.transition(BridgeState::Loading);
        }
    }

    /// Wire the window to its freshly loaded frame.
    pub(crate) fn on_frame_ready(
        self: &Arc<Self>,
        event: FrameLoadEvent,
        frame: Arc<FrameNode>,
        endpoint: Arc<dyn ChildEndpoint>,
    ) {
        if self.state() == BridgeState::Closed {
            debug!(window_id = %self.window_id, "frame loaded after window closed");
            return;
        }
        let Some(window) = self.window.upgrade() else {
            debug!(window_id = %self.window_id, "frame loaded after window dropped");
            return;
        };
        debug!(window_id = %self.window_id, frame_id = %frame.id(), url = %event.url, "wiring bridge");

        let (bridge, focus_target) = (Arc::clone(self), Arc::clone(&endpoint));
        window.on(
            EventKind::Focus,
            Arc::new(move |_| {
                if bridge.state() != BridgeState::Closed {
                    focus_target.focus();
                }
            }),
        );
        let (bridge, blur_target) = (Arc::clone(self), Arc::clone(&endpoint));
        window.on(
            EventKind::Blur,
            Arc::new(move |_| {
                if bridge.state() != BridgeState::Closed {
                    blur_target.blur();
                }
            }),
        );

        let sender = FrameSender::new(
            frame.id().clone(),
            endpoint,
            Arc::clone(&self.target_origin),
        );
        let _ = self.sender.set(sender.clone());

        self.install_message_loop(&window, Arc::clone(&frame), sender.clone());

        self.bindings.bind(frame.id().clone(), self.window_id);
        if let Err(e) = sender.handshake(self.window_id) {
            warn!(window_id = %self.window_id, frame_id = %frame.id(), error = %e, "handshake failed");
        }
        self.transition(BridgeState::Ready);

        window.emit(&WindowEvent::FrameInit(FrameContext {
            window: Arc::clone(&window),
            frame,
            sender,
            responder: None,
        }));
        self.transition(BridgeState::Active);
    }

    fn install_message_loop(
        self: &Arc<Self>,
        window: &Arc<dyn Window>,
        frame: Arc<FrameNode>,
        sender: FrameSender,
    ) {
        let bridge = Arc::clone(self);
        let owner = Arc::downgrade(window);
        window.on(
            EventKind::Message,
            Arc::new(move |event| {
                let WindowEvent::Message { reference, payload } = event else {
                    return;
                };
                if bridge.state() == BridgeState::Closed {
                    return;
                }
                let Some(window) = owner.upgrade() else {
                    return;
                };

                trace!(window_id = %bridge.window_id, reference = %reference, "frame message");
                let responder = reference
                    .request_id()
                    .map(|id| Responder::new(sender.clone(), id));
                let context = FrameContext {
                    window: Arc::clone(&window),
                    frame: Arc::clone(&frame),
                    sender: sender.clone(),
                    responder,
                };
                window.emit(&WindowEvent::FrameMessage {
                    context,
                    payload: payload.clone(),
                });
            }),
        );
    }

    pub(crate) fn close(&self) {
        if self.state() == BridgeState::Closed {
            return;
        }
        self.transition(BridgeState::Closed);
        if let Some(id) = self.frame_id.get() {
            self.bindings.unbind(id);
        }
    }

    fn transition(&self, to: BridgeState) {
        if let Ok(mut state) = self.state.lock() {
            if *state == BridgeState::Closed {
                return;
            }
            let from = *state;
            debug!(window_id = %self.window_id, ?from, ?to, "bridge state");
            *state = to;
        }
    }
}

impl std::fmt::Debug for FrameBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBridge")
            .field("window_id", &self.window_id)
            .field("state", &self.state())
            .field("frame_id", &self.frame_id.get())
            .finish()
    }
}
