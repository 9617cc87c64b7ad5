//! Process-wide owner of the frame protocol.
//!
//! One [`FrameHost`] per application: it owns the inbound dispatcher,
//! installs it on the shared transport exactly once, and turns windows into
//! [`FramedWindow`]s with their own frame and bridge.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use framelink_common::{BridgeError, RoutingPolicy};
use tracing::{debug, info};

use crate::bridge::{FrameBridge, FramedWindow};
use crate::dispatcher::{FrameBindings, InboundDispatcher, InboundTransport, MessageEvent};
use crate::events::{EventKind, FrameLoadEvent};
use crate::frame::{ChildEndpoint, FrameBackend, FrameFactory, FrameNode, FrameStyle};
use crate::registry::WindowRegistry;
use crate::window::{Process, Window};


/// Settings a host is built with.
#[derive(Debug, Clone)]
pub struct HostOptions {
    /// The only origin frames may be addressed at.
    pub target_origin: String,
    pub routing: RoutingPolicy,
    pub frame_style: FrameStyle,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            target_origin: "framelink://localhost".to_string(),
            routing: RoutingPolicy::default(),
            frame_style: FrameStyle::default(),
        }
    }
}

pub struct FrameHost {
    options: HostOptions,
    target_origin: Arc<str>,
    dispatcher: Arc<InboundDispatcher>,
    factory: FrameFactory,
    backend: Arc<dyn FrameBackend>,
    installed: AtomicBool,
}

impl FrameHost {
    pub fn new(
        registry: Arc<dyn WindowRegistry>,
        backend: Arc<dyn FrameBackend>,
        options: HostOptions,
    ) -> Self {
        let dispatcher = Arc::new(InboundDispatcher::new(
            registry,
            Arc::new(FrameBindings::new()),
            options.routing,
        ));
        Self {
            target_origin: Arc::from(options.target_origin.as_str()),
            factory: FrameFactory::new(Arc::clone(&backend), options.frame_style.clone()),
            backend,
            dispatcher,
            options,
            installed: AtomicBool::new(false),
        }
    }

    /// Subscribe the dispatcher to the transport. Only the first call
    /// subscribes; later calls fail with [`BridgeError::AlreadyInitialized`].
    pub fn init(&self, transport: &dyn InboundTransport) -> Result<(), BridgeError> {
        if self.installed.swap(true, Ordering::SeqCst) {
            return Err(BridgeError::AlreadyInitialized);
        }
        let dispatcher = Arc::clone(&self.dispatcher);
        transport.subscribe(Arc::new(move |event: &MessageEvent| {
            dispatcher.dispatch(event);
        }));
        info!(
            target_origin = %self.target_origin,
            routing = ?self.options.routing,
            "inbound dispatcher installed"
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    pub fn dispatcher(&self) -> &Arc<InboundDispatcher> {
        &self.dispatcher
    }

    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    /// Create an unbridged frame with the host's style.
    pub fn create_frame<F>(&self, on_ready: F) -> Arc<FrameNode>
    where
        F: FnOnce(FrameLoadEvent, Arc<FrameNode>, Arc<dyn ChildEndpoint>) + Send + 'static,
    {
        self.factory.create(on_ready)
    }

    /// Instantiate a window through `process` and bridge it.
    pub fn create_window<P: Process>(&self, process: &P, options: P::Options) -> FramedWindow {
        let window = process.create_window(options);
        self.bridge_window(window)
    }

    /// Give an existing window a frame and a bridge to it.
    pub fn bridge_window(&self, window: Arc<dyn Window>) -> FramedWindow {
        let bridge = FrameBridge::new(
            &window,
            Arc::clone(&self.target_origin),
            Arc::clone(self.dispatcher.bindings()),
        );
        let ready = Arc::clone(&bridge);
        let frame = self
            .factory
            .create(move |event, frame, endpoint| ready.on_frame_ready(event, frame, endpoint));
        bridge.set_frame_id(frame.id().clone());

        let backend = Arc::clone(&self.backend);
        let frame_id = frame.id().clone();
        window.on(EventKind::Destroy, Arc::new(move |_| backend.release(&frame_id)));
        debug!(window_id = %window.wid(), frame_id = %frame.id(), "window bridged");
        FramedWindow::new(window, frame, bridge)
    }
}

impl std::fmt::Debug for FrameHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHost")
            .field("options", &self.options)
            .field("installed", &self.is_initialized())
            .finish()
    }
}
