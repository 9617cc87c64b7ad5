//! In-memory implementations of the windowing and frame collaborators.
//!
//! Everything here runs the protocol without a browser: windows that defer
//! rendering until mounted, frames whose posts land in an outbox, and a
//! loopback transport that queues frame-to-host messages until flushed.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use framelink_common::{FrameId, TransportError, WindowId};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::dispatcher::{InboundListener, InboundTransport, MessageEvent};
use crate::emitter::EventEmitter;
use crate::envelope::Envelope;
use crate::events::WindowEvent;
use crate::frame::{ChildEndpoint, FrameBackend, FrameNode, FrameStyle};
use crate::registry::WindowList;
use crate::window::{ContentArea, Process, RenderCallback, Window};

// -- Windows --

/// A window's content area: the frames appended during the last render.
#[derive(Default)]
pub struct HeadlessContent {
    frames: Mutex<Vec<Arc<FrameNode>>>,
    appended: AtomicUsize,
}

impl HeadlessContent {
    pub fn frames(&self) -> Vec<Arc<FrameNode>> {
        self.frames.lock().map(|f| f.clone()).unwrap_or_default()
    }

    /// Total appends over the window's lifetime, across render passes.
    pub fn append_count(&self) -> usize {
        self.appended.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        if let Ok(mut frames) = self.frames.lock() {
            frames.clear();
        }
    }
}

impl ContentArea for HeadlessContent {
    fn append_frame(&self, frame: &Arc<FrameNode>) {
        if let Ok(mut frames) = self.frames.lock() {
            frames.push(Arc::clone(frame));
        }
        self.appended.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct HeadlessWindow {
    wid: WindowId,
    events: EventEmitter,
    content: HeadlessContent,
    mounted: AtomicBool,
    destroyed: AtomicBool,
    pending: Mutex<Vec<RenderCallback>>,
}

impl HeadlessWindow {
    pub fn new(wid: WindowId) -> Arc<Self> {
        Arc::new(Self {
            wid,
            events: EventEmitter::new(),
            content: HeadlessContent::default(),
            mounted: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            pending: Mutex::new(Vec::new()),
        })
    }

    pub fn content(&self) -> &HeadlessContent {
        &self.content
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Create the content area and run every render queued so far.
    pub fn mount(&self) {
        if self.is_destroyed() || self.mounted.swap(true, Ordering::SeqCst) {
            return;
        }
        let queued: Vec<RenderCallback> = self
            .pending
            .lock()
            .map(|mut p| p.drain(..).collect())
            .unwrap_or_default();
        debug!(window_id = %self.wid, queued = queued.len(), "window mounted");
        for callback in queued {
            self.run_render(callback);
        }
    }

    pub fn focus(&self) {
        self.emit(&WindowEvent::Focus);
    }

    pub fn blur(&self) {
        self.emit(&WindowEvent::Blur);
    }

    /// Emit `destroy`, then drop every handler.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.emit(&WindowEvent::Destroy);
        self.events.clear();
        self.content.clear();
        if let Ok(mut pending) = self.pending.lock() {
            pending.clear();
        }
        debug!(window_id = %self.wid, "window destroyed");
    }

    fn run_render(&self, callback: RenderCallback) {
        self.content.clear();
        callback(&self.content);
    }
}

impl Window for HeadlessWindow {
    fn wid(&self) -> WindowId {
        self.wid
    }

    fn events(&self) -> &EventEmitter {
        &self.events
    }

    fn render(&self, callback: RenderCallback) {
        if self.is_destroyed() {
            trace!(window_id = %self.wid, "render on destroyed window ignored");
            return;
        }
        if self.is_mounted() {
            self.run_render(callback);
        } else if let Ok(mut pending) = self.pending.lock() {
            pending.push(callback);
        }
    }
}

impl std::fmt::Debug for HeadlessWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessWindow")
            .field("wid", &self.wid)
            .field("mounted", &self.is_mounted())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// Instantiates headless windows with sequential ids and keeps them in a
/// shared registry.
pub struct HeadlessProcess {
    registry: Arc<WindowList>,
    windows: Mutex<HashMap<WindowId, Arc<HeadlessWindow>>>,
    next_id: AtomicU32,
}

impl HeadlessProcess {
    pub fn new(registry: Arc<WindowList>) -> Self {
        Self {
            registry,
            windows: Mutex::new(HashMap::new()),
            next_id: AtomicU32::new(1),
        }
    }

    pub fn registry(&self) -> &Arc<WindowList> {
        &self.registry
    }

    pub fn spawn(&self) -> Arc<HeadlessWindow> {
        let wid = WindowId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let window = HeadlessWindow::new(wid);
        if let Err(e) = self.registry.insert(window.clone()) {
            warn!(window_id = %wid, error = %e, "window not registered");
        }
        if let Ok(mut windows) = self.windows.lock() {
            windows.insert(wid, Arc::clone(&window));
        }
        window
    }

    pub fn window(&self, wid: WindowId) -> Option<Arc<HeadlessWindow>> {
        self.windows.lock().ok()?.get(&wid).cloned()
    }

    /// Unregister and destroy a window. Returns whether it was open.
    pub fn close(&self, wid: WindowId) -> bool {
        let window = self.windows.lock().ok().and_then(|mut w| w.remove(&wid));
        self.registry.remove(wid);
        match window {
            Some(window) => {
                window.destroy();
                true
            }
            None => false,
        }
    }
}

impl Process for HeadlessProcess {
    type Options = ();

    fn create_window(&self, _options: ()) -> Arc<dyn Window> {
        self.spawn()
    }
}

// -- Frames --

/// A frame endpoint that records what the host does to it.
pub struct HeadlessEndpoint {
    id: FrameId,
    origin: String,
    outbox: Mutex<Vec<Envelope>>,
    navigations: Mutex<Vec<String>>,
    focused: AtomicUsize,
    blurred: AtomicUsize,
    disconnected: AtomicBool,
}

impl HeadlessEndpoint {
    pub fn new(id: FrameId, origin: impl Into<String>) -> Self {
        Self {
            id,
            origin: origin.into(),
            outbox: Mutex::new(Vec::new()),
            navigations: Mutex::new(Vec::new()),
            focused: AtomicUsize::new(0),
            blurred: AtomicUsize::new(0),
            disconnected: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &FrameId {
        &self.id
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Drain everything posted to the frame so far.
    pub fn take_outbox(&self) -> Vec<Envelope> {
        self.outbox
            .lock()
            .map(|mut outbox| std::mem::take(&mut *outbox))
            .unwrap_or_default()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn focus_count(&self) -> usize {
        self.focused.load(Ordering::SeqCst)
    }

    pub fn blur_count(&self) -> usize {
        self.blurred.load(Ordering::SeqCst)
    }

    /// Simulate the frame going away; later posts fail.
    pub fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }
}

impl ChildEndpoint for HeadlessEndpoint {
    fn post_message(&self, envelope: &Envelope, target_origin: &str) -> Result<(), TransportError> {
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected(self.id.clone()));
        }
        if target_origin != self.origin {
            return Err(TransportError::OriginRejected {
                target: target_origin.to_string(),
                actual: self.origin.clone(),
            });
        }
        // The frame only ever sees what survives the wire encoding.
        let wire = envelope.to_value()?;
        let delivered = Envelope::from_value(&wire).ok_or_else(|| {
            TransportError::Encode(format!("envelope for {} did not decode", self.id))
        })?;
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.push(delivered);
        }
        Ok(())
    }

    fn focus(&self) {
        self.focused.fetch_add(1, Ordering::SeqCst);
    }

    fn blur(&self) {
        self.blurred.fetch_add(1, Ordering::SeqCst);
    }

    fn navigate(&self, src: &str) {
        if let Ok(mut navigations) = self.navigations.lock() {
            navigations.push(src.to_string());
        }
    }
}

/// Hands out headless endpoints, all living at one origin.
pub struct HeadlessBackend {
    origin: String,
    endpoints: Mutex<HashMap<FrameId, Arc<HeadlessEndpoint>>>,
}

impl HeadlessBackend {
    pub fn new(origin: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            origin: origin.into(),
            endpoints: Mutex::new(HashMap::new()),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn endpoint(&self, id: &FrameId) -> Option<Arc<HeadlessEndpoint>> {
        self.endpoints.lock().ok()?.get(id).cloned()
    }

    /// Endpoints of frames whose windows are still open.
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.lock().map(|e| e.len()).unwrap_or(0)
    }
}

impl FrameBackend for HeadlessBackend {
    fn create_endpoint(&self, id: &FrameId, style: &FrameStyle) -> Arc<dyn ChildEndpoint> {
        let endpoint = Arc::new(HeadlessEndpoint::new(id.clone(), self.origin.clone()));
        if let Ok(mut endpoints) = self.endpoints.lock() {
            endpoints.insert(id.clone(), Arc::clone(&endpoint));
        }
        trace!(frame_id = %id, border = style.border, "headless endpoint created");
        endpoint
    }

    fn release(&self, id: &FrameId) {
        if let Ok(mut endpoints) = self.endpoints.lock() {
            if endpoints.remove(id).is_some() {
                trace!(frame_id = %id, "headless endpoint released");
            }
        }
    }
}

// -- Transport --

/// Frame-to-host channel that queues posts until [`flush`](Self::flush).
#[derive(Default)]
pub struct LoopbackTransport {
    listeners: Mutex<Vec<InboundListener>>,
    queue: Mutex<VecDeque<MessageEvent>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message as posted by `source` from `origin`.
    pub fn post(&self, source: &FrameId, origin: &str, data: Value) {
        self.enqueue(MessageEvent::from_frame(source.clone(), origin, data));
    }

    pub fn enqueue(&self, event: MessageEvent) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(event);
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    /// Deliver queued messages in order, including any queued while
    /// flushing. Returns how many were delivered.
    pub fn flush(&self) -> usize {
        let mut delivered = 0;
        loop {
            let next = self.queue.lock().ok().and_then(|mut q| q.pop_front());
            let Some(event) = next else {
                break;
            };
            let listeners = self.listeners.lock().map(|l| l.clone()).unwrap_or_default();
            for listener in &listeners {
                listener(&event);
            }
            delivered += 1;
        }
        delivered
    }
}

impl InboundTransport for LoopbackTransport {
    fn subscribe(&self, listener: InboundListener) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Correlation;
    use crate::events::EventKind;
    use serde_json::json;

    #[test]
    fn render_waits_for_mount() {
        let window = HeadlessWindow::new(WindowId(1));
        let ran = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&ran);
        window.render(Box::new(move |_| {
            r.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(ran.load(Ordering::SeqCst), 0);

        window.mount();
        assert_eq!(ran.load(Ordering::SeqCst), 1);

        window.mount();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn destroy_emits_once_and_drops_handlers() {
        let window = HeadlessWindow::new(WindowId(1));
        let seen = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&seen);
        window.events().on(EventKind::Destroy, move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        });

        window.destroy();
        window.destroy();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(window.events().listener_count(EventKind::Destroy), 0);
    }

    #[test]
    fn endpoint_refuses_other_origins_and_disconnects() {
        let endpoint = HeadlessEndpoint::new(FrameId::from_raw("f"), "framelink://localhost");
        let envelope = Envelope::message(json!(1), Correlation::Unsolicited);

        assert!(endpoint.post_message(&envelope, "framelink://localhost").is_ok());
        assert!(matches!(
            endpoint.post_message(&envelope, "*"),
            Err(TransportError::OriginRejected { .. })
        ));
        endpoint.disconnect();
        assert!(matches!(
            endpoint.post_message(&envelope, "framelink://localhost"),
            Err(TransportError::Disconnected(_))
        ));
        assert_eq!(endpoint.take_outbox().len(), 1);
    }

    #[test]
    fn released_endpoints_are_forgotten() {
        let backend = HeadlessBackend::new("framelink://localhost");
        let a = FrameId::from_raw("a");
        let b = FrameId::from_raw("b");
        backend.create_endpoint(&a, &FrameStyle::default());
        backend.create_endpoint(&b, &FrameStyle::default());
        assert_eq!(backend.endpoint_count(), 2);

        backend.release(&a);
        backend.release(&a);
        assert!(backend.endpoint(&a).is_none());
        assert!(backend.endpoint(&b).is_some());
        assert_eq!(backend.endpoint_count(), 1);
    }

    #[test]
    fn posted_envelopes_cross_the_wire_encoding() {
        let endpoint = HeadlessEndpoint::new(FrameId::from_raw("f"), "framelink://localhost");
        let envelope = Envelope::message(json!({"nested": [1, 2]}), Correlation::Request(5));
        endpoint.post_message(&envelope, "framelink://localhost").unwrap();
        assert_eq!(endpoint.take_outbox(), vec![envelope]);
    }

    #[test]
    fn loopback_delivers_in_order() {
        let transport = LoopbackTransport::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        transport.subscribe(Arc::new(move |event: &MessageEvent| {
            s.lock().unwrap().push(event.data.clone());
        }));

        let source = FrameId::from_raw("f");
        transport.post(&source, "framelink://localhost", json!(1));
        transport.post(&source, "framelink://localhost", json!(2));
        assert_eq!(transport.pending(), 2);
        assert_eq!(seen.lock().unwrap().len(), 0);

        assert_eq!(transport.flush(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![Some(json!(1)), Some(json!(2))]);
        assert_eq!(transport.pending(), 0);
    }

    #[test]
    fn process_registers_and_closes_windows() {
        let registry = Arc::new(WindowList::new());
        let process = HeadlessProcess::new(Arc::clone(&registry));
        let a = process.spawn();
        let b = process.create_window(());
        assert_ne!(a.wid(), b.wid());
        assert_eq!(registry.count(), 2);

        assert!(process.close(a.wid()));
        assert!(a.is_destroyed());
        assert_eq!(registry.ids(), vec![b.wid()]);
        assert!(!process.close(a.wid()));
    }
}
