use std::sync::Arc;

use framelink_common::FrameId;
use tracing::debug;

use crate::events::FrameLoadEvent;

use super::{ChildEndpoint, FrameBackend, FrameNode, FrameStyle};

/// Creates unattached frames through a platform backend.
pub struct FrameFactory {
    backend: Arc<dyn FrameBackend>,
    style: FrameStyle,
}

impl FrameFactory {
    pub fn new(backend: Arc<dyn FrameBackend>, style: FrameStyle) -> Self {
        Self { backend, style }
    }

    pub fn style(&self) -> &FrameStyle {
        &self.style
    }

    /// Create a frame whose `on_ready` fires once, after its first load.
    ///
    /// The frame is not attached anywhere; the caller appends it to a
    /// content area.
    pub fn create<F>(&self, on_ready: F) -> Arc<FrameNode>
    where
        F: FnOnce(FrameLoadEvent, Arc<FrameNode>, Arc<dyn ChildEndpoint>) + Send + 'static,
    {
        let id = FrameId::new();
        let endpoint = self.backend.create_endpoint(&id, &self.style);
        debug!(frame_id = %id, width = %self.style.width, height = %self.style.height, "frame created");
        FrameNode::new(id, self.style.clone(), endpoint, Box::new(on_ready))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessBackend;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn factory() -> (FrameFactory, Arc<HeadlessBackend>) {
        let backend = HeadlessBackend::new("framelink://localhost");
        let factory = FrameFactory::new(backend.clone(), FrameStyle::default());
        (factory, backend)
    }

    #[test]
    fn created_frame_fills_container_without_border() {
        let (factory, _) = factory();
        let frame = factory.create(|_, _, _| {});
        assert_eq!(frame.style().width, "100%");
        assert_eq!(frame.style().height, "100%");
        assert_eq!(frame.style().border, 0);
        assert!(frame.src().is_none());
    }

    #[test]
    fn ready_fires_exactly_once() {
        let (factory, _) = factory();
        let fired = Arc::new(AtomicUsize::new(0));
        let f = Arc::clone(&fired);
        let frame = factory.create(move |event, _, _| {
            assert_eq!(event.url, "app://first");
            f.fetch_add(1, Ordering::SeqCst);
        });

        assert!(frame.is_pending());
        assert!(frame.notify_loaded(FrameLoadEvent::new("app://first")));
        assert!(!frame.notify_loaded(FrameLoadEvent::new("app://second")));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!frame.is_pending());
    }

    #[test]
    fn ready_receives_node_and_its_endpoint() {
        let (factory, _) = factory();
        let seen = Arc::new(std::sync::Mutex::new(None));
        let s = Arc::clone(&seen);
        let frame = factory.create(move |_, node, endpoint| {
            *s.lock().unwrap() = Some((node.id().clone(), Arc::as_ptr(&endpoint) as *const () as usize));
        });
        frame.notify_loaded(FrameLoadEvent::new("app://x"));

        let (id, endpoint_ptr) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(&id, frame.id());
        assert_eq!(endpoint_ptr, Arc::as_ptr(frame.endpoint()) as *const () as usize);
    }

    #[test]
    fn set_src_navigates_endpoint() {
        let (factory, backend) = factory();
        let frame = factory.create(|_, _, _| {});
        frame.set_src("app://one");
        frame.set_src("app://two");

        assert_eq!(frame.src().as_deref(), Some("app://two"));
        let endpoint = backend.endpoint(frame.id()).unwrap();
        assert_eq!(endpoint.navigations(), vec!["app://one", "app://two"]);
    }
}
