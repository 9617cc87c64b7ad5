use std::sync::{Arc, Mutex};

use framelink_common::FrameId;
use tracing::{debug, trace};

use crate::events::FrameLoadEvent;

use super::{ChildEndpoint, FrameStyle};

/// Fired once, when the frame finishes its first load.
pub type ReadyCallback =
    Box<dyn FnOnce(FrameLoadEvent, Arc<FrameNode>, Arc<dyn ChildEndpoint>) + Send>;

/// An embedded frame: its style, navigation target and message endpoint.
pub struct FrameNode {
    id: FrameId,
    style: FrameStyle,
    endpoint: Arc<dyn ChildEndpoint>,
    src: Mutex<Option<String>>,
    on_ready: Mutex<Option<ReadyCallback>>,
}

impl FrameNode {
    pub(crate) fn new(
        id: FrameId,
        style: FrameStyle,
        endpoint: Arc<dyn ChildEndpoint>,
        on_ready: ReadyCallback,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            style,
            endpoint,
            src: Mutex::new(None),
            on_ready: Mutex::new(Some(on_ready)),
        })
    }

    pub fn id(&self) -> &FrameId {
        &self.id
    }

    pub fn style(&self) -> &FrameStyle {
        &self.style
    }

    pub fn endpoint(&self) -> &Arc<dyn ChildEndpoint> {
        &self.endpoint
    }

    /// Current navigation target, if one was set.
    pub fn src(&self) -> Option<String> {
        self.src.lock().ok().and_then(|src| src.clone())
    }

    /// Set the navigation target and navigate the frame to it.
    pub fn set_src(&self, src: &str) {
        if let Ok(mut current) = self.src.lock() {
            *current = Some(src.to_string());
        }
        self.endpoint.navigate(src);
    }

    /// Report that the frame finished loading.
    ///
    /// The ready callback runs on the first call only; returns whether it
    /// ran.
    pub fn notify_loaded(self: &Arc<Self>, event: FrameLoadEvent) -> bool {
        let callback = self.on_ready.lock().ok().and_then(|mut slot| slot.take());
        match callback {
            Some(callback) => {
                debug!(frame_id = %self.id, url = %event.url, "frame ready");
                callback(event, Arc::clone(self), Arc::clone(&self.endpoint));
                true
            }
            None => {
                trace!(frame_id = %self.id, url = %event.url, "frame reloaded");
                false
            }
        }
    }

    /// Whether the load hook has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.on_ready.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

impl std::fmt::Debug for FrameNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameNode")
            .field("id", &self.id)
            .field("style", &self.style)
            .field("src", &self.src())
            .finish()
    }
}
