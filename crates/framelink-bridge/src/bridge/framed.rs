use std::sync::Arc;

use framelink_common::WindowId;
use tracing::debug;

use crate::frame::FrameNode;
use crate::window::Window;

use super::{BridgeState, FrameBridge, FrameSender};

/// A window together with its embedded frame and bridge.
#[derive(Clone)]
pub struct FramedWindow {
    window: Arc<dyn Window>,
    frame: Arc<FrameNode>,
    bridge: Arc<FrameBridge>,
}

impl FramedWindow {
    pub(crate) fn new(window: Arc<dyn Window>, frame: Arc<FrameNode>, bridge: Arc<FrameBridge>) -> Self {
        Self {
            window,
            frame,
            bridge,
        }
    }

    pub fn window(&self) -> &Arc<dyn Window> {
        &self.window
    }

    pub fn wid(&self) -> WindowId {
        self.window.wid()
    }

    pub fn frame(&self) -> &Arc<FrameNode> {
        &self.frame
    }

    pub fn bridge(&self) -> &Arc<FrameBridge> {
        &self.bridge
    }

    pub fn state(&self) -> BridgeState {
        self.bridge.state()
    }

    pub fn sender(&self) -> Option<FrameSender> {
        self.bridge.sender()
    }

    /// Load `src` into the frame once the window's content area exists.
    ///
    /// Each call queues one render pass that navigates the frame and
    /// appends it to the content area; the last call wins.
    pub fn open(&self, src: impl Into<String>) {
        let src = src.into();
        let wid = self.wid();
        self.bridge.begin_loading();
        debug!(window_id = %wid, src = %src, "open requested");

        let frame = Arc::clone(&self.frame);
        self.window.render(Box::new(move |content| {
            frame.set_src(&src);
            content.append_frame(&frame);
            debug!(window_id = %wid, frame_id = %frame.id(), src = %src, "frame attached");
        }));
    }
}

impl std::fmt::Debug for FramedWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramedWindow")
            .field("wid", &self.wid())
            .field("frame", &self.frame.id())
            .field("state", &self.state())
            .finish()
    }
}
