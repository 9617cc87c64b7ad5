use std::sync::Arc;

use framelink_common::{TransportError, WindowId};
use serde_json::Value;

use crate::frame::FrameNode;
use crate::window::Window;

use super::{FrameSender, Responder};

/// What `iframe:init` and `iframe:message` handlers get to work with.
#[derive(Clone)]
pub struct FrameContext {
    pub window: Arc<dyn Window>,
    pub frame: Arc<FrameNode>,
    pub sender: FrameSender,
    /// Present only for messages that expect a reply.
    pub responder: Option<Responder>,
}

impl FrameContext {
    pub fn window_id(&self) -> WindowId {
        self.window.wid()
    }

    pub fn can_respond(&self) -> bool {
        self.responder.is_some()
    }

    /// Reply to the message this context was built for. `None` if it was
    /// not a request.
    pub fn respond(&self, response: Value) -> Option<Result<(), TransportError>> {
        self.responder
            .as_ref()
            .map(|responder| responder.respond(response))
    }
}

impl std::fmt::Debug for FrameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameContext")
            .field("window_id", &self.window.wid())
            .field("frame", &self.frame.id())
            .field("responder", &self.responder.as_ref().map(Responder::reference))
            .finish()
    }
}
