//! Contracts the windowing subsystem fulfils for the bridge.

use std::sync::Arc;

use framelink_common::WindowId;

use crate::emitter::{EventEmitter, EventHandler};
use crate::events::{EventKind, WindowEvent};
use crate::frame::FrameNode;

/// Called with the window's content area once it exists.
pub type RenderCallback = Box<dyn FnOnce(&dyn ContentArea) + Send>;

/// The part of a rendered window that frames are appended to.
pub trait ContentArea {
    fn append_frame(&self, frame: &Arc<FrameNode>);
}

/// A live window owned by the windowing subsystem.
pub trait Window: Send + Sync {
    fn wid(&self) -> WindowId;

    fn events(&self) -> &EventEmitter;

    /// Run `callback` once the content area exists. The render pass may
    /// clear previously appended content.
    fn render(&self, callback: RenderCallback);

    fn on(&self, kind: EventKind, handler: EventHandler) {
        self.events().add(kind, handler);
    }

    fn emit(&self, event: &WindowEvent) -> usize {
        self.events().emit(event)
    }
}

/// An application process that instantiates windows.
pub trait Process {
    type Options;

    fn create_window(&self, options: Self::Options) -> Arc<dyn Window>;
}
