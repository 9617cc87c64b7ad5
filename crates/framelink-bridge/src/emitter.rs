//! Per-window event emitter (`on` / `emit`).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::events::{EventKind, WindowEvent};

pub type EventHandler = Arc<dyn Fn(&WindowEvent) + Send + Sync>;

/// Handlers keyed by event kind, called in registration order.
///
/// The handler table is not locked while handlers run, so a handler may
/// emit on, or subscribe to, the same emitter.
#[derive(Default)]
pub struct EventEmitter {
    handlers: Mutex<HashMap<EventKind, Vec<EventHandler>>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a closure to one event kind.
    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&WindowEvent) + Send + Sync + 'static,
    {
        self.add(kind, Arc::new(handler));
    }

    /// Subscribe an already shared handler.
    pub fn add(&self, kind: EventKind, handler: EventHandler) {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.entry(kind).or_default().push(handler);
        }
    }

    /// Call every handler subscribed to the event's kind. Returns how many
    /// ran.
    pub fn emit(&self, event: &WindowEvent) -> usize {
        let snapshot = match self.handlers.lock() {
            Ok(handlers) => handlers.get(&event.kind()).cloned().unwrap_or_default(),
            Err(_) => return 0,
        };

        for handler in &snapshot {
            handler(event);
        }
        snapshot.len()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.handlers
            .lock()
            .map(|handlers| handlers.get(&kind).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Drop every handler.
    pub fn clear(&self) {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.clear();
        }
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds = self
            .handlers
            .lock()
            .map(|handlers| handlers.len())
            .unwrap_or(0);
        f.debug_struct("EventEmitter").field("kinds", &kinds).finish()
    }
}
