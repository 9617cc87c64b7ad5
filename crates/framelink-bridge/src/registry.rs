//! Process-wide lookup of live windows by id.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use framelink_common::{BridgeError, WindowId};
use tracing::debug;

use crate::window::Window;

/// Read-only view of the live windows, as the dispatcher needs it.
pub trait WindowRegistry: Send + Sync {
    fn find(&self, wid: WindowId) -> Option<Arc<dyn Window>>;
}

/// In-memory registry mapping window ids to live windows.
///
/// At most one live window may claim an id at a time.
#[derive(Default)]
pub struct WindowList {
    windows: RwLock<HashMap<WindowId, Arc<dyn Window>>>,
}

impl WindowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live window.
    pub fn insert(&self, window: Arc<dyn Window>) -> Result<(), BridgeError> {
        let wid = window.wid();
        let mut windows = self.write();
        if windows.contains_key(&wid) {
            return Err(BridgeError::DuplicateWindow(wid));
        }
        windows.insert(wid, window);
        debug!(window_id = %wid, "window registered");
        Ok(())
    }

    /// Remove a window. Returns it if it was registered.
    pub fn remove(&self, wid: WindowId) -> Option<Arc<dyn Window>> {
        let removed = self.write().remove(&wid);
        if removed.is_some() {
            debug!(window_id = %wid, "window unregistered");
        }
        removed
    }

    /// All live window ids, sorted.
    pub fn ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self.read().keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    // A handler that panicked mid-update leaves the map itself intact, so
    // every accessor keeps using it.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<WindowId, Arc<dyn Window>>> {
        self.windows
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<WindowId, Arc<dyn Window>>> {
        self.windows
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WindowRegistry for WindowList {
    fn find(&self, wid: WindowId) -> Option<Arc<dyn Window>> {
        self.read().get(&wid).cloned()
    }
}
