//! Listener registration and position fan-out.
//!
//! The registry is an explicit subject: `subscribe` hands back a
//! `ListenerId`, dispatch runs in registration order, and a panicking
//! listener is isolated so the remaining listeners still receive the sample.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::PositionSample;

/// Handle identifying a registered position listener.
///
/// Allocated monotonically, so iteration over ids is registration order.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ListenerId(u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

type PositionListener = Arc<dyn Fn(PositionSample) + Send + Sync>;

/// Ordered set of position callbacks with isolated dispatch.
pub struct ListenerRegistry {
    listeners: Arc<Mutex<BTreeMap<ListenerId, PositionListener>>>,
    next_id: Arc<AtomicU64>,
}

impl ListenerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Register a position callback, returning its unsubscribe handle.
    ///
    /// Safe to call in any connection state, including before the first
    /// connect.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(PositionSample) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().insert(id, Arc::new(listener));
        tracing::debug!(%id, "position listener registered");
        id
    }

    /// Remove a previously registered callback.
    ///
    /// Returns whether the listener was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let removed = self.listeners.lock().remove(&id).is_some();
        if removed {
            tracing::debug!(%id, "position listener removed");
        }
        removed
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Check if no listeners are registered
    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }

    /// Deliver a sample to every registered listener in registration order.
    ///
    /// A panic inside one listener is caught and logged; it never prevents
    /// later listeners from receiving the same sample.
    pub fn notify(&self, sample: PositionSample) {
        // Snapshot outside the lock so listeners may subscribe/unsubscribe
        // from within their own callbacks.
        let snapshot: Vec<(ListenerId, PositionListener)> = self
            .listeners
            .lock()
            .iter()
            .map(|(id, l)| (*id, Arc::clone(l)))
            .collect();

        for (id, listener) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(sample))).is_err() {
                tracing::error!(%id, %sample, "position listener panicked; continuing dispatch");
            }
        }
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ListenerRegistry {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listener_count", &self.len())
            .finish()
    }
}
