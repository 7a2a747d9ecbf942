//! Process-wide tracking session state.
//!
//! Bridges connection-manager events into a form consumable by rendering
//! code: the latest known position plus an `is_tracking` flag, published as
//! a snapshot over a watch channel.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use track_transport::{ConnectionManager, ConnectionState, ListenerId, PositionSample, TrackedId};

/// Point-in-time view of the tracking session.
///
/// Invariant: `is_tracking == false` implies `position == None`; both fields
/// are always cleared together.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionSnapshot {
    /// Whether a tracking session is active
    pub is_tracking: bool,
    /// Latest accepted position, `None` until the first sample arrives
    pub position: Option<PositionSample>,
}

struct SessionInner {
    manager: ConnectionManager,
    state: RwLock<SessionSnapshot>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    /// The session's own position listener, registered while tracking
    listener: Mutex<Option<ListenerId>>,
}

/// Shared tracking-session state over an injected `ConnectionManager`.
///
/// Explicitly constructed and cheap to clone; clones share the same session.
/// There is no module-level singleton, so independent sessions in tests (or
/// a future multi-entity view) cannot leak into each other.
#[derive(Clone)]
pub struct TrackingSession {
    inner: Arc<SessionInner>,
}

impl TrackingSession {
    /// Create a session around the given connection manager.
    pub fn new(manager: ConnectionManager) -> Self {
        let (snapshot_tx, _) = watch::channel(SessionSnapshot::default());
        Self {
            inner: Arc::new(SessionInner {
                manager,
                state: RwLock::new(SessionSnapshot::default()),
                snapshot_tx,
                listener: Mutex::new(None),
            }),
        }
    }

    /// Begin tracking the given identifier.
    ///
    /// Connects the manager, registers the session's position listener, and
    /// raises `is_tracking`. The session always begins with no position,
    /// regardless of any earlier transport activity; the UI should show a
    /// "waiting for position" state until the first sample lands.
    pub async fn start_tracking(&self, id: TrackedId) {
        tracing::debug!(plate = %id, "starting tracking session");
        // Detach the position listener for the duration of the switch: a
        // subscription for a previous identifier may still flush a queued
        // sample while being torn down, and nothing it delivers may reach
        // the new session's state.
        if let Some(stale) = self.inner.listener.lock().take() {
            self.inner.manager.unsubscribe(stale);
        }
        self.publish(SessionSnapshot {
            is_tracking: true,
            position: None,
        });
        self.inner.manager.connect(id).await;
        self.ensure_listener();
    }

    /// End the tracking session.
    ///
    /// Disconnects the manager, removes the session's listener, and clears
    /// `is_tracking` and the position together.
    pub async fn stop_tracking(&self) {
        tracing::debug!("stopping tracking session");
        self.inner.manager.disconnect().await;
        if let Some(id) = self.inner.listener.lock().take() {
            self.inner.manager.unsubscribe(id);
        }
        self.publish(SessionSnapshot::default());
    }

    /// Latest known position, `None` while waiting for the first sample or
    /// when not tracking.
    pub fn current_position(&self) -> Option<PositionSample> {
        self.inner.state.read().position
    }

    /// Whether a tracking session is active.
    pub fn is_tracking(&self) -> bool {
        self.inner.state.read().is_tracking
    }

    /// Current snapshot of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        *self.inner.state.read()
    }

    /// Watch channel over session snapshots for downstream consumers.
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Connection state of the underlying manager.
    ///
    /// Lets a UI distinguish "waiting for position" (tracking, no sample
    /// yet) from "reconnecting" and from a terminal `Failed`.
    pub fn connection_state(&self) -> ConnectionState {
        self.inner.manager.state()
    }

    /// Watch channel over connection state transitions.
    pub fn watch_connection(&self) -> watch::Receiver<ConnectionState> {
        self.inner.manager.watch_state()
    }

    fn publish(&self, snapshot: SessionSnapshot) {
        *self.inner.state.write() = snapshot;
        let _ = self.inner.snapshot_tx.send(snapshot);
    }

    /// Register the session's position listener if not already present.
    ///
    /// Exactly one listener exists per session however many times tracking
    /// is restarted.
    fn ensure_listener(&self) {
        let mut guard = self.inner.listener.lock();
        if guard.is_some() {
            return;
        }
        let weak: Weak<SessionInner> = Arc::downgrade(&self.inner);
        let id = self.inner.manager.subscribe(move |sample| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let snapshot = {
                let mut state = inner.state.write();
                if !state.is_tracking {
                    // Stale delivery racing a stop; never resurrect state.
                    return;
                }
                state.position = Some(sample);
                *state
            };
            let _ = inner.snapshot_tx.send(snapshot);
        });
        *guard = Some(id);
    }
}

impl std::fmt::Debug for TrackingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("TrackingSession")
            .field("is_tracking", &snapshot.is_tracking)
            .field("position", &snapshot.position)
            .finish()
    }
}
