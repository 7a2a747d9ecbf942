//! Connection lifecycle management for a single tracked entity.
//!
//! The manager owns at most one live transport subscription at a time, keyed
//! by a `TrackedId`. It handles connect/disconnect, bounded automatic
//! reconnection, identifier-gated filtering of inbound payloads, and fan-out
//! to the listener registry.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ConnectionConfig;
use crate::error::TransportResult;
use crate::registry::{ListenerId, ListenerRegistry};
use crate::transport::{DropReason, Transport, TransportConnection, TransportEvent};
use crate::types::{PositionSample, TrackedId};

/// Connection lifecycle state, observable via `watch_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No subscription is active.
    Disconnected,
    /// An open attempt is in flight.
    Connecting,
    /// The subscription is live and forwarding samples.
    Connected,
    /// The connection dropped; a retry is scheduled. `attempt` counts the
    /// consecutive failed attempts so far and is monotonically increasing
    /// within one connection lifetime.
    ReconnectPending {
        /// Failed attempts so far
        attempt: u32,
    },
    /// The reconnect budget is exhausted; an explicit new `connect` is
    /// required to resume.
    Failed,
}

struct ManagerInner {
    transport: Arc<dyn Transport>,
    config: ConnectionConfig,
    listeners: ListenerRegistry,
    state_tx: watch::Sender<ConnectionState>,
    active_id: Mutex<Option<TrackedId>>,
}

struct RunHandle {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Manages the single live subscription to a tracked entity's position feed.
///
/// Cheap to clone; clones share the same subscription, listeners, and state.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<ManagerInner>,
    task: Arc<tokio::sync::Mutex<Option<RunHandle>>>,
}

impl ConnectionManager {
    /// Create a manager over the given transport with default configuration.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        // Default config always validates
        Self::with_config(transport, ConnectionConfig::default())
            .unwrap_or_else(|_| unreachable!("default config is valid"))
    }

    /// Create a manager with a custom reconnection policy.
    pub fn with_config(
        transport: Arc<dyn Transport>,
        config: ConnectionConfig,
    ) -> TransportResult<Self> {
        config.validate()?;
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Ok(Self {
            inner: Arc::new(ManagerInner {
                transport,
                config,
                listeners: ListenerRegistry::new(),
                state_tx,
                active_id: Mutex::new(None),
            }),
            task: Arc::new(tokio::sync::Mutex::new(None)),
        })
    }

    /// Register a position callback. Listeners survive disconnects and are
    /// only removed by `unsubscribe`.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(PositionSample) + Send + Sync + 'static,
    {
        self.inner.listeners.subscribe(listener)
    }

    /// Remove a previously registered callback.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.listeners.unsubscribe(id)
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.inner.state_tx.borrow()
    }

    /// Watch channel over connection state transitions.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state_tx.subscribe()
    }

    /// Identifier of the active subscription, if any.
    pub fn tracked_id(&self) -> Option<TrackedId> {
        self.inner.active_id.lock().clone()
    }

    /// Number of registered position listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Subscribe to the given identifier's feed.
    ///
    /// Idempotent: connecting to the identifier already connected is a
    /// no-op. In every other case, including a pending reconnect for the
    /// same identifier, the previous subscription is torn down fully and a
    /// fresh one is established with a fresh reconnect budget.
    pub async fn connect(&self, id: TrackedId) {
        let mut task = self.task.lock().await;

        let session_live = task
            .as_ref()
            .map(|h| !h.handle.is_finished())
            .unwrap_or(false);
        if session_live
            && self.state() == ConnectionState::Connected
            && self.inner.active_id.lock().as_ref() == Some(&id)
        {
            tracing::debug!(plate = %id, "already connected, ignoring connect");
            return;
        }

        if let Some(handle) = task.take() {
            Self::teardown(handle).await;
        }

        tracing::debug!(plate = %id, "establishing tracking subscription");
        *self.inner.active_id.lock() = Some(id.clone());
        let _ = self.inner.state_tx.send(ConnectionState::Connecting);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(run_session(inner, id, shutdown_rx));
        *task = Some(RunHandle {
            shutdown_tx,
            handle,
        });
    }

    /// Tear down the active subscription, if any.
    ///
    /// Clears the identifier, resets the state to `Disconnected`, and resets
    /// the reconnect budget. Registered listeners remain registered. Safe to
    /// call when already disconnected.
    pub async fn disconnect(&self) {
        let mut task = self.task.lock().await;
        if let Some(handle) = task.take() {
            tracing::debug!("tearing down tracking subscription");
            Self::teardown(handle).await;
        }
        *self.inner.active_id.lock() = None;
        let _ = self.inner.state_tx.send(ConnectionState::Disconnected);
    }

    async fn teardown(handle: RunHandle) {
        let _ = handle.shutdown_tx.send(true);
        let _ = handle.handle.await;
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("state", &self.state())
            .field("tracked_id", &self.tracked_id())
            .field("listeners", &self.inner.listeners.len())
            .finish()
    }
}

enum SessionExit {
    Shutdown,
    Dropped(DropReason),
}

/// Per-subscription event loop: open, forward, reconnect, give up.
async fn run_session(
    inner: Arc<ManagerInner>,
    id: TrackedId,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut attempt: u32 = 0;
    let mut clean_close_retry_used = false;

    loop {
        let opened = tokio::select! {
            _ = shutdown.changed() => return,
            opened = inner.transport.open(&id) => opened,
        };

        match opened {
            Ok(mut conn) => {
                attempt = 0;
                let _ = inner.state_tx.send(ConnectionState::Connected);
                tracing::debug!(plate = %id, "transport channel open");

                let exit = pump_events(&inner, &id, conn.as_mut(), &mut shutdown).await;
                match exit {
                    SessionExit::Shutdown => {
                        conn.close().await;
                        return;
                    }
                    SessionExit::Dropped(DropReason::ServerClosed)
                        if inner.config.retry_clean_close && !clean_close_retry_used =>
                    {
                        // One immediate retry per connection lifetime; a
                        // clean close is not a failure signal.
                        clean_close_retry_used = true;
                        tracing::debug!(plate = %id, "server closed channel, retrying once");
                        let _ = inner.state_tx.send(ConnectionState::Connecting);
                        continue;
                    }
                    SessionExit::Dropped(reason) => {
                        tracing::warn!(plate = %id, ?reason, "transport connection dropped");
                    }
                }
            }
            Err(err) => {
                tracing::warn!(plate = %id, %err, "failed to open transport channel");
            }
        }

        attempt += 1;
        if attempt >= inner.config.max_reconnect_attempts {
            tracing::error!(
                plate = %id,
                attempts = attempt,
                "reconnect budget exhausted, giving up"
            );
            *inner.active_id.lock() = None;
            let _ = inner.state_tx.send(ConnectionState::Failed);
            return;
        }

        let _ = inner.state_tx.send(ConnectionState::ReconnectPending { attempt });
        tokio::select! {
            _ = shutdown.changed() => return,
            _ = tokio::time::sleep(inner.config.reconnect_delay) => {}
        }
    }
}

/// Forward validated samples for the active identifier until the connection
/// drops or a shutdown is requested.
async fn pump_events(
    inner: &ManagerInner,
    id: &TrackedId,
    conn: &mut dyn TransportConnection,
    shutdown: &mut watch::Receiver<bool>,
) -> SessionExit {
    loop {
        let event = tokio::select! {
            _ = shutdown.changed() => return SessionExit::Shutdown,
            event = conn.next_event() => event,
        };

        match event {
            TransportEvent::Message { channel, payload } => {
                if channel != id.as_str() {
                    // Multiplexed connections may carry other entities'
                    // traffic; never forward it downstream.
                    tracing::trace!(plate = %id, %channel, "ignoring payload for other channel");
                    continue;
                }
                match PositionSample::from_payload(&payload) {
                    Ok(sample) => inner.listeners.notify(sample),
                    Err(err) => {
                        tracing::warn!(plate = %id, %err, "dropping malformed position payload");
                    }
                }
            }
            TransportEvent::Dropped(reason) => return SessionExit::Dropped(reason),
        }
    }
}
