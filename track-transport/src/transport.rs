//! Transport seam for the connection manager.
//!
//! The push transport itself is an external collaborator (in production a
//! websocket or Socket.IO-style channel); the manager only needs the traits
//! defined here. `ChannelTransport` is the crate's in-process reference
//! implementation, driven from a paired `TransportDriver` handle.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::{TransportError, TransportResult};
use crate::types::TrackedId;

/// Why a live connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The server closed the channel deliberately.
    ServerClosed,
    /// The connection was lost unexpectedly.
    ConnectionLost,
}

/// An inbound event on a live connection.
///
/// The connection may be a shared multiplexed channel; every message carries
/// the name of the channel it was published on, and the manager filters on
/// the active identifier at the edge.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A payload published on a named channel.
    Message {
        /// Channel the payload was published on
        channel: String,
        /// Raw payload, validated downstream
        payload: serde_json::Value,
    },
    /// The connection ended.
    Dropped(DropReason),
}

/// A factory for live connections to a tracked entity's feed.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Open a connection subscribed to the given identifier's channel.
    async fn open(&self, channel: &TrackedId) -> TransportResult<Box<dyn TransportConnection>>;
}

/// A single live connection to the push transport.
#[async_trait]
pub trait TransportConnection: Send {
    /// Wait for the next inbound event.
    ///
    /// Resolves to `TransportEvent::Dropped` exactly once at the end of the
    /// connection's life; callers should not poll again after that.
    async fn next_event(&mut self) -> TransportEvent;

    /// Caller-initiated teardown.
    async fn close(self: Box<Self>);
}

// ============================================================================
// ChannelTransport - in-process reference implementation
// ============================================================================

struct DriverState {
    /// Sender side of the currently live connection, if any
    live: Mutex<Option<mpsc::UnboundedSender<TransportEvent>>>,
    /// Channels passed to `open`, in order
    opened_channels: Mutex<Vec<String>>,
    /// Number of upcoming `open` calls that should fail
    fail_opens: AtomicU32,
    open_count: AtomicU32,
    close_count: AtomicU32,
}

/// In-process transport whose traffic is scripted through a `TransportDriver`.
///
/// Useful for demos and for tests that need to publish samples, inject
/// drops, or fail open attempts without a network.
#[derive(Clone)]
pub struct ChannelTransport {
    state: Arc<DriverState>,
}

impl ChannelTransport {
    /// Create a transport together with its driving handle.
    pub fn channel() -> (Self, TransportDriver) {
        let state = Arc::new(DriverState {
            live: Mutex::new(None),
            opened_channels: Mutex::new(Vec::new()),
            fail_opens: AtomicU32::new(0),
            open_count: AtomicU32::new(0),
            close_count: AtomicU32::new(0),
        });
        (
            Self {
                state: Arc::clone(&state),
            },
            TransportDriver { state },
        )
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn open(&self, channel: &TrackedId) -> TransportResult<Box<dyn TransportConnection>> {
        self.state.open_count.fetch_add(1, Ordering::Relaxed);
        self.state
            .opened_channels
            .lock()
            .push(channel.as_str().to_string());

        let remaining = self.state.fail_opens.load(Ordering::Relaxed);
        if remaining > 0 {
            self.state.fail_opens.store(remaining - 1, Ordering::Relaxed);
            return Err(TransportError::ConnectFailed {
                channel: channel.as_str().to_string(),
                reason: "scripted open failure".to_string(),
            });
        }

        let (tx, rx) = mpsc::unbounded_channel();
        *self.state.live.lock() = Some(tx);
        Ok(Box::new(ChannelConnection {
            rx,
            state: Arc::clone(&self.state),
        }))
    }
}

struct ChannelConnection {
    rx: mpsc::UnboundedReceiver<TransportEvent>,
    state: Arc<DriverState>,
}

#[async_trait]
impl TransportConnection for ChannelConnection {
    async fn next_event(&mut self) -> TransportEvent {
        match self.rx.recv().await {
            Some(event) => event,
            // Driver hung up without an explicit drop event.
            None => TransportEvent::Dropped(DropReason::ConnectionLost),
        }
    }

    async fn close(self: Box<Self>) {
        self.state.close_count.fetch_add(1, Ordering::Relaxed);
        *self.state.live.lock() = None;
    }
}

/// Scripting handle for a `ChannelTransport`.
pub struct TransportDriver {
    state: Arc<DriverState>,
}

impl TransportDriver {
    /// Publish a raw payload on a named channel of the live connection.
    ///
    /// Returns whether a connection was live to receive it.
    pub fn publish(&self, channel: &str, payload: serde_json::Value) -> bool {
        let live = self.state.live.lock();
        match live.as_ref() {
            Some(tx) => tx
                .send(TransportEvent::Message {
                    channel: channel.to_string(),
                    payload,
                })
                .is_ok(),
            None => false,
        }
    }

    /// Publish a well-formed position payload on a named channel.
    pub fn publish_sample(&self, channel: &str, lat: f64, lng: f64) -> bool {
        self.publish(channel, serde_json::json!({ "lat": lat, "lng": lng }))
    }

    /// Terminate the live connection with the given reason.
    pub fn drop_connection(&self, reason: DropReason) -> bool {
        let mut live = self.state.live.lock();
        match live.take() {
            Some(tx) => tx.send(TransportEvent::Dropped(reason)).is_ok(),
            None => false,
        }
    }

    /// Make the next `n` open attempts fail.
    pub fn fail_next_opens(&self, n: u32) {
        self.state.fail_opens.store(n, Ordering::Relaxed);
    }

    /// Whether a connection is currently live.
    pub fn is_live(&self) -> bool {
        self.state.live.lock().is_some()
    }

    /// Total number of `open` calls observed (including failed ones).
    pub fn open_count(&self) -> u32 {
        self.state.open_count.load(Ordering::Relaxed)
    }

    /// Total number of caller-initiated closes observed.
    pub fn close_count(&self) -> u32 {
        self.state.close_count.load(Ordering::Relaxed)
    }

    /// Channels passed to `open`, in call order.
    pub fn opened_channels(&self) -> Vec<String> {
        self.state.opened_channels.lock().clone()
    }
}
