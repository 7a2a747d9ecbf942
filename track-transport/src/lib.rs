//! Push-transport connection management for live position tracking.
//!
//! This crate owns the bottom of the tracking pipeline: a
//! [`ConnectionManager`] holding at most one live subscription to a tracked
//! entity's position feed, with bounded automatic reconnection and
//! registration-ordered, panic-isolated fan-out to position listeners.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use track_transport::{ChannelTransport, ConnectionManager, TrackedId};
//!
//! let (transport, driver) = ChannelTransport::channel();
//! let manager = ConnectionManager::new(Arc::new(transport));
//!
//! manager.subscribe(|sample| println!("at {sample}"));
//! manager.connect(TrackedId::new("ABC-123")).await;
//!
//! driver.publish_sample("ABC-123", 5.0689, -75.5174);
//! ```
//!
//! # Architecture
//!
//! ```text
//! Transport (trait)
//!     │ open(TrackedId) -> TransportConnection
//!     ▼
//! ConnectionManager ── run_session task
//!     │   filter by identifier, validate payload,
//!     │   reconnect with bounded budget
//!     ▼
//! ListenerRegistry ── registration-ordered fan-out
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod registry;
pub mod transport;
pub mod types;

pub use config::ConnectionConfig;
pub use error::{TransportError, TransportResult};
pub use manager::{ConnectionManager, ConnectionState};
pub use registry::{ListenerId, ListenerRegistry};
pub use transport::{
    ChannelTransport, DropReason, Transport, TransportConnection, TransportDriver, TransportEvent,
};
pub use types::{PositionSample, TrackedId};
