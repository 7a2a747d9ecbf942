//! Tracking-session state for the mototrack pipeline.
//!
//! Sits between the connection manager and rendering consumers: stores the
//! single most recent position together with an `is_tracking` flag, and
//! publishes snapshots over a watch channel.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use track_session::TrackingSession;
//! use track_transport::{ChannelTransport, ConnectionManager, TrackedId};
//!
//! let (transport, _driver) = ChannelTransport::channel();
//! let session = TrackingSession::new(ConnectionManager::new(Arc::new(transport)));
//!
//! session.start_tracking(TrackedId::new("ABC-123")).await;
//! assert!(session.is_tracking());
//! assert!(session.current_position().is_none()); // waiting for first sample
//! ```

pub mod session;

pub use session::{SessionSnapshot, TrackingSession};
