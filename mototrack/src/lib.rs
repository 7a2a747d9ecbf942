//! Live vehicle position tracking.
//!
//! This crate bundles the three layers of the tracking pipeline behind one
//! [`Tracker`] type:
//!
//! - [`track_transport`]: a push transport abstraction plus a
//!   [`ConnectionManager`] that owns the per-vehicle subscription and its
//!   reconnection policy.
//! - [`track_session`]: a [`TrackingSession`] holding the observable
//!   `is_tracking` / `current_position` state.
//! - [`track_follow`]: a throttled [`PositionFollower`] that drives a
//!   [`CameraSurface`] from accepted position updates.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mototrack::{ChannelTransport, RecordingCamera, Tracker};
//!
//! # async fn demo() -> mototrack::TrackerResult<()> {
//! let (transport, driver) = ChannelTransport::channel();
//! let tracker = Tracker::new(Arc::new(transport), RecordingCamera::new())?;
//!
//! tracker.start("ABC-123").await;
//! driver.publish_sample("ABC-123", 5.0689, -75.5174);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod logging;
pub mod tracker;

pub use error::{TrackerError, TrackerResult};
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use tracker::{Tracker, TrackerConfig};

// Re-export the subsystem surface so applications can depend on this crate
// alone.
pub use track_follow::{
    haversine_distance_m, CameraMotion, CameraSurface, FollowConfig, FollowError, FollowGate,
    FollowPhase, GateDecision, PositionFollower, RecordingCamera,
};
pub use track_session::{SessionSnapshot, TrackingSession};
pub use track_transport::{
    ChannelTransport, ConnectionConfig, ConnectionManager, ConnectionState, DropReason,
    ListenerId, PositionSample, TrackedId, Transport, TransportConnection, TransportDriver,
    TransportError, TransportEvent, TransportResult,
};
