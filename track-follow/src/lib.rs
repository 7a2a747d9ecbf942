//! Throttled camera-follow consumer for the mototrack pipeline.
//!
//! Watches tracking-session snapshots and decides, through a dual
//! time+distance gate, whether each new position is significant enough for
//! an expensive camera transition. The camera-follow animation is costly
//! (multi-second easing) and visually disruptive if retriggered mid-flight;
//! the gate bounds both the rate and the significance of accepted updates
//! regardless of how fast the upstream feed pushes.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use track_follow::{PositionFollower, RecordingCamera};
//!
//! let follower = PositionFollower::new(RecordingCamera::new());
//! tokio::spawn(follower.run(session.watch()));
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod follower;
pub mod gate;
pub mod geo;

pub use camera::{CameraMotion, CameraSurface, RecordingCamera};
pub use config::FollowConfig;
pub use error::{FollowError, FollowResult};
pub use follower::{FollowPhase, PositionFollower};
pub use gate::{FollowGate, GateDecision};
pub use geo::{haversine_distance_m, EARTH_RADIUS_M};
