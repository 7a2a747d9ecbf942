//! One-stop wiring of the tracking pipeline.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use track_follow::{CameraSurface, FollowConfig, PositionFollower};
use track_session::{SessionSnapshot, TrackingSession};
use track_transport::{
    ConnectionConfig, ConnectionManager, ConnectionState, PositionSample, TrackedId, Transport,
};

use crate::error::TrackerResult;

/// Combined configuration for a tracker.
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// Reconnection policy of the connection manager
    pub connection: ConnectionConfig,
    /// Thresholds and camera motion of the follow consumer
    pub follow: FollowConfig,
}

/// A fully wired tracking pipeline: connection manager, session state, and a
/// background camera-follow task.
///
/// Must be created inside a tokio runtime; the follower task is aborted when
/// the tracker is dropped.
pub struct Tracker {
    manager: ConnectionManager,
    session: TrackingSession,
    follower_task: JoinHandle<()>,
}

impl Tracker {
    /// Wire a tracker with default configuration.
    pub fn new<C>(transport: Arc<dyn Transport>, camera: C) -> TrackerResult<Self>
    where
        C: CameraSurface + 'static,
    {
        Self::with_config(transport, camera, TrackerConfig::default())
    }

    /// Wire a tracker with custom configuration.
    pub fn with_config<C>(
        transport: Arc<dyn Transport>,
        camera: C,
        config: TrackerConfig,
    ) -> TrackerResult<Self>
    where
        C: CameraSurface + 'static,
    {
        let manager = ConnectionManager::with_config(transport, config.connection)?;
        let session = TrackingSession::new(manager.clone());
        let follower = PositionFollower::with_config(camera, config.follow)?;
        let follower_task = tokio::spawn(follower.run(session.watch()));

        Ok(Self {
            manager,
            session,
            follower_task,
        })
    }

    /// Begin tracking the given plate.
    pub async fn start(&self, plate: impl Into<TrackedId>) {
        self.session.start_tracking(plate.into()).await;
    }

    /// End the tracking session.
    pub async fn stop(&self) {
        self.session.stop_tracking().await;
    }

    /// Latest known position, if tracking and a sample has arrived.
    pub fn position(&self) -> Option<PositionSample> {
        self.session.current_position()
    }

    /// Whether a tracking session is active.
    pub fn is_tracking(&self) -> bool {
        self.session.is_tracking()
    }

    /// Connection state of the underlying manager.
    pub fn connection_state(&self) -> ConnectionState {
        self.manager.state()
    }

    /// Watch channel over connection state transitions.
    pub fn watch_connection(&self) -> watch::Receiver<ConnectionState> {
        self.manager.watch_state()
    }

    /// Watch channel over session snapshots.
    pub fn watch_session(&self) -> watch::Receiver<SessionSnapshot> {
        self.session.watch()
    }

    /// The underlying session, for wiring additional consumers.
    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    /// The underlying connection manager, for registering raw listeners.
    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.follower_task.abort();
    }
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("is_tracking", &self.is_tracking())
            .field("connection_state", &self.connection_state())
            .field("position", &self.position())
            .finish()
    }
}
