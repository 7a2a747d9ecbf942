//! End-to-end pipeline tests: transport -> manager -> session -> follower.
//!
//! The interval gate is disabled here so acceptance depends only on
//! distance, keeping the tests independent of wall-clock scheduling.

use std::sync::Arc;
use std::time::Duration;

use track_follow::{FollowConfig, PositionFollower, RecordingCamera};
use track_session::TrackingSession;
use track_transport::{ChannelTransport, ConnectionManager, PositionSample, TrackedId};

async fn settle() {
    for _ in 0..30 {
        tokio::task::yield_now().await;
    }
}

fn distance_only_config() -> FollowConfig {
    FollowConfig::default()
        .with_min_interval(Duration::ZERO)
        .with_min_distance_m(10.0)
}

#[tokio::test(start_paused = true)]
async fn accepted_positions_reach_the_camera() {
    let (transport, driver) = ChannelTransport::channel();
    let session = TrackingSession::new(ConnectionManager::new(Arc::new(transport)));
    let camera = RecordingCamera::new();

    let follower =
        PositionFollower::with_config(camera.clone(), distance_only_config()).unwrap();
    tokio::spawn(follower.run(session.watch()));

    session.start_tracking(TrackedId::new("ABC-123")).await;
    settle().await;

    // First sample always flies.
    driver.publish_sample("ABC-123", 5.0689, -75.5174);
    settle().await;
    assert_eq!(camera.targets(), vec![PositionSample::new(5.0689, -75.5174)]);

    // A sub-threshold wiggle does not retrigger the animation.
    driver.publish_sample("ABC-123", 5.06891, -75.5174);
    settle().await;
    assert_eq!(camera.flight_count(), 1);

    // A significant move does.
    driver.publish_sample("ABC-123", 5.07, -75.5174);
    settle().await;
    assert_eq!(camera.flight_count(), 2);
    assert_eq!(camera.targets()[1], PositionSample::new(5.07, -75.5174));
}

#[tokio::test(start_paused = true)]
async fn no_flights_after_stop_tracking() {
    let (transport, driver) = ChannelTransport::channel();
    let session = TrackingSession::new(ConnectionManager::new(Arc::new(transport)));
    let camera = RecordingCamera::new();

    let follower =
        PositionFollower::with_config(camera.clone(), distance_only_config()).unwrap();
    tokio::spawn(follower.run(session.watch()));

    session.start_tracking(TrackedId::new("ABC-123")).await;
    settle().await;
    driver.publish_sample("ABC-123", 1.0, 1.0);
    settle().await;
    assert_eq!(camera.flight_count(), 1);

    session.stop_tracking().await;
    settle().await;

    // The transport is gone; nothing can reach the camera anymore.
    assert!(!driver.publish_sample("ABC-123", 2.0, 2.0));
    settle().await;
    assert_eq!(camera.flight_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn restart_seeds_a_fresh_gate() {
    let (transport, driver) = ChannelTransport::channel();
    let session = TrackingSession::new(ConnectionManager::new(Arc::new(transport)));
    let camera = RecordingCamera::new();

    let follower =
        PositionFollower::with_config(camera.clone(), distance_only_config()).unwrap();
    tokio::spawn(follower.run(session.watch()));

    session.start_tracking(TrackedId::new("ABC-123")).await;
    settle().await;
    driver.publish_sample("ABC-123", 1.0, 1.0);
    settle().await;

    session.stop_tracking().await;
    settle().await;
    session.start_tracking(TrackedId::new("ABC-123")).await;
    settle().await;

    // Same coordinate as before the restart still flies: the gate belongs
    // to the session, not to the feed.
    driver.publish_sample("ABC-123", 1.0, 1.0);
    settle().await;
    assert_eq!(camera.flight_count(), 2);
}
