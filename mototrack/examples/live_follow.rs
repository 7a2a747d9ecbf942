//! Follow a scripted vehicle route with a console-backed camera.
//!
//! Run with:
//!
//! ```sh
//! MOTOTRACK_LOG_MODE=development cargo run --example live_follow
//! ```

use std::sync::Arc;
use std::time::Duration;

use mototrack::{
    CameraMotion, CameraSurface, ChannelTransport, PositionSample, Tracker, TrackerResult,
};

/// Camera that prints each accepted flight instead of animating a map.
struct ConsoleCamera;

impl CameraSurface for ConsoleCamera {
    fn fly_to(&self, target: PositionSample, motion: &CameraMotion) {
        println!(
            "flying to {target} over {:.1}s at zoom {}",
            motion.duration.as_secs_f64(),
            motion.zoom
        );
    }
}

#[tokio::main]
async fn main() -> TrackerResult<()> {
    mototrack::init_logging_from_env().ok();

    let (transport, driver) = ChannelTransport::channel();
    let tracker = Tracker::new(Arc::new(transport), ConsoleCamera)?;

    tracker.start("ABC-123").await;

    // A short ride through Manizales: small GPS jitter interleaved with
    // real movement, so some samples are gated and some fly.
    let route = [
        (5.0689, -75.5174),
        (5.06891, -75.51741), // jitter, gated
        (5.0702, -75.5168),
        (5.0715, -75.5150),
        (5.07151, -75.5150), // jitter, gated
        (5.0731, -75.5139),
    ];

    for (lat, lng) in route {
        driver.publish_sample("ABC-123", lat, lng);
        tokio::time::sleep(Duration::from_millis(600)).await;
    }

    println!(
        "last known position: {:?}, connection: {:?}",
        tracker.position(),
        tracker.connection_state()
    );

    tracker.stop().await;
    Ok(())
}
