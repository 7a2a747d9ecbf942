//! Render-surface contract for the camera-follow consumer.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use track_transport::PositionSample;

/// Parameters for a single camera flight.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraMotion {
    /// How long the pan/zoom easing runs
    pub duration: Duration,
    /// Easing linearity in (0, 1]
    pub ease_linearity: f64,
    /// Target zoom level
    pub zoom: u8,
}

impl Default for CameraMotion {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(2),
            ease_linearity: 0.5,
            zoom: 16,
        }
    }
}

/// The surface the follower drives: typically a map view.
///
/// `fly_to` must be safe to call repeatedly; a new call supersedes any
/// in-flight animation at the surface's discretion. The follower never
/// cancels an animation on session stop, it simply stops issuing flights.
pub trait CameraSurface: Send + Sync {
    /// Pan/zoom the camera to the target coordinate.
    fn fly_to(&self, target: PositionSample, motion: &CameraMotion);
}

impl<C: CameraSurface + ?Sized> CameraSurface for Arc<C> {
    fn fly_to(&self, target: PositionSample, motion: &CameraMotion) {
        (**self).fly_to(target, motion)
    }
}

/// Camera double that records every flight, for tests and demos.
#[derive(Clone, Default)]
pub struct RecordingCamera {
    flights: Arc<Mutex<Vec<(PositionSample, CameraMotion)>>>,
}

impl RecordingCamera {
    /// Create a new recording camera
    pub fn new() -> Self {
        Self::default()
    }

    /// All flights issued so far, in order.
    pub fn flights(&self) -> Vec<(PositionSample, CameraMotion)> {
        self.flights.lock().clone()
    }

    /// Targets of all flights issued so far, in order.
    pub fn targets(&self) -> Vec<PositionSample> {
        self.flights.lock().iter().map(|(t, _)| *t).collect()
    }

    /// Number of flights issued so far.
    pub fn flight_count(&self) -> usize {
        self.flights.lock().len()
    }
}

impl CameraSurface for RecordingCamera {
    fn fly_to(&self, target: PositionSample, motion: &CameraMotion) {
        self.flights.lock().push((target, motion.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_camera_records_in_order() {
        let camera = RecordingCamera::new();
        let motion = CameraMotion::default();

        camera.fly_to(PositionSample::new(1.0, 1.0), &motion);
        camera.fly_to(PositionSample::new(2.0, 2.0), &motion);

        assert_eq!(camera.flight_count(), 2);
        assert_eq!(
            camera.targets(),
            vec![PositionSample::new(1.0, 1.0), PositionSample::new(2.0, 2.0)]
        );
    }

    #[test]
    fn test_default_motion_matches_map_view() {
        let motion = CameraMotion::default();
        assert_eq!(motion.duration, Duration::from_secs(2));
        assert_eq!(motion.zoom, 16);
    }
}
